use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cache::{CacheLayout, CacheState, read_records, read_split_manifest};
use crate::cli::StatusArgs;

pub fn run(args: StatusArgs) -> Result<()> {
    let layout = CacheLayout::new(&args.directory);
    let state = CacheState::probe(&layout);

    info!(
        directory = %layout.root().display(),
        state = state.as_str(),
        "status requested"
    );

    let snapshot_path = layout.snapshot_path();
    if snapshot_path.is_file() {
        let records = read_records(&snapshot_path)?;
        info!(path = %snapshot_path.display(), records = records.len(), "record snapshot present");
    } else {
        warn!(path = %snapshot_path.display(), "record snapshot missing");
    }

    if state == CacheState::HaveSplit {
        let training = read_records(&layout.training_path())?;
        let testing = read_records(&layout.testing_path())?;
        info!(
            training = training.len(),
            testing = testing.len(),
            "cached split present"
        );
    } else {
        warn!("no cached split; next score run will build one");
    }

    match read_split_manifest(&layout)? {
        Some(manifest) => info!(
            generated_at = %manifest.generated_at,
            ratio = manifest.ratio,
            snapshot_records = manifest.snapshot_records,
            snapshot_sha256 = %manifest.snapshot_sha256.unwrap_or_default(),
            "loaded split manifest"
        ),
        None => warn!(path = %layout.manifest_path().display(), "split manifest missing"),
    }

    let reports_dir = layout.reports_dir();
    if reports_dir.is_dir() {
        let report_count = fs::read_dir(&reports_dir)
            .with_context(|| format!("failed to read {}", reports_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .count();
        info!(path = %reports_dir.display(), reports = report_count, "score reports");
    }

    Ok(())
}
