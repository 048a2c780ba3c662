use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::baseline::{DatasetSplit, Grouping, QualifierUniverse, split_records, validate_ratio};
use crate::model::{Record, SplitManifest};
use crate::source::RecordSource;
use crate::util::{now_utc_string, read_json, sha256_file, write_json_compact, write_json_pretty};


const SPLIT_MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join("data.json")
    }

    pub fn training_path(&self) -> PathBuf {
        self.root.join("training.json")
    }

    pub fn testing_path(&self) -> PathBuf {
        self.root.join("testing.json")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("split_manifest.json")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn table_path(&self, grouping: Grouping) -> PathBuf {
        match grouping {
            Grouping::Journals => self.root.join("probabilities_journals.json"),
            Grouping::Descriptors => self.root.join("probabilities.json"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CacheState {
    HaveSplit,
    HaveSnapshotOnly,
    HaveNothing,
}

impl CacheState {
    pub fn probe(layout: &CacheLayout) -> Self {
        if layout.training_path().is_file() && layout.testing_path().is_file() {
            Self::HaveSplit
        } else if layout.snapshot_path().is_file() {
            Self::HaveSnapshotOnly
        } else {
            Self::HaveNothing
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HaveSplit => "have_split",
            Self::HaveSnapshotOnly => "have_snapshot_only",
            Self::HaveNothing => "have_nothing",
        }
    }
}

#[derive(Debug)]
pub struct LoadedDatasets {
    pub state: CacheState,
    pub split: DatasetSplit,
    /// Ratio the split was actually built with; a cached split keeps its own.
    pub ratio: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplitDrift {
    pub ratio: bool,
    pub qualifiers: bool,
}

pub fn split_drift(manifest: &SplitManifest, ratio: f64, universe: &QualifierUniverse) -> SplitDrift {
    SplitDrift {
        ratio: (manifest.ratio - ratio).abs() > f64::EPSILON,
        qualifiers: manifest.qualifiers.as_slice() != universe.as_slice(),
    }
}

/// Resolves the train/test split, touching the record source only when the
/// cache holds neither a split nor a snapshot.
pub fn load_datasets(
    layout: &CacheLayout,
    ratio: f64,
    source: &dyn RecordSource,
    universe: &QualifierUniverse,
) -> Result<LoadedDatasets> {
    validate_ratio(ratio)?;

    let state = CacheState::probe(layout);
    info!(root = %layout.root().display(), state = state.as_str(), "resolved cache state");

    let (split, ratio) = match state {
        CacheState::HaveSplit => read_split(layout, ratio, universe)?,
        CacheState::HaveSnapshotOnly => {
            info!(path = %layout.snapshot_path().display(), "recreating split from snapshot");
            let records = read_records(&layout.snapshot_path())?;
            (split_and_persist(layout, records, ratio, universe)?, ratio)
        }
        CacheState::HaveNothing => {
            info!("fetching records from source");
            let records = fetch_snapshot(layout, source, universe)?;
            (split_and_persist(layout, records, ratio, universe)?, ratio)
        }
    };

    Ok(LoadedDatasets {
        state,
        split,
        ratio,
    })
}

pub fn refresh_snapshot(
    layout: &CacheLayout,
    source: &dyn RecordSource,
    universe: &QualifierUniverse,
) -> Result<usize> {
    let records = fetch_snapshot(layout, source, universe)?;

    for path in [
        layout.training_path(),
        layout.testing_path(),
        layout.manifest_path(),
    ] {
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove stale {}", path.display()))?;
            warn!(path = %path.display(), "removed stale split artifact");
        }
    }

    Ok(records.len())
}

pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    read_json(path)
}

pub fn read_split_manifest(layout: &CacheLayout) -> Result<Option<SplitManifest>> {
    let path = layout.manifest_path();
    if !path.exists() {
        return Ok(None);
    }
    read_json(&path).map(Some)
}

fn fetch_snapshot(
    layout: &CacheLayout,
    source: &dyn RecordSource,
    universe: &QualifierUniverse,
) -> Result<Vec<Record>> {
    let records = source.fetch(universe)?;
    let path = layout.snapshot_path();
    write_json_compact(&path, &records)?;
    info!(path = %path.display(), records = records.len(), "saved record snapshot");
    Ok(records)
}

fn read_split(
    layout: &CacheLayout,
    ratio: f64,
    universe: &QualifierUniverse,
) -> Result<(DatasetSplit, f64)> {
    let training = read_records(&layout.training_path())?;
    let testing = read_records(&layout.testing_path())?;

    let used_ratio = match read_split_manifest(layout)? {
        Some(manifest) => {
            let drift = split_drift(&manifest, ratio, universe);
            if drift.ratio {
                warn!(
                    cached_ratio = manifest.ratio,
                    requested_ratio = ratio,
                    "cached split was built with a different ratio; using it as-is"
                );
            }
            if drift.qualifiers {
                warn!(
                    cached_qualifiers = %manifest.qualifiers.join(","),
                    requested_qualifiers = %universe.as_slice().join(","),
                    "cached split was built for a different qualifier list; using it as-is"
                );
            }
            manifest.ratio
        }
        None => {
            warn!(path = %layout.manifest_path().display(), "split manifest missing");
            ratio
        }
    };

    info!(
        training = training.len(),
        testing = testing.len(),
        "loaded cached split"
    );
    Ok((DatasetSplit { training, testing }, used_ratio))
}

fn split_and_persist(
    layout: &CacheLayout,
    records: Vec<Record>,
    ratio: f64,
    universe: &QualifierUniverse,
) -> Result<DatasetSplit> {
    let snapshot_records = records.len();
    let split = split_records(records, ratio)?;

    write_json_compact(&layout.training_path(), &split.training)?;
    write_json_compact(&layout.testing_path(), &split.testing)?;

    let snapshot_path = layout.snapshot_path();
    let snapshot_sha256 = if snapshot_path.is_file() {
        Some(sha256_file(&snapshot_path)?)
    } else {
        None
    };

    let manifest = SplitManifest {
        manifest_version: SPLIT_MANIFEST_VERSION,
        generated_at: now_utc_string(),
        ratio,
        qualifiers: universe.as_slice().to_vec(),
        snapshot_sha256,
        snapshot_records,
        training_records: split.training.len(),
        testing_records: split.testing.len(),
    };
    write_json_pretty(&layout.manifest_path(), &manifest)?;

    info!(
        training = manifest.training_records,
        testing = manifest.testing_records,
        ratio,
        "wrote training and testing split"
    );
    Ok(split)
}
