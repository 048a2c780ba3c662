use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::baseline::{BernoulliSampler, Grouping, ScoreReport, estimate, score_records};
use crate::cache::{CacheLayout, load_datasets};
use crate::cli::ScoreArgs;
use crate::commands::build_universe;
use crate::model::{ScoreRunCounts, ScoreRunManifest, ScoreRunPaths};
use crate::source::{RecordSource, SqliteRecordSource};
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

const SCORE_MANIFEST_VERSION: u32 = 1;

#[derive(Debug)]
pub struct ScoreOutcome {
    pub report: ScoreReport,
    pub report_path: PathBuf,
    pub table_path: Option<PathBuf>,
}

pub fn run(args: ScoreArgs) -> Result<()> {
    let source = SqliteRecordSource::new(args.connection.to_params());
    let outcome = execute(args, &source)?;

    info!(
        report = %outcome.report_path.display(),
        table = %outcome
            .table_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default(),
        examples = outcome.report.example_count,
        "score run completed"
    );
    println!("{}", outcome.report.render());
    Ok(())
}

pub fn execute(args: ScoreArgs, source: &dyn RecordSource) -> Result<ScoreOutcome> {
    let started_ts = Utc::now();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let universe = build_universe(args.qualifiers.clone())?;
    let grouping = Grouping::from_flag(args.journals);
    let layout = CacheLayout::new(&args.directory);

    info!(
        run_id = %run_id,
        directory = %layout.root().display(),
        grouping = grouping.as_str(),
        qualifiers = universe.len(),
        "starting score run"
    );

    let loaded = load_datasets(&layout, args.ratio, source, &universe)?;

    let mut sampler = BernoulliSampler::seeded(args.seed);
    let table = estimate(grouping, &loaded.split.training, &mut sampler)
        .context("failed to estimate probability table")?;
    info!(
        groups = table.group_count(),
        entries = table.entry_count(),
        positive = table.positive_count(),
        "estimated probability table"
    );

    let table_path = if args.export_table {
        let path = layout.table_path(grouping);
        write_json_pretty(&path, &table.to_nested_json())?;
        info!(path = %path.display(), "wrote probability table");
        Some(path)
    } else {
        None
    };

    let report = score_records(&table, &universe, &loaded.split.testing)
        .context("failed to score testing split")?;

    let report_path = args.report_path.clone().unwrap_or_else(|| {
        layout
            .reports_dir()
            .join(format!("score_{}.json", utc_compact_string(started_ts)))
    });

    let manifest = ScoreRunManifest {
        manifest_version: SCORE_MANIFEST_VERSION,
        run_id,
        generated_at: now_utc_string(),
        cache_state: loaded.state.as_str().to_string(),
        grouping: grouping.as_str().to_string(),
        seed: args.seed,
        ratio: loaded.ratio,
        qualifiers: universe.as_slice().to_vec(),
        f1: report.f1,
        precision: report.precision,
        recall: report.recall,
        paths: ScoreRunPaths {
            cache_root: layout.root().display().to_string(),
            training_path: layout.training_path().display().to_string(),
            testing_path: layout.testing_path().display().to_string(),
            table_path: table_path.as_ref().map(|path| path.display().to_string()),
        },
        counts: ScoreRunCounts {
            training_records: loaded.split.training.len(),
            testing_records: loaded.split.testing.len(),
            table_groups: table.group_count(),
            table_entries: table.entry_count(),
            table_positive_entries: table.positive_count(),
        },
    };
    write_json_pretty(&report_path, &manifest)?;

    info!(
        path = %report_path.display(),
        f1 = report.f1,
        precision = report.precision,
        recall = report.recall,
        "wrote score report"
    );

    Ok(ScoreOutcome {
        report,
        report_path,
        table_path,
    })
}
