use anyhow::Result;
use tracing::info;

use crate::cache::{CacheLayout, refresh_snapshot};
use crate::cli::FetchArgs;
use crate::commands::build_universe;
use crate::source::SqliteRecordSource;

pub fn run(args: FetchArgs) -> Result<()> {
    let universe = build_universe(args.qualifiers)?;
    let layout = CacheLayout::new(&args.directory);
    let source = SqliteRecordSource::new(args.connection.to_params());

    info!(
        directory = %layout.root().display(),
        qualifiers = universe.len(),
        "refreshing record snapshot"
    );
    let fetched = refresh_snapshot(&layout, &source, &universe)?;
    info!(
        path = %layout.snapshot_path().display(),
        records = fetched,
        "fetch completed"
    );

    Ok(())
}
