use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::baseline::DEFAULT_SPLIT_RATIO;
use crate::source::ConnectionParams;

#[derive(Parser, Debug)]
#[command(
    name = "mesh-baseline",
    version,
    about = "Dummy qualifier-assignment baseline for MEDLINE MeSH indexing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate the baseline on the training split and score it on the testing split.
    Score(ScoreArgs),
    /// Refresh the raw record snapshot from the citation database.
    Fetch(FetchArgs),
    /// Report what the cache directory currently holds.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Directory holding the citation database file.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Citation database file name.
    #[arg(long)]
    pub database: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long, env = "MESH_BASELINE_DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl ConnectionArgs {
    pub fn to_params(&self) -> ConnectionParams {
        ConnectionParams {
            host: self.hostname.clone(),
            database: self.database.clone(),
            user: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Qualifier unique identifiers to score, e.g. `--qualifiers Q000008 Q000009`.
    #[arg(long, num_args = 1.., required = true)]
    pub qualifiers: Vec<String>,

    #[arg(long, default_value = "data")]
    pub directory: PathBuf,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Group frequencies by (journal, descriptor) instead of descriptor alone.
    #[arg(long, default_value_t = false)]
    pub journals: bool,

    #[arg(long, default_value_t = DEFAULT_SPLIT_RATIO)]
    pub ratio: f64,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub export_table: bool,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    #[arg(long, num_args = 1.., required = true)]
    pub qualifiers: Vec<String>,

    #[arg(long, default_value = "data")]
    pub directory: PathBuf,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "data")]
    pub directory: PathBuf,
}
