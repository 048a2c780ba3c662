use anyhow::{Context, Result};
use regex::Regex;
use tracing::warn;

use crate::baseline::QualifierUniverse;

pub mod fetch;
pub mod score;
pub mod status;

/// Builds the qualifier universe from CLI input, flagging ids that do not
/// look like MeSH qualifier UIs.
pub fn build_universe(qualifiers: Vec<String>) -> Result<QualifierUniverse> {
    let pattern = Regex::new(r"^Q\d{6}$").context("failed to compile qualifier id regex")?;
    for qualifier in &qualifiers {
        if !pattern.is_match(qualifier) {
            warn!(qualifier = %qualifier, "qualifier id does not look like a MeSH qualifier UI");
        }
    }
    Ok(QualifierUniverse::new(qualifiers)?)
}
