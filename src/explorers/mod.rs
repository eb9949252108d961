//! Registered explorer definitions.
//!
//! Each submodule re-expresses one generator script as data: a handful of
//! header fields, template strings and loop dimensions driving the generic
//! fetch → expand → post-process → serialize pipeline. Adding an explorer
//! means adding a submodule and one [`REGISTRY`] entry.

pub mod lis_inequality;
pub mod lis_poverty;

use crate::error::PipelineError;
use crate::tsv::Explorer;

/// Static description of one registered explorer.
#[derive(Debug, Clone, Copy)]
pub struct ExplorerInfo {
    /// CLI slug.
    pub slug: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Output file name under the output directory.
    pub outfile: &'static str,
}

/// All registered explorers, in generation order.
pub const REGISTRY: &[ExplorerInfo] = &[
    ExplorerInfo {
        slug: lis_inequality::SLUG,
        title: "Inequality Data Explorer of the Luxembourg Income Study",
        outfile: "lis-inequality.explorer.tsv",
    },
    ExplorerInfo {
        slug: lis_poverty::SLUG,
        title: "Poverty Data Explorer of the Luxembourg Income Study",
        outfile: "lis-poverty.explorer.tsv",
    },
];

/// Look up a registry entry by slug.
pub fn find(slug: &str) -> Option<&'static ExplorerInfo> {
    REGISTRY.iter().find(|info| info.slug == slug)
}

/// Fetch the reference sheets for one explorer and assemble it.
pub async fn build(slug: &str, client: &reqwest::Client) -> Result<Explorer, PipelineError> {
    match slug {
        lis_inequality::SLUG => lis_inequality::build(client).await,
        lis_poverty::SLUG => lis_poverty::build(client).await,
        other => Err(PipelineError::UnknownExplorer(other.to_string())),
    }
}

/// Uppercase the first character, leaving the rest untouched
/// ("disposable income" → "Disposable income").
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
