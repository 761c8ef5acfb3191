//! fetch -> extract -> emit -> write, once per invocation.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use transgen_build_script_helper::{convert, write_output};

pub mod config;
pub mod fetch;

pub use config::Config;
pub use fetch::{FetchError, Source};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub bytes_read: usize,
    pub bytes_written: usize,
    pub output: PathBuf,
}

/// Runs the whole conversion. A failed fetch aborts before anything is
/// written.
pub fn run(config: &Config) -> anyhow::Result<Summary> {
    let source = config.source();
    let text = source
        .fetch()
        .with_context(|| format!("could not fetch {source}"))?;
    info!(source = %source, bytes = text.len(), "download successful");

    let generated = convert(&text).context("could not generate lookup tables")?;
    write_output(&config.output, &generated)?;
    info!(
        path = %config.output.display(),
        bytes = generated.len(),
        "wrote lookup tables"
    );

    Ok(Summary {
        bytes_read: text.len(),
        bytes_written: generated.len(),
        output: config.output.clone(),
    })
}
