use std::path::PathBuf;

use clap::Parser;

use crate::fetch::Source;

pub const DEFAULT_URL: &str = "https://raw.githubusercontent.com/goto-bus-stop/recanalyst/refs/heads/master/resources/lang/en/ageofempires.php";
pub const DEFAULT_OUTPUT: &str = "translations.rs";

/// Every flag is optional; running without arguments downloads the English
/// recanalyst language file and writes `translations.rs`.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// URL of the PHP language file to convert.
    #[arg(long, default_value = DEFAULT_URL, conflicts_with = "input")]
    pub url: String,

    /// Convert a local PHP language file instead of downloading one.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Where to write the generated Rust code. Existing files are overwritten.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

impl Config {
    pub fn source(&self) -> Source {
        match &self.input {
            Some(path) => Source::File(path.clone()),
            None => Source::Url(self.url.clone()),
        }
    }
}
