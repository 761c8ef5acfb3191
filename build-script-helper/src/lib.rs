use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use transgen_generator::RustCodeGenerator;
use transgen_types::table::ArrayTable;

/// File name written into `OUT_DIR` by [`build`].
pub const GENERATED_FILE: &str = "translations.rs";

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("generated code does not parse: {0}")]
    Format(#[from] syn::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("OUT_DIR is not set, build() must run inside a build script")]
    MissingOutDir,
}

/// Renders the lookup tables for `table` as formatted Rust source.
pub fn emit(table: &ArrayTable) -> Result<String, Error> {
    let generated = RustCodeGenerator::new(table).out();
    let generated = syn::parse_file(&generated.to_string())?;
    Ok(prettyplease::unparse(&generated))
}

/// Extracts every array in `text` and renders it with [`emit`].
pub fn convert(text: &str) -> Result<String, Error> {
    let table = transgen_parser::extract(text);
    info!(
        arrays = table.len(),
        entries = table.entry_count(),
        "extracted language arrays"
    );
    emit(&table)
}

/// Writes `generated` to `path`, replacing any existing file.
pub fn write_output(path: &Path, generated: &str) -> Result<(), Error> {
    std::fs::write(path, generated).map_err(|source| Error::Write {
        path: path.to_owned(),
        source,
    })
}

/// Converts the language file at `lang_path` into `$OUT_DIR/translations.rs`.
///
/// Meant to be called from `build.rs`; `lang_path` is relative to the crate.
pub fn build(lang_path: &str) -> Result<(), Error> {
    println!("cargo:rerun-if-changed={lang_path}");

    // Extract
    let file = File::open(lang_path).map_err(|source| Error::Read {
        path: lang_path.into(),
        source,
    })?;
    let table = transgen_parser::extract_reader(BufReader::new(file)).map_err(|source| {
        Error::Read {
            path: lang_path.into(),
            source,
        }
    })?;

    // Generate
    let generated = emit(&table)?;

    // Write
    let out_dir = std::env::var_os("OUT_DIR").ok_or(Error::MissingOutDir)?;
    let dest_path = Path::new(&out_dir).join(GENERATED_FILE);
    write_output(&dest_path, &generated)
}
