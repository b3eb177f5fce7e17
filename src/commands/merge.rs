//! The `merge` command: concatenates the bulk-download parts in a directory into one file.

use crate::args::MergeArgs;
use crate::commands::Out;
use crate::{fs, Result};
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const TXT_EXTENSION: &str = ".txt";

#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    files: Vec<PathBuf>,
    bytes_written: u64,
    output: PathBuf,
}

impl MergeSummary {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// Appends each `.txt` file in `args.input_dir()`, sorted by file name, to `args.output()`,
/// following each file's content with a newline. The output is opened in append mode and created
/// if it does not exist, so repeated runs accumulate.
///
/// # Errors
/// - Returns an error if the directory cannot be listed, a file cannot be read, or the output
///   cannot be written.
pub fn merge(args: &MergeArgs) -> Result<Out<MergeSummary>> {
    let input_dir = args.input_dir();
    let output = args.output();
    let files = txt_files(input_dir, output)?;

    let mut writer = fs::append(output)?;
    let mut bytes_written = 0;
    for file in &files {
        debug!("Appending {}", file.display());
        let mut reader = fs::open(file)?;
        let copied = std::io::copy(&mut reader, &mut writer)
            .and_then(|n| writer.write_all(b"\n").map(|_| n + 1))
            .with_context(|| {
                format!("Unable to append {} to {}", file.display(), output.display())
            })?;
        bytes_written += copied;
    }
    fs::flush(output, &mut writer)?;

    let message = format!(
        "All files from '{}' have been merged into '{}'",
        input_dir.display(),
        output.display()
    );
    Ok(Out::new(
        message,
        MergeSummary {
            files,
            bytes_written,
            output: output.to_path_buf(),
        },
    ))
}

/// The `.txt` files in `dir` in lexical file name order, leaving out `output` itself if it lives
/// in the same directory.
fn txt_files(dir: &Path, output: &Path) -> Result<Vec<PathBuf>> {
    let output = std::fs::canonicalize(output).ok();
    let mut files: Vec<PathBuf> = fs::list_files(dir)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(TXT_EXTENSION))
        })
        .filter(|path| {
            let is_output = output.is_some() && std::fs::canonicalize(path).ok() == output;
            if is_output {
                warn!("Not merging the output file {} into itself", path.display());
            }
            !is_output
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
