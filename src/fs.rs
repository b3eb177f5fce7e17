//! File helpers that attach the offending path to every I/O error.

use crate::Result;
use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Creates the parent directory of `path` if it has one and it does not exist yet.
pub(crate) fn create_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create directory {}", parent.display())),
        _ => Ok(()),
    }
}

/// Opens `path` for buffered reading.
pub(crate) fn open(path: impl AsRef<Path>) -> Result<BufReader<File>> {
    let path = path.as_ref();
    let f = File::open(path).context(format!("Unable to open input file {}", path.display()))?;
    Ok(BufReader::new(f))
}

/// Creates (or truncates) `path` for buffered writing.
pub(crate) fn create(path: impl AsRef<Path>) -> Result<BufWriter<File>> {
    let path = path.as_ref();
    let f = File::create(path).context(format!("Unable to create file {}", path.display()))?;
    Ok(BufWriter::new(f))
}

/// Opens `path` for appending, creating it if missing.
pub(crate) fn append(path: impl AsRef<Path>) -> Result<BufWriter<File>> {
    let path = path.as_ref();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(format!("Unable to open {} for appending", path.display()))?;
    Ok(BufWriter::new(f))
}

pub(crate) fn flush(path: impl AsRef<Path>, w: &mut impl Write) -> Result<()> {
    w.flush()
        .context(format!("Unable to write data to {}", path.as_ref().display()))
}

/// Lists the regular files directly inside `dir`.
pub(crate) fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries =
        std::fs::read_dir(dir).context(format!("Unable to read directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.context(format!("Unable to read an entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Reads `path` one line at a time, handing each line to `f` without its line terminator.
///
/// Lines are decoded lossily: bulk extracts occasionally carry stray non-UTF-8 bytes and those
/// should not abort a run.
pub(crate) fn for_each_line<F>(path: impl AsRef<Path>, mut f: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    let path = path.as_ref();
    for_each_raw_line_in(open(path)?, path, |_, line| f(line))
}

/// Like `for_each_line`, for a reader that is already open, also handing `f` the undecoded bytes
/// of each line. `path` is only used in error messages.
pub(crate) fn for_each_raw_line_in<R, F>(mut reader: R, path: &Path, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&[u8], &str) -> Result<()>,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .context(format!("Unable to read from {}", path.display()))?;
        if n == 0 {
            return Ok(());
        }
        let raw = strip_terminator(&buf);
        f(raw, &String::from_utf8_lossy(raw))?;
    }
}

fn strip_terminator(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_for_each_line_strips_terminators() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "a|b\r\nc|d\ne").unwrap();

        let mut lines = Vec::new();
        for_each_line(&path, |line| {
            lines.push(line.to_string());
            Ok(())
        })
        .unwrap();

        assert_eq!(lines, vec!["a|b", "c|d", "e"]);
    }

    #[test]
    fn test_for_each_line_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, b"caf\xe9|x\n").unwrap();

        let mut lines = Vec::new();
        for_each_line(&path, |line| {
            lines.push(line.to_string());
            Ok(())
        })
        .unwrap();

        assert_eq!(lines, vec!["caf\u{fffd}|x"]);
    }

    #[test]
    fn test_raw_line_keeps_original_bytes() {
        let reader = std::io::Cursor::new(b"M\xc9NDEZ|x\r\nok\n".to_vec());
        let mut lines = Vec::new();
        for_each_raw_line_in(reader, Path::new("in.txt"), |raw, line| {
            lines.push((raw.to_vec(), line.to_string()));
            Ok(())
        })
        .unwrap();

        assert_eq!(
            lines,
            vec![
                (b"M\xc9NDEZ|x".to_vec(), String::from("M\u{fffd}NDEZ|x")),
                (b"ok".to_vec(), String::from("ok")),
            ]
        );
    }

    #[test]
    fn test_open_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.txt");
        let err = open(&path).unwrap_err();
        assert!(format!("{err:#}").contains("nope.txt"));
    }

    #[test]
    fn test_create_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("out.csv");
        create_parent_dir(&path).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
        create_parent_dir("out.csv").unwrap();
    }
}
