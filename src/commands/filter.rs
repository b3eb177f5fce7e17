//! The `filter` command: keeps the lines filed by a single committee.

use crate::args::FilterArgs;
use crate::commands::Out;
use crate::model::record::CMTE_ID_IDX;
use crate::model::RawRecord;
use crate::{fs, Result};
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    cmte_id: String,
    lines_read: u64,
    lines_kept: u64,
    output: PathBuf,
}

impl FilterSummary {
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn lines_kept(&self) -> u64 {
        self.lines_kept
    }
}

/// Copies every line of `args.input()` whose first field equals `args.cmte_id()` exactly to
/// `args.output()`. Lines use the same `|` grammar as the tally input; no other field is looked
/// at, so short or malformed lines are kept as long as the committee ID matches. Kept lines are
/// written with their original bytes, even where those are not valid UTF-8.
///
/// # Errors
/// - Returns an error if the input cannot be read or the output cannot be written. The output is
///   only created once the input has been opened.
pub fn filter(args: &FilterArgs) -> Result<Out<FilterSummary>> {
    let input = args.input();
    let output = args.output();
    let reader = fs::open(input)?;
    let mut writer = fs::create(output)?;

    let mut lines_read = 0;
    let mut lines_kept = 0;
    fs::for_each_raw_line_in(reader, input, |raw, line| {
        lines_read += 1;
        if RawRecord::split(line).field(CMTE_ID_IDX) == Some(args.cmte_id()) {
            lines_kept += 1;
            writer
                .write_all(raw)
                .and_then(|_| writer.write_all(b"\n"))
                .with_context(|| format!("Unable to write data to {}", output.display()))?;
        }
        Ok(())
    })?;
    fs::flush(output, &mut writer)?;

    let summary = FilterSummary {
        cmte_id: args.cmte_id().to_string(),
        lines_read,
        lines_kept,
        output: output.to_path_buf(),
    };
    Ok(Out::new(
        format!(
            "Filtered records have been written to {}",
            output.display()
        ),
        summary,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::LineBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_filter_keeps_exact_matches() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("itcont.txt");
        let output = dir.path().join("filtered.txt");
        let keep_a = LineBuilder::new().committee("C00401224").name("A").build();
        let keep_b = LineBuilder::new().committee("C00401224").name("B").build();
        let lines = [
            keep_a.clone(),
            LineBuilder::new().committee("C00000001").build(),
            LineBuilder::new().committee("C004012240").build(),
            LineBuilder::new().committee("c00401224").build(),
            keep_b.clone(),
            String::from("C00401224|short"),
        ];
        std::fs::write(&input, lines.join("\n")).unwrap();

        let out = filter(&FilterArgs::new("C00401224", &input, &output)).unwrap();

        let summary = out.structure().unwrap();
        assert_eq!(summary.lines_read(), 6);
        assert_eq!(summary.lines_kept(), 3);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            format!("{keep_a}\n{keep_b}\nC00401224|short\n")
        );
        assert!(out.message().ends_with("filtered.txt"));
    }

    #[test]
    fn test_filter_copies_non_utf8_bytes_unchanged() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("itcont.txt");
        let output = dir.path().join("filtered.txt");
        let mut line = LineBuilder::new().committee("C00401224").build().into_bytes();
        line.extend_from_slice(b"|M\xc9NDEZ, JOS\xc9");
        let mut body = line.clone();
        body.extend_from_slice(b"\r\nC00000001|other\n");
        std::fs::write(&input, &body).unwrap();

        filter(&FilterArgs::new("C00401224", &input, &output)).unwrap();

        line.push(b'\n');
        assert_eq!(std::fs::read(&output).unwrap(), line);
    }

    #[test]
    fn test_filter_missing_input_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("filtered.txt");
        let args = FilterArgs::new("C1", dir.path().join("missing.txt"), &output);
        assert!(filter(&args).is_err());
        assert!(!output.exists());
    }
}
