//! JSON and JSONL serialization of scan results.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::Serialize;

use crate::types::ImageRecord;

/// How scan results are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// A single JSON array
    #[default]
    Json,
    /// One record per line
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::JsonLines),
            other => Err(format!("unknown output format '{other}' (expected json or jsonl)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::JsonLines => "jsonl",
        })
    }
}

/// Writes catalog records to any `Write` sink.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    records_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            records_written: 0,
        }
    }

    /// Write a whole catalog: an array for JSON, one line per record for JSONL.
    pub fn write_catalog(&mut self, records: &[ImageRecord]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.write_value(records)?;
                self.records_written += records.len();
            }
            OutputFormat::JsonLines => {
                for record in records {
                    serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                    self.records_written += 1;
                }
            }
        }
        Ok(())
    }

    fn write_value<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)
        } else {
            serde_json::to_writer(&mut self.writer, value)
        };
        written.map_err(io::Error::other)?;
        writeln!(self.writer)
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Copies of `records` with thumbnail payloads removed.
pub fn without_thumbnails<'a, I>(records: I) -> Vec<ImageRecord>
where
    I: IntoIterator<Item = &'a ImageRecord>,
{
    records
        .into_iter()
        .map(|r| ImageRecord {
            thumbnail: String::new(),
            ..r.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(name: &str) -> ImageRecord {
        ImageRecord {
            path: PathBuf::from(format!("root/Dior Fall Winter 2024 Milan/{name}")),
            file_name: name.to_string(),
            designer: "Dior".to_string(),
            season: "Fall Winter".to_string(),
            year: "2024".to_string(),
            show: "Milan".to_string(),
            labels: vec!["jacket".to_string(), "leather jacket".to_string()],
            thumbnail: "QUJD".to_string(),
        }
    }

    #[test]
    fn test_json_array() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json, false);
        writer.write_catalog(&[record("a.jpg"), record("b.jpg")]).unwrap();
        assert_eq!(writer.records_written(), 2);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let parsed: Vec<ImageRecord> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].file_name, "b.jpg");
    }

    #[test]
    fn test_jsonl_one_record_per_line() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines, true);
        writer.write_catalog(&[record("a.jpg"), record("b.jpg")]).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"labels\":[\"jacket\",\"leather jacket\"]"));
    }

    #[test]
    fn test_empty_catalog_is_empty_array() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json, false);
        writer.write_catalog(&[]).unwrap();
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "[]\n");
    }

    #[test]
    fn test_without_thumbnails() {
        let records = [record("a.jpg")];
        let stripped = without_thumbnails(&records);
        assert!(stripped[0].thumbnail.is_empty());
        assert_eq!(stripped[0].labels, records[0].labels);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("JSONL".parse::<OutputFormat>(), Ok(OutputFormat::JsonLines));
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::JsonLines.to_string(), "jsonl");
    }
}
