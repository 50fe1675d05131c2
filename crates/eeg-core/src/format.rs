//! Flat numeric dataset format
//!
//! One text file per band; each line holds one sample as space-separated
//! values with exactly three decimals.

use crate::band::BandLabel;
use crate::error::{EegError, EegResult};
use crate::signal_sample::SignalSample;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// File extension used for dataset files
pub const DEFAULT_EXTENSION: &str = "csv";

const DELIMITER: u8 = b' ';

fn format_value(value: f64) -> String {
    format!("{:.3}", value)
}

/// Format values as one dataset line (without the terminating newline)
pub fn format_row(values: &[f64]) -> String {
    values
        .iter()
        .map(|&v| format_value(v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse one dataset line back into values
pub fn parse_row(line: &str) -> EegResult<Vec<f64>> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|e| EegError::format(format!("invalid value '{}': {}", token, e)))
        })
        .collect()
}

/// `<dir>/<label>.<extension>`
pub fn dataset_path(dir: impl AsRef<Path>, label: BandLabel, extension: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.{}", label, extension))
}

/// Make sure the output directory exists before any write
pub fn ensure_output_dir(dir: impl AsRef<Path>) -> EegResult<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    tracing::debug!(path = %dir.display(), "output directory ready");
    Ok(())
}

/// Writes samples as dataset rows; every row must have the same length
pub struct DatasetWriter<W: Write> {
    writer: csv::Writer<W>,
    row_len: Option<usize>,
    rows_written: usize,
}

impl DatasetWriter<BufWriter<File>> {
    /// Create (or truncate) a dataset file
    pub fn create(path: impl AsRef<Path>) -> EegResult<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> DatasetWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);

        Self {
            writer,
            row_len: None,
            rows_written: 0,
        }
    }

    pub fn write_sample(&mut self, sample: &SignalSample) -> EegResult<()> {
        self.write_values(sample.values())
    }

    pub fn write_values(&mut self, values: &[f64]) -> EegResult<()> {
        if values.is_empty() {
            return Err(EegError::format("cannot write an empty row"));
        }
        match self.row_len {
            Some(expected) if expected != values.len() => {
                return Err(EegError::format(format!(
                    "row {} has {} values, expected {}",
                    self.rows_written,
                    values.len(),
                    expected
                )));
            }
            Some(_) => {}
            None => self.row_len = Some(values.len()),
        }

        self.writer.write_record(values.iter().map(|&v| format_value(v)))?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn flush(&mut self) -> EegResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> EegResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| EegError::Io(e.into_error()))
    }
}

/// Reads dataset rows back
pub struct DatasetReader<R: Read> {
    reader: csv::Reader<R>,
}

impl DatasetReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> EegResult<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read> DatasetReader<R> {
    pub fn from_reader(inner: R) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(inner);
        Self { reader }
    }

    /// Read every row; all rows must have the same length
    pub fn rows(&mut self) -> EegResult<Vec<Vec<f64>>> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (index, record) in self.reader.records().enumerate() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    field.parse::<f64>().map_err(|e| {
                        EegError::format(format!("row {}: invalid value '{}': {}", index, field, e))
                    })
                })
                .collect::<EegResult<Vec<f64>>>()?;

            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(EegError::format(format!(
                        "row {} has {} values, expected {}",
                        index,
                        row.len(),
                        first.len()
                    )));
                }
            }
            rows.push(row);
        }
        Ok(rows)
    }

    /// Read the row at `index`
    pub fn row(&mut self, index: usize) -> EegResult<Vec<f64>> {
        for (current, record) in self.reader.records().enumerate() {
            let record = record?;
            if current == index {
                return parse_row(&record.iter().collect::<Vec<_>>().join(" "));
            }
        }
        Err(EegError::format(format!("row {} out of range", index)))
    }
}

pub fn read_rows(path: impl AsRef<Path>) -> EegResult<Vec<Vec<f64>>> {
    DatasetReader::open(path)?.rows()
}

pub fn read_row(path: impl AsRef<Path>, index: usize) -> EegResult<Vec<f64>> {
    DatasetReader::open(path)?.row(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_precision() {
        assert_eq!(format_row(&[1.0, -2.5, 0.12345]), "1.000 -2.500 0.123");
        assert_eq!(format_row(&[19.9996]), "20.000");
        assert_eq!(format_row(&[]), "");
    }

    #[test]
    fn test_parse_row_round_trip_tolerance() {
        let values = [12.3456, -0.0004, 7.0, -19.99951, 3.14159];
        let parsed = parse_row(&format_row(&values)).unwrap();

        assert_eq!(parsed.len(), values.len());
        for (original, parsed) in values.iter().zip(&parsed) {
            assert!((original - parsed).abs() <= 0.0005 + 1e-12);
        }
    }

    #[test]
    fn test_parse_row_rejects_garbage() {
        assert!(matches!(parse_row("1.0 abc 2.0"), Err(EegError::Format { .. })));
    }

    #[test]
    fn test_writer_output_layout() {
        let mut writer = DatasetWriter::from_writer(Vec::new());
        writer.write_values(&[1.0, 2.0, 3.0]).unwrap();
        writer.write_values(&[-1.0, 0.5, 0.25]).unwrap();
        assert_eq!(writer.rows_written(), 2);

        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "1.000 2.000 3.000\n-1.000 0.500 0.250\n");
    }

    #[test]
    fn test_writer_rejects_mismatched_rows() {
        let mut writer = DatasetWriter::from_writer(Vec::new());
        writer.write_values(&[1.0, 2.0]).unwrap();
        assert!(matches!(
            writer.write_values(&[1.0, 2.0, 3.0]),
            Err(EegError::Format { .. })
        ));
        assert!(writer.write_values(&[]).is_err());
    }

    #[test]
    fn test_reader_rows_and_row_lookup() {
        let data = "1.000 2.000 3.000\n4.000 5.000 6.000\n";

        let rows = DatasetReader::from_reader(data.as_bytes()).rows().unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);

        let row = DatasetReader::from_reader(data.as_bytes()).row(1).unwrap();
        assert_eq!(row, vec![4.0, 5.0, 6.0]);

        assert!(DatasetReader::from_reader(data.as_bytes()).row(2).is_err());
    }

    #[test]
    fn test_reader_rejects_ragged_rows() {
        let data = "1.000 2.000\n3.000\n";
        assert!(matches!(
            DatasetReader::from_reader(data.as_bytes()).rows(),
            Err(EegError::Format { .. })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("generated");
        ensure_output_dir(&nested).unwrap();

        let path = dataset_path(&nested, BandLabel::Alpha, DEFAULT_EXTENSION);
        assert!(path.ends_with("alpha.csv"));

        let sample = SignalSample::new(vec![5.1234, -19.8765, 0.0], 250.0);
        let mut writer = DatasetWriter::create(&path).unwrap();
        writer.write_sample(&sample).unwrap();
        writer.write_sample(&sample).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        for (original, parsed) in sample.values().iter().zip(&rows[0]) {
            assert!((original - parsed).abs() <= 0.0005);
        }
        assert_eq!(read_row(&path, 1).unwrap(), rows[1]);
    }
}
