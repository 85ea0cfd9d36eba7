//! Action label files (`frame_index,label` per row)
//!
//! A row is a non-empty CSV record. Blank lines are skipped everywhere, so
//! counting, key extraction and parsing agree on the number of samples.

use crate::error::ArtifactError;
use csv::{Position, ReaderBuilder, StringRecord, Trim};
use rarpeval_metrics::Label;
use std::fs;
use std::path::Path;

/// Parsed action label file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionTrack {
    /// First column, the 60 Hz frame index of every sample
    pub frame_indices: Vec<u64>,
    /// Second column, one action label per sample
    pub labels: Vec<Label>,
}

impl ActionTrack {
    /// Read and parse a label file
    pub fn read(path: &Path) -> Result<Self, ArtifactError> {
        let content = fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
        Self::parse(&content).map_err(|(line, reason)| ArtifactError::MalformedActionFile {
            path: path.to_path_buf(),
            line,
            reason,
        })
    }

    fn parse(content: &[u8]) -> Result<Self, (usize, String)> {
        let mut track = ActionTrack::default();
        for record in records(content) {
            let record = record?;
            let line = line_of(content, record.position());
            let (index, label) = parse_record(&record).map_err(|reason| (line, reason))?;
            track.frame_indices.push(index);
            track.labels.push(label);
        }
        Ok(track)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the file held no sample
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// One-based row of the first frame index differing from `other`
    pub fn first_index_mismatch(&self, other: &ActionTrack) -> Option<usize> {
        let shared = self.frame_indices.len().min(other.frame_indices.len());
        self.frame_indices
            .iter()
            .zip(&other.frame_indices)
            .position(|(a, b)| a != b)
            .or((self.frame_indices.len() != other.frame_indices.len()).then_some(shared))
            .map(|index| index + 1)
    }
}

/// Records of a label file; decoding errors carry their one-based line
fn records(content: &[u8]) -> impl Iterator<Item = Result<StringRecord, (usize, String)>> + '_ {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content)
        .into_records()
        .map(move |record| record.map_err(|e| (line_of(content, e.position()), e.to_string())))
}

/// One-based line of a record, past the blank lines skipped before it
fn line_of(content: &[u8], position: Option<&Position>) -> usize {
    position.map_or(0, |p| {
        let start = usize::try_from(p.byte()).unwrap_or(usize::MAX);
        let skipped = content
            .get(start..)
            .unwrap_or_default()
            .iter()
            .take_while(|&&b| b == b'\n' || b == b'\r')
            .filter(|&&b| b == b'\n')
            .count();
        p.line() as usize + skipped
    })
}

fn parse_record(record: &StringRecord) -> Result<(u64, Label), String> {
    let (Some(index), Some(label), 2) = (record.get(0), record.get(1), record.len()) else {
        return Err(format!("expected 2 comma separated fields, got {}", record.len()));
    };
    let index = parse_integer(index).ok_or_else(|| format!("invalid frame index {index:?}"))?;
    let label = parse_integer(label)
        .and_then(|l| Label::try_from(l).ok())
        .ok_or_else(|| format!("invalid label {label:?}"))?;
    Ok((index, label))
}

/// Non-negative integer, also accepting a float spelling such as `3.0`
fn parse_integer(field: &str) -> Option<u64> {
    if let Ok(value) = field.parse::<u64>() {
        return Some(value);
    }
    let value = field.parse::<f64>().ok()?;
    (value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64).then_some(value as u64)
}

fn read_records(path: &Path) -> Result<Vec<StringRecord>, ArtifactError> {
    let content = fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
    records(&content)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|(line, reason)| ArtifactError::MalformedActionFile {
            path: path.to_path_buf(),
            line,
            reason,
        })
}

/// Number of rows in a label file
pub fn count_rows(path: &Path) -> Result<usize, ArtifactError> {
    Ok(read_records(path)?.len())
}

/// Frame index column as written, keeping zero padding
pub fn read_frame_keys(path: &Path) -> Result<Vec<String>, ArtifactError> {
    Ok(read_records(path)?
        .iter()
        .filter_map(|record| record.get(0))
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect())
}

/// Write a label file, one `key,label` row per sample
pub fn write_track<'a, I>(path: &Path, rows: I) -> Result<(), ArtifactError>
where
    I: IntoIterator<Item = (&'a str, Label)>,
{
    let csv_error = |source| ArtifactError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
    for (key, label) in rows {
        wtr.write_record([key, label.to_string().as_str()]).map_err(csv_error)?;
    }
    wtr.flush().map_err(|e| ArtifactError::io(path, e))
}
