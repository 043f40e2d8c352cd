use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::trip::{Trip, REQUIRED_COLUMNS};

const DIGEST_HEX_LEN: usize = 12;

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "could not read trip file: {}", err),
            IngestError::Csv(err) => write!(f, "could not parse trip file: {}", err),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(value: std::io::Error) -> Self {
        IngestError::Io(value)
    }
}

impl From<csv::Error> for IngestError {
    fn from(value: csv::Error) -> Self {
        IngestError::Csv(value)
    }
}

/// Trips of the currently loaded file, in source order. A new load builds a
/// new repository; nothing is merged with a previous one.
#[derive(Debug, Clone, Default)]
pub struct TripRepository {
    trips: Vec<Trip>,
    digest: Option<String>,
    missing_columns: Vec<String>,
}

impl TripRepository {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load_csv(path: &Path) -> Result<Self, IngestError> {
        let bytes = std::fs::read(path)?;
        let repository = Self::from_bytes(&bytes)?;
        debug!(
            path = %path.display(),
            trips = repository.len(),
            "loaded trip file"
        );
        Ok(repository)
    }

    /// The first row is always the header row. Blank lines are skipped.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IngestError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader.byte_headers()?.clone();
        let positions = header_positions(&headers);
        let missing_columns: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !positions.contains_key(**column))
            .map(|column| column.to_string())
            .collect();
        if !bytes.is_empty() && !missing_columns.is_empty() {
            warn!(columns = ?missing_columns, "trip file is missing expected columns");
        }

        let mut trips = Vec::new();
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            if is_blank(&record) {
                continue;
            }
            let fields: Vec<String> = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect();
            trips.push(Trip::from_columns(|name| {
                positions
                    .get(name)
                    .and_then(|index| fields.get(*index))
                    .map(String::as_str)
            }));
        }

        Ok(Self {
            trips,
            digest: Some(content_digest(bytes)),
            missing_columns,
        })
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// First trip with the given id.
    pub fn find(&self, trip_id: &str) -> Option<&Trip> {
        self.trips.iter().find(|trip| trip.trip_id == trip_id)
    }

    /// Short SHA-256 of the loaded bytes; `None` when no file was loaded.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn missing_columns(&self) -> &[String] {
        &self.missing_columns
    }
}

fn header_positions(headers: &ByteRecord) -> HashMap<String, usize> {
    let mut positions = HashMap::new();
    for (index, header) in headers.iter().enumerate() {
        positions
            .entry(String::from_utf8_lossy(header).into_owned())
            .or_insert(index);
    }
    positions
}

fn is_blank(record: &ByteRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record[0].is_empty())
}

fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hex: String = hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect();
    hex[..DIGEST_HEX_LEN].to_string()
}
