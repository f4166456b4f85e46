//! CubeMX pinout export reader.
//!
//! The export is a CSV table with (at least) the columns `Position`, `Name`
//! and `Signal`; other columns such as `Type` or `Label` are ignored. Rows are
//! read lazily and passed through unfiltered.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PinLabelError;

/// Separator between a pin name and its alternate function, e.g. `PC14/OSC32_IN`.
pub const ALT_FUNCTION_SEPARATOR: char = '/';

/// One row of the pinout table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PinoutRecord {
    #[serde(rename = "Name")]
    pub pin_name: String,
    /// Empty when the pin is unused.
    #[serde(rename = "Signal")]
    pub signal_name: String,
    #[serde(rename = "Position")]
    pub position_label: String,
}

impl PinoutRecord {
    /// The pin name with any alternate-function suffix removed.
    pub fn plain_name(&self, separator: char) -> &str {
        self.pin_name
            .split_once(separator)
            .map(|(name, _)| name)
            .unwrap_or(self.pin_name.as_str())
    }

    pub fn is_unused(&self) -> bool {
        self.signal_name.is_empty()
    }
}

pub struct PinoutReader<R> {
    reader: csv::Reader<R>,
}

impl PinoutReader<File> {
    pub fn open(path: &Path) -> Result<Self, PinLabelError> {
        let reader = csv::Reader::from_path(path)?;
        Ok(Self { reader })
    }
}

impl<R: io::Read> PinoutReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: csv::Reader::from_reader(reader),
        }
    }

    /// Consume the reader, yielding rows in file order.
    pub fn records(self) -> impl Iterator<Item = Result<PinoutRecord, csv::Error>> {
        self.reader.into_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, signal: &str) -> PinoutRecord {
        PinoutRecord {
            pin_name: name.to_string(),
            signal_name: signal.to_string(),
            position_label: "1".to_string(),
        }
    }

    #[test]
    fn test_reads_rows_in_order() {
        let data = "\"Position\",\"Name\",\"Type\",\"Signal\",\"Label\"\n\
                    \"10\",\"PA0-WKUP\",\"I/O\",\"ADC1_IN0\",\"\"\n\
                    \"11\",\"PA1\",\"I/O\",\"\",\"\"\n\
                    \"3\",\"PC14-OSC32_IN\",\"I/O\",\"RCC_OSC32_IN\",\"\"\n";
        let rows: Vec<PinoutRecord> = PinoutReader::from_reader(data.as_bytes())
            .records()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].pin_name, "PA0-WKUP");
        assert_eq!(rows[0].signal_name, "ADC1_IN0");
        assert_eq!(rows[0].position_label, "10");
        assert!(rows[1].is_unused());
        assert_eq!(rows[2].position_label, "3");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let data = "Position,Name\n1,PA0\n";
        let mut rows = PinoutReader::from_reader(data.as_bytes()).records();
        let first = rows.next().expect("one row");
        assert!(first.is_err());
    }

    #[test]
    fn test_plain_name_strips_alternate_function() {
        assert_eq!(record("PC14/OSC32_IN", "X").plain_name('/'), "PC14");
        assert_eq!(record("PA0/ALT/MORE", "X").plain_name('/'), "PA0");
        assert_eq!(record("PA1", "X").plain_name('/'), "PA1");
        assert_eq!(record("PA0-WKUP", "X").plain_name('-'), "PA0");
        assert_eq!(record("/PA2", "X").plain_name('/'), "");
    }
}
