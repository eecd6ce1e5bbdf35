//! The ordered record sequence a run consumes.
//!
//! Processing order decides the vertical stacking order on the page, so a
//! dataset is a list, not a map. JSON objects are read in document order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One record: a key (e.g. a country code) and its two display lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub lines: [String; 2],
}

impl Record {
    pub fn new(key: impl Into<String>, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            lines: [primary.into(), secondary.into()],
        }
    }

    /// Name of the frame container holding this record.
    pub fn container_name(&self) -> String {
        self.key.to_lowercase()
    }

    pub fn primary(&self) -> &str {
        &self.lines[0]
    }

    pub fn secondary(&self) -> &str {
        &self.lines[1]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Build from a `key → [line1, line2, ...]` map, keeping map order.
    ///
    /// Missing cells become empty lines; cells past the second are ignored.
    pub fn from_rows(rows: IndexMap<String, Vec<String>>) -> Self {
        let records = rows
            .into_iter()
            .map(|(key, row)| {
                let mut cells = row.into_iter();
                let primary = cells.next().unwrap_or_default();
                let secondary = cells.next().unwrap_or_default();
                Record::new(key, primary, secondary)
            })
            .collect();
        Self { records }
    }

    /// Parse a JSON object of rows, e.g. `{"DE": ["Hallo", "Welt"]}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rows: IndexMap<String, Vec<String>> = serde_json::from_str(json)?;
        Ok(Self::from_rows(rows))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
