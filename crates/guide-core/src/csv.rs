//! CSV reader for published spreadsheets.
//!
//! The sheet export is small and well-formed enough that a single pass over
//! the characters is all that is needed: quoted fields may contain commas,
//! line breaks and doubled quotes, and any of `\n`, `\r\n` or `\r` ends a row.

use serde::ser::{Serialize, SerializeMap, Serializer};

const BOM: char = '\u{feff}';

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One data record: column name to trimmed cell value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Later duplicates overwrite the value but keep the first position.
    fn insert(&mut self, column: String, value: String) {
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::default();
        for (k, v) in iter {
            row.insert(k.into(), v.into());
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    /// Records dropped because their field count differed from the header's.
    pub skipped: usize,
}

/// Parse `text` into data rows. Header-only and empty input both yield no rows.
pub fn parse_csv(text: &str) -> Vec<Row> {
    parse_table(text).rows
}

pub fn parse_table(text: &str) -> CsvTable {
    let mut records = split_records(text).into_iter();
    let Some(header) = records.next() else {
        return CsvTable::default();
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    let mut skipped = 0;
    for (index, record) in records.enumerate() {
        if record.len() != headers.len() {
            tracing::warn!(
                record = index + 1,
                expected = headers.len(),
                found = record.len(),
                "skipping csv record with mismatched field count"
            );
            skipped += 1;
            continue;
        }
        let row: Row = headers
            .iter()
            .zip(record)
            .map(|(name, value)| (name.clone(), value.trim().to_string()))
            .collect();
        rows.push(row);
    }

    CsvTable {
        headers,
        rows,
        skipped,
    }
}

/// Split raw text into records of untrimmed fields, dropping blank records.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if record.iter().any(|f| !f.trim().is_empty()) {
        records.push(record);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
