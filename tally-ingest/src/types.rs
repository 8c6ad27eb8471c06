use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One data row of a statement, keyed by its column header.
///
/// Headers keep their original casing and column order. Lookups are total and
/// never fail; a missing header is simply `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell. A header that is already present keeps its position and
    /// has its value replaced.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some((_, v)) => *v = value,
            None => self.cells.push((header, value)),
        }
    }

    /// Exact header lookup.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// First cell, in column order, whose header equals `name` after trimming
    /// and lower-casing the header. `name` is expected in normalized form.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h.trim().to_lowercase() == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

// Rows are stored as JSON objects, in column order.
impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (h, v) in &self.cells {
            map.serialize_entry(h, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RawRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column header to cell value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawRow, A::Error> {
                let mut row = RawRow::new();
                while let Some((h, v)) = access.next_entry::<String, String>()? {
                    row.insert(h, v);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Parsed tabular statement: the header row plus one `RawRow` per data line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut row = RawRow::new();
        row.insert("Date", "2024-01-01");
        row.insert("Amount", "5");
        row.insert("Date", "2024-02-02");

        assert_eq!(row.len(), 2);
        assert_eq!(row.headers().collect::<Vec<_>>(), vec!["Date", "Amount"]);
        assert_eq!(row.get("Date"), Some("2024-02-02"));
    }

    #[test]
    fn test_lookup_normalizes_headers() {
        let row: RawRow = [(" Txn_Date ", "2024-01-05"), ("AMOUNT", "10")]
            .into_iter()
            .collect();

        assert_eq!(row.lookup("txn_date"), Some("2024-01-05"));
        assert_eq!(row.lookup("amount"), Some("10"));
        assert_eq!(row.lookup("txn"), None);
        assert_eq!(row.get("amount"), None);
    }

    #[test]
    fn test_lookup_prefers_first_column() {
        let row: RawRow = [("Date", ""), ("date ", "2024-01-05")].into_iter().collect();
        assert_eq!(row.lookup("date"), Some(""));
    }

    #[test]
    fn test_json_object_keeps_column_order() {
        let row: RawRow = [("Zeta", "1"), ("Alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alpha":"2"}"#);

        let back: RawRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.headers().collect::<Vec<_>>(), vec!["Zeta", "Alpha"]);
    }
}
