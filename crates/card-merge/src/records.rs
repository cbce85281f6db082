use crate::types::{Record, Result};
use std::io::Read;
use std::path::Path;

/// Header-keyed rows of the data source, in input order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    /// Field names from the first row, in column order
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read records from CSV text whose first row names the fields.
///
/// Short rows leave their trailing fields unset.
pub fn read_records<R: Read>(reader: R) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        records.push(record);
    }

    Ok(RecordSet { headers, records })
}

pub async fn load_records(path: impl AsRef<Path>) -> Result<RecordSet> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read(&path).await?;

    let records = tokio::task::spawn_blocking(move || read_records(contents.as_slice())).await??;

    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Value of `field`, or an empty string when the record lacks it
pub fn field_value<'a>(record: &'a Record, field: &str) -> &'a str {
    record.get(field).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records_keeps_order() {
        let csv = "name,price,features\nWidget,9.99,a|b\nGadget,19.99,\n";
        let set = read_records(csv.as_bytes()).unwrap();

        assert_eq!(set.headers, vec!["name", "price", "features"]);
        assert_eq!(set.len(), 2);
        assert_eq!(field_value(&set.records[0], "name"), "Widget");
        assert_eq!(field_value(&set.records[1], "price"), "19.99");
        assert_eq!(field_value(&set.records[1], "features"), "");
    }

    #[test]
    fn test_bom_and_whitespace_in_headers() {
        let csv = "\u{feff} name , sku\nA,1\n";
        let set = read_records(csv.as_bytes()).unwrap();
        assert_eq!(set.headers, vec!["name", "sku"]);
        assert_eq!(field_value(&set.records[0], "name"), "A");
    }

    #[test]
    fn test_short_row_and_missing_field() {
        let csv = "name,price,photo\nOnly name\n";
        let set = read_records(csv.as_bytes()).unwrap();
        assert_eq!(field_value(&set.records[0], "name"), "Only name");
        assert_eq!(field_value(&set.records[0], "photo"), "");
        assert_eq!(field_value(&set.records[0], "no such field"), "");
    }

    #[test]
    fn test_header_only_is_empty() {
        let set = read_records("name,price\n".as_bytes()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.headers.len(), 2);
    }
}
