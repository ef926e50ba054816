use crate::{Category, Result, VehicleRecord, RECORD_FIELDS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

/// Records gathered by one run, in page order then in-page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub category: Category,
    records: Vec<VehicleRecord>,
}

impl ResultTable {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            records: Vec::new(),
        }
    }

    pub fn from_records(category: Category, records: Vec<VehicleRecord>) -> Self {
        Self { category, records }
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = VehicleRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VehicleRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<VehicleRecord> {
        self.records
    }

    /// Drops exact duplicates over the full record, keeping first occurrences.
    /// Returns the number of rows removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.records.len();
        let mut seen = HashSet::new();
        self.records.retain(|record| seen.insert(record.clone()));
        before - self.records.len()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        // Written explicitly so an empty table still carries its header row.
        writer.write_record(RECORD_FIELDS)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(category: Category, reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let records = reader
            .deserialize::<VehicleRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::from_records(category, records))
    }

    pub fn to_csv_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }

    pub fn from_csv_path(category: Category, path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::read_csv(category, file)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.records)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a VehicleRecord;
    type IntoIter = std::slice::Iter<'a, VehicleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
