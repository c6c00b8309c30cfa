//! CSV artifact writer
//!
//! Flattens each (record, detail) pair into one row. Columns are the schema
//! fields of the first record, then the detail link, then every detail label
//! in first-seen order across the whole run; records missing a label get an
//! empty cell.

use crate::crawler::{DetailInfo, Record};
use crate::output::{OutputResult, OutputWriter};
use std::path::Path;

pub struct CsvWriter;

impl OutputWriter for CsvWriter {
    fn write(&self, items: &[(Record, DetailInfo)], path: &Path) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let Some((first, _)) = items.first() else {
            // No records means no knowable columns; leave an empty file.
            writer.flush()?;
            return Ok(());
        };

        let mut detail_labels: Vec<&str> = Vec::new();
        for (_, detail) in items {
            for (label, _) in detail.entries() {
                if !detail_labels.contains(&label.as_str()) {
                    detail_labels.push(label);
                }
            }
        }

        let mut header: Vec<&str> = first.fields.iter().map(|(name, _)| name.as_str()).collect();
        header.push("Link");
        header.extend(detail_labels.iter().copied());
        writer.write_record(&header)?;

        for (record, detail) in items {
            let link = record.detail_link.to_string();
            let mut row: Vec<&str> = record
                .fields
                .iter()
                .map(|(_, value)| value.as_str())
                .collect();
            row.push(&link);
            for label in &detail_labels {
                row.push(detail.get(label).unwrap_or(""));
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }
}
