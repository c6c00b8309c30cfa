//! JSON artifact writer
//!
//! One array entry per record: the listing fields plus the detail link under
//! "record", the detail-section entries under "detail". Field order follows
//! the schema column order.

use crate::crawler::{DetailInfo, Record};
use crate::output::{OutputResult, OutputWriter};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub struct JsonWriter;

impl OutputWriter for JsonWriter {
    fn write(&self, items: &[(Record, DetailInfo)], path: &Path) -> OutputResult<()> {
        let mut out = Vec::with_capacity(items.len());

        for (record, detail) in items {
            let mut basic = Map::new();
            for (name, value) in &record.fields {
                basic.insert(name.clone(), Value::String(value.clone()));
            }
            basic.insert(
                "Link".to_string(),
                Value::String(record.detail_link.to_string()),
            );

            let detail_map: Map<String, Value> = detail
                .entries()
                .iter()
                .map(|(label, value)| (label.clone(), Value::String(value.clone())))
                .collect();

            let mut entry = Map::new();
            entry.insert("record".to_string(), Value::Object(basic));
            entry.insert("detail".to_string(), Value::Object(detail_map));
            out.push(Value::Object(entry));
        }

        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &Value::Array(out))?;
        Ok(())
    }
}
