// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! CSV export of forecast records.
//!
//! The header row is the key set of the first record, in insertion order.
//! Every data field is the JSON rendering of the value, so strings arrive
//! quoted and escaped while numbers stay bare. Missing or null values are
//! written as an empty JSON string (`""`). Rows are separated by `\n` with no
//! trailing line break, and an empty record list produces no file at all.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use indexmap::IndexMap;
use serde_json::{Number, Value};
use std::string::FromUtf8Error;
use thiserror::Error;
use voltcast_types::{ForecastDayNormalized, ModelComparisonDay};

pub const CSV_MIME_TYPE: &str = "text/csv";

/// Insertion-ordered field map of one exported row
pub type ExportRecord = IndexMap<String, Value>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// A finished download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

pub trait ToExportRecord {
    fn to_export_record(&self) -> ExportRecord;
}

impl ToExportRecord for ExportRecord {
    fn to_export_record(&self) -> ExportRecord {
        self.clone()
    }
}

impl ToExportRecord for ForecastDayNormalized {
    fn to_export_record(&self) -> ExportRecord {
        let mut record = ExportRecord::new();
        record.insert("date".to_owned(), Value::String(self.date.clone()));
        record.insert("generation".to_owned(), json_number(self.generation));
        for (sector, value) in self.consumption_by_sector.iter() {
            record.insert(sector.display_name().to_owned(), json_number(value));
        }
        record
    }
}

impl ToExportRecord for ModelComparisonDay {
    fn to_export_record(&self) -> ExportRecord {
        let optional = |value: Option<f64>| value.map_or(Value::Null, json_number);
        let mut record = ExportRecord::new();
        record.insert("date".to_owned(), Value::String(self.date.clone()));
        record.insert("ANN".to_owned(), optional(self.ann));
        record.insert("LSTM".to_owned(), optional(self.lstm));
        record.insert("Hybrid".to_owned(), optional(self.hybrid));
        record
    }
}

/// JSON number for a float; integral values are written without a fraction
pub fn json_number(value: f64) -> Value {
    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "integral and below 2^53, so the conversion is exact"
        )]
        let integral = value as i64;
        return Value::from(integral);
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// JSON rendering of one field; missing and null become `""`
pub fn encode_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "\"\"".to_owned(),
        Some(value) => value.to_string(),
    }
}

pub fn export_filename(days: u32) -> String {
    format!("forecast_{days}days.csv")
}

/// Encodes records as CSV text, `None` when there is nothing to export
pub fn encode_csv(records: &[ExportRecord]) -> Result<Option<String>, ExportError> {
    let Some(first) = records.first() else {
        return Ok(None);
    };
    let header: Vec<&str> = first.keys().map(String::as_str).collect();
    if header.is_empty() {
        return Ok(Some("\n".repeat(records.len())));
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|key| encode_field(record.get(*key))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)?;
    let mut content = String::from_utf8(bytes)?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(Some(content))
}

/// Builds the download for a period of `days`, `None` for an empty dataset
pub fn export_csv<R: ToExportRecord>(
    records: &[R],
    days: u32,
) -> Result<Option<CsvExport>, ExportError> {
    let rows: Vec<ExportRecord> = records.iter().map(ToExportRecord::to_export_record).collect();
    Ok(encode_csv(&rows)?.map(|content| CsvExport {
        filename: export_filename(days),
        mime_type: CSV_MIME_TYPE,
        content,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use voltcast_types::{Sector, SectorValues};

    fn record(fields: &[(&str, Value)]) -> ExportRecord {
        fields
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect()
    }

    #[test]
    fn test_numbers_are_bare() {
        let records = vec![
            record(&[("a", json!(1)), ("b", json!(2))]),
            record(&[("a", json!(3)), ("b", json!(4))]),
        ];
        assert_eq!(
            encode_csv(&records).unwrap().unwrap(),
            "a,b\n1,2\n3,4"
        );
    }

    #[test]
    fn test_strings_are_json_quoted() {
        let records = vec![record(&[
            ("date", json!("2024-01-01")),
            ("note", json!("say \"hi\", ok")),
        ])];
        assert_eq!(
            encode_csv(&records).unwrap().unwrap(),
            "date,note\n\"2024-01-01\",\"say \\\"hi\\\", ok\""
        );
    }

    #[test]
    fn test_missing_and_null_become_empty_string() {
        let records = vec![
            record(&[("a", json!(1)), ("b", json!(null))]),
            record(&[("a", json!(2))]),
        ];
        assert_eq!(
            encode_csv(&records).unwrap().unwrap(),
            "a,b\n1,\"\"\n2,\"\""
        );
    }

    #[test]
    fn test_header_follows_first_record_only() {
        let records = vec![
            record(&[("z", json!(1)), ("a", json!(2))]),
            record(&[("a", json!(3)), ("extra", json!(9)), ("z", json!(4))]),
        ];
        assert_eq!(
            encode_csv(&records).unwrap().unwrap(),
            "z,a\n1,2\n4,3"
        );
    }

    #[test]
    fn test_empty_input_produces_nothing() {
        assert_eq!(encode_csv(&[]).unwrap(), None);
        let none: Vec<ModelComparisonDay> = Vec::new();
        assert_eq!(export_csv(&none, 30).unwrap(), None);
    }

    #[test]
    fn test_model_comparison_export() {
        let days = vec![
            ModelComparisonDay {
                date: "2024-01-01".to_owned(),
                ann: Some(101.25),
                lstm: Some(99.0),
                hybrid: None,
            },
            ModelComparisonDay {
                date: "2024-01-02".to_owned(),
                ann: Some(98.5),
                lstm: Some(100.13),
                hybrid: Some(99.87),
            },
        ];
        let export = export_csv(&days, 90).unwrap().unwrap();

        assert_eq!(export.filename, "forecast_90days.csv");
        assert_eq!(export.mime_type, "text/csv");
        assert_eq!(
            export.content,
            "date,ANN,LSTM,Hybrid\n\"2024-01-01\",101.25,99,\"\"\n\"2024-01-02\",98.5,100.13,99.87"
        );
    }

    #[test]
    fn test_sector_export_columns() {
        let mut consumption = SectorValues::default();
        consumption.set(Sector::ChillerPlants, 1800.0);
        let day = ForecastDayNormalized {
            date: "2024-01-01".to_owned(),
            generation: 1250.5,
            consumption_by_sector: consumption,
        };
        let content = encode_csv(&[day.to_export_record()]).unwrap().unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("date,generation,Staff Quarters,Academic Blocks,Hostels,Chiller Plants,STP")
        );
        assert_eq!(lines.next(), Some("\"2024-01-01\",1250.5,0,0,0,1800,0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_json_number() {
        assert_eq!(json_number(3.0), json!(3));
        assert_eq!(json_number(-2.0), json!(-2));
        assert_eq!(json_number(0.5), json!(0.5));
        assert_eq!(json_number(f64::NAN), Value::Null);
    }
}
