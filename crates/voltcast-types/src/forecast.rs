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

use crate::period::ForecastPeriod;
use crate::sector::SectorValues;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Backend record carrying a nested per-sector prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorForecastRaw {
    pub date: String,
    pub prediction: Option<Map<String, Value>>,
}

/// Backend record carrying flat per-model predictions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparisonRaw {
    pub date: String,
    #[serde(rename = "ANN")]
    pub ann: Option<Value>,
    #[serde(rename = "LSTM")]
    pub lstm: Option<Value>,
    #[serde(rename = "Hybrid")]
    pub hybrid: Option<Value>,
}

/// One inbound forecast record in either of the shapes the backend emits.
///
/// The shape is decided per record: anything with a `prediction` field is a
/// sector record, everything else is read as a flat model comparison.
/// Deserialization never fails; values stay untyped until normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawForecastDay {
    Sector(SectorForecastRaw),
    ModelComparison(ModelComparisonRaw),
}

impl RawForecastDay {
    pub fn date(&self) -> &str {
        match self {
            Self::Sector(raw) => &raw.date,
            Self::ModelComparison(raw) => &raw.date,
        }
    }
}

fn date_field(value: Option<Value>) -> String {
    match value {
        Some(Value::String(date)) => date,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

impl From<Value> for RawForecastDay {
    fn from(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        let date = date_field(fields.remove("date"));

        if fields.contains_key("prediction") {
            let prediction = match fields.remove("prediction") {
                Some(Value::Object(prediction)) => Some(prediction),
                _ => None,
            };
            return Self::Sector(SectorForecastRaw { date, prediction });
        }

        Self::ModelComparison(ModelComparisonRaw {
            date,
            ann: fields.remove("ANN"),
            lstm: fields.remove("LSTM"),
            hybrid: fields.remove("Hybrid"),
        })
    }
}

impl<'de> Deserialize<'de> for RawForecastDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Top-level response body of the forecast endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ForecastEnvelope {
    Flat(Vec<RawForecastDay>),
    Wrapped {
        #[serde(default)]
        forecast: Option<Vec<RawForecastDay>>,
    },
}

impl ForecastEnvelope {
    pub fn into_days(self) -> Vec<RawForecastDay> {
        match self {
            Self::Flat(days) => days,
            Self::Wrapped { forecast } => forecast.unwrap_or_default(),
        }
    }
}

/// Canonical per-day record of the sector deployment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDayNormalized {
    pub date: String,
    pub generation: f64,
    pub consumption_by_sector: SectorValues,
}

impl ForecastDayNormalized {
    pub fn total_consumption(&self) -> f64 {
        self.consumption_by_sector.total()
    }
}

/// Canonical per-day record of the model comparison deployment.
///
/// A model value the backend did not deliver stays `None` and renders "N/A".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparisonDay {
    pub date: String,
    #[serde(rename = "ANN")]
    pub ann: Option<f64>,
    #[serde(rename = "LSTM")]
    pub lstm: Option<f64>,
    #[serde(rename = "Hybrid")]
    pub hybrid: Option<f64>,
}

/// Where a batch of forecast records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Remote,
    Mock,
}

/// Records returned by one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastBatch {
    pub period: ForecastPeriod,
    pub source: DataSource,
    pub days: Vec<RawForecastDay>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prediction_field_selects_sector_shape() {
        let day: RawForecastDay = serde_json::from_value(json!({
            "date": "2024-01-01",
            "prediction": {"power_generation_by_solar_panels": 1200.5}
        }))
        .unwrap();

        match day {
            RawForecastDay::Sector(raw) => {
                assert_eq!(raw.date, "2024-01-01");
                let prediction = raw.prediction.unwrap();
                assert_eq!(
                    prediction.get("power_generation_by_solar_panels"),
                    Some(&json!(1200.5))
                );
            }
            RawForecastDay::ModelComparison(_) => panic!("expected sector record"),
        }
    }

    #[test]
    fn test_null_prediction_is_still_sector_shape() {
        let day = RawForecastDay::from(json!({"date": "2024-01-01", "prediction": null}));
        assert_eq!(
            day,
            RawForecastDay::Sector(SectorForecastRaw {
                date: "2024-01-01".to_owned(),
                prediction: None,
            })
        );
    }

    #[test]
    fn test_flat_record_is_model_comparison() {
        let day = RawForecastDay::from(json!({"date": "2024-02-03", "ANN": 101.2, "LSTM": "99.5"}));
        assert_eq!(
            day,
            RawForecastDay::ModelComparison(ModelComparisonRaw {
                date: "2024-02-03".to_owned(),
                ann: Some(json!(101.2)),
                lstm: Some(json!("99.5")),
                hybrid: None,
            })
        );
    }

    #[test]
    fn test_non_object_record_has_empty_date() {
        let day = RawForecastDay::from(json!(42));
        assert_eq!(day.date(), "");
    }

    #[test]
    fn test_envelope_accepts_both_layouts() {
        let flat: ForecastEnvelope =
            serde_json::from_value(json!([{"date": "2024-01-01", "ANN": 1}])).unwrap();
        assert_eq!(flat.into_days().len(), 1);

        let wrapped: ForecastEnvelope = serde_json::from_value(json!({
            "forecast": [{"date": "2024-01-01", "prediction": {}}, {"date": "2024-01-02", "prediction": {}}]
        }))
        .unwrap();
        assert_eq!(wrapped.into_days().len(), 2);
    }

    #[test]
    fn test_envelope_without_forecast_is_empty() {
        let missing: ForecastEnvelope = serde_json::from_value(json!({"status": "ok"})).unwrap();
        assert!(missing.into_days().is_empty());

        let null: ForecastEnvelope = serde_json::from_value(json!({"forecast": null})).unwrap();
        assert!(null.into_days().is_empty());
    }

    #[test]
    fn test_normalized_record_serializes_camel_case() {
        let day = ForecastDayNormalized {
            date: "2024-01-01".to_owned(),
            generation: 10.0,
            consumption_by_sector: SectorValues::default(),
        };
        let value = serde_json::to_value(&day).unwrap();
        assert!(value.get("consumptionBySector").is_some());
        assert_eq!(value["generation"], json!(10.0));
    }
}
