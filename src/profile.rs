//! Column profiling for uploaded datasets.
//!
//! Columns are taken from the first row's keys. Each column is classified by
//! its first non-null value across the dataset (number, then date, then
//! boolean, otherwise string) and summarized over every non-null value.

use anyhow::Result;
use chrono::NaiveDateTime;
use itertools::Itertools;
use log::info;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    cli::ProfileArgs,
    data::{Dataset, Value, format_number, format_temporal, parse_temporal},
    io_utils, table,
};

pub const CATEGORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DateRange {
    #[serde(serialize_with = "serialize_temporal")]
    pub min: NaiveDateTime,
    #[serde(serialize_with = "serialize_temporal")]
    pub max: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnProfile {
    Number {
        range: NumericRange,
    },
    Date {
        #[serde(rename = "dateRange")]
        date_range: DateRange,
    },
    Boolean,
    String {
        categories: Vec<Value>,
    },
}

impl ColumnProfile {
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnProfile::Number { .. } => "number",
            ColumnProfile::Date { .. } => "date",
            ColumnProfile::Boolean => "boolean",
            ColumnProfile::String { .. } => "string",
        }
    }

    /// One-line summary used by the terminal renderer.
    pub fn describe(&self) -> String {
        match self {
            ColumnProfile::Number { range } => format!(
                "min={} max={} avg={}",
                format_number(range.min),
                format_number(range.max),
                format_average(range.avg)
            ),
            ColumnProfile::Date { date_range } => format!(
                "{} .. {}",
                format_temporal(&date_range.min),
                format_temporal(&date_range.max)
            ),
            ColumnProfile::Boolean => String::new(),
            ColumnProfile::String { categories } => {
                categories.iter().map(Value::as_display).join(", ")
            }
        }
    }
}

/// Column profiles in first-row key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaProfile {
    columns: Vec<(String, ColumnProfile)>,
}

impl SchemaProfile {
    pub fn get(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, profile)| profile)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnProfile)> {
        self.columns
            .iter()
            .map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|(name, profile)| {
                vec![
                    name.to_string(),
                    profile.kind().to_string(),
                    profile.describe(),
                ]
            })
            .collect()
    }
}

impl Serialize for SchemaProfile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, profile) in &self.columns {
            map.serialize_entry(name, profile)?;
        }
        map.end()
    }
}

pub fn infer_schema(dataset: &Dataset) -> SchemaProfile {
    let Some(first) = dataset.first() else {
        return SchemaProfile::default();
    };
    let columns = first
        .keys()
        .map(|name| (name.to_string(), profile_column(dataset, name)))
        .collect();
    SchemaProfile { columns }
}

fn profile_column(dataset: &Dataset, name: &str) -> ColumnProfile {
    let values = dataset
        .iter()
        .filter_map(|row| row.get(name))
        .filter(|value| !value.is_null())
        .collect::<Vec<_>>();

    match values.first() {
        Some(Value::Number(_)) => {
            let mut accumulator = NumericAccumulator::default();
            for number in values.iter().filter_map(|value| value.to_number()) {
                accumulator.add(number);
            }
            match accumulator.finish() {
                Some(range) => ColumnProfile::Number { range },
                None => string_profile(&values),
            }
        }
        Some(Value::String(first)) if parse_temporal(first).is_some() => {
            let mut accumulator = DateAccumulator::default();
            for parsed in values.iter().filter_map(|value| match value {
                Value::String(s) => parse_temporal(s),
                _ => None,
            }) {
                accumulator.add(parsed);
            }
            match accumulator.finish() {
                Some(date_range) => ColumnProfile::Date { date_range },
                None => string_profile(&values),
            }
        }
        Some(Value::Boolean(_)) => ColumnProfile::Boolean,
        _ => string_profile(&values),
    }
}

/// Distinct values compare by type as well as text, so `1` and `"1"` stay apart.
fn string_profile(values: &[&Value]) -> ColumnProfile {
    let categories = values
        .iter()
        .unique_by(|value| value.to_json().to_string())
        .take(CATEGORY_LIMIT)
        .map(|value| (*value).clone())
        .collect();
    ColumnProfile::String { categories }
}

#[derive(Default)]
struct NumericAccumulator {
    count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumericAccumulator {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
    }

    fn finish(self) -> Option<NumericRange> {
        let (min, max) = (self.min?, self.max?);
        Some(NumericRange {
            min,
            max,
            avg: self.sum / self.count as f64,
        })
    }
}

#[derive(Default)]
struct DateAccumulator {
    min: Option<NaiveDateTime>,
    max: Option<NaiveDateTime>,
}

impl DateAccumulator {
    fn add(&mut self, value: NaiveDateTime) {
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
    }

    fn finish(self) -> Option<DateRange> {
        Some(DateRange {
            min: self.min?,
            max: self.max?,
        })
    }
}

fn format_average(value: f64) -> String {
    if value.fract() == 0.0 {
        format_number(value)
    } else {
        format!("{value:.4}")
    }
}

fn serialize_temporal<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_temporal(value))
}

pub fn execute(args: &ProfileArgs) -> Result<()> {
    let (name, dataset) = io_utils::load_dataset(&args.input)?;
    let profiles = infer_schema(&dataset);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
    } else {
        let headers = vec![
            "column".to_string(),
            "kind".to_string(),
            "summary".to_string(),
        ];
        table::print_table(&headers, &profiles.render_rows());
    }
    info!("Profiled {} column(s) from '{}'", profiles.len(), name);
    Ok(())
}
