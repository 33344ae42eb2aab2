use anyhow::{Context, Result};
use clap::ValueEnum;
use itertools::Itertools;
use log::info;
use serde_json::Value as JsonValue;

use crate::{
    cli::ExportArgs,
    data::{Row, Value},
    io_utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ExportFormat {
    Csv,
    Json,
    /// Same text as `csv`; no binary workbook is produced.
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv | ExportFormat::Excel => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub fn export_data(rows: &[Row], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Csv | ExportFormat::Excel => Ok(to_csv_text(rows)),
        ExportFormat::Json => {
            serde_json::to_string_pretty(&JsonValue::Array(rows.iter().map(Row::to_json).collect()))
        }
    }
}

/// Header from the first row's keys, then each row's values in its own key order.
/// Strings holding a comma are wrapped in double quotes; embedded quotes are left as-is.
pub fn to_csv_text(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let header = first.keys().join(",");
    let lines = rows.iter().map(|row| row.values().map(csv_cell).join(","));
    std::iter::once(header).chain(lines).join("\n")
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::String(s) if s.contains(',') => format!("\"{s}\""),
        other => other.as_display(),
    }
}

pub fn execute(args: &ExportArgs) -> Result<()> {
    let (name, dataset) = io_utils::load_dataset(&args.input)?;
    let encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let rendered = export_data(dataset.rows(), args.format)
        .with_context(|| format!("Serializing '{name}' as {:?}", args.format))?;
    io_utils::write_text(args.output.as_deref(), &rendered, encoding)?;
    info!(
        "Exported {} row(s) from '{}' as {:?}",
        dataset.len(),
        name,
        args.format
    );
    Ok(())
}
