//! Upload parsing: turns raw CSV or JSON bytes into a [`Dataset`].
//!
//! CSV handling is line oriented. Each non-blank line is scanned once with a
//! quote flag so commas inside double quotes stay part of the field, then each
//! field is trimmed and loses one surrounding pair of quotes. Values are
//! coerced to numbers, booleans, or null where they parse fully; everything
//! else is kept verbatim. Quoted fields never span lines and doubled quotes are
//! not unescaped.

use std::{fmt, path::Path};

use encoding_rs::{Encoding, UTF_8};
use log::debug;
use serde_json::Value as JsonValue;

use crate::{
    data::{Dataset, Row, Value},
    error::{DataError, DataResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Picks the format from the file extension; anything but `.csv`/`.json` is rejected.
    pub fn from_file_name(file_name: &str) -> DataResult<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if extension.eq_ignore_ascii_case("csv") {
            Ok(FileFormat::Csv)
        } else if extension.eq_ignore_ascii_case("json") {
            Ok(FileFormat::Json)
        } else {
            Err(DataError::UnsupportedFormat {
                file_name: file_name.to_string(),
                extension: extension.to_string(),
            })
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn parse(bytes: &[u8], file_name: &str) -> DataResult<Dataset> {
    parse_with_encoding(bytes, file_name, UTF_8)
}

pub fn parse_with_encoding(
    bytes: &[u8],
    file_name: &str,
    encoding: &'static Encoding,
) -> DataResult<Dataset> {
    let format = FileFormat::from_file_name(file_name)?;
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DataError::parse(
            file_name,
            format!("content is not valid {}", encoding.name()),
        ));
    }
    let dataset = match format {
        FileFormat::Csv => parse_csv(&text, file_name)?,
        FileFormat::Json => parse_json(&text, file_name)?,
    };
    debug!(
        "Parsed {} row(s) from '{}' as {}",
        dataset.len(),
        file_name,
        format
    );
    Ok(dataset)
}

pub fn parse_csv(text: &str, file_name: &str) -> DataResult<Dataset> {
    let lines = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    if lines.len() < 2 {
        return Err(DataError::parse(
            file_name,
            "CSV needs a header line and at least one data row",
        ));
    }

    let headers = header_names(tokenize_line(lines[0]));
    let mut rows = Vec::with_capacity(lines.len() - 1);
    for (line_idx, line) in lines.iter().enumerate().skip(1) {
        let tokens = tokenize_line(line);
        if tokens.iter().all(|token| token.is_empty()) {
            debug!("Skipping empty record on line {}", line_idx + 1);
            continue;
        }
        let mut row = Row::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let value = tokens
                .get(idx)
                .map_or(Value::Null, |token| Value::from_token(token));
            row.insert(header.as_str(), value);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DataError::parse(file_name, "CSV contains no data rows"));
    }
    Ok(Dataset::new(rows))
}

pub fn parse_json(text: &str, file_name: &str) -> DataResult<Dataset> {
    let value: JsonValue = serde_json::from_str(text)
        .map_err(|err| DataError::parse(file_name, format!("invalid JSON: {err}")))?;
    let rows = match value {
        JsonValue::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                JsonValue::Object(object) => Ok(Row::from_object(object)),
                other => Err(DataError::parse(
                    file_name,
                    format!("element {idx} is {}, expected an object", json_kind(&other)),
                )),
            })
            .collect::<DataResult<Vec<_>>>()?,
        JsonValue::Object(object) => vec![Row::from_object(object)],
        other => {
            return Err(DataError::parse(
                file_name,
                format!(
                    "top-level value is {}, expected an array or object",
                    json_kind(&other)
                ),
            ));
        }
    };
    Ok(Dataset::new(rows))
}

/// Splits one CSV line on commas that sit outside double quotes.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(finish_field(&current));
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(finish_field(&current));
    fields
}

fn finish_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
    unquoted.trim().to_string()
}

fn header_names(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .enumerate()
        .map(|(idx, token)| {
            if token.is_empty() {
                format!("field_{}", idx + 1)
            } else {
                token
            }
        })
        .collect()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
