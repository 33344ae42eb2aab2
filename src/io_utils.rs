//! Input reading, encoding resolution, and output writing.
//!
//! Every command reads its upload through [`load_dataset`] and writes rendered
//! text through [`write_text`]. The `-` path routes through stdin/stdout; stdin
//! input needs an explicit `--input-format` because the format is otherwise
//! taken from the file extension.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{cli::InputArgs, data::Dataset, synth::FieldSet, upload::Upload};

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Reads an upload named by the input arguments and parses it into a dataset.
pub fn load_dataset(args: &InputArgs) -> Result<(String, Dataset)> {
    let encoding = resolve_encoding(args.input_encoding.as_deref())?;
    let upload = Upload::read(&args.input, args.input_format.map(Into::into))?;
    let dataset = upload
        .parse(encoding)
        .with_context(|| format!("Parsing upload {:?}", args.input))?;
    Ok((upload.name, dataset))
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    if is_dash(path) {
        let mut buffer = Vec::new();
        io::Read::read_to_end(&mut io::stdin().lock(), &mut buffer)
            .context("Reading upload from stdin")?;
        Ok(buffer)
    } else {
        fs::read(path).with_context(|| format!("Opening input file {path:?}"))
    }
}

/// Writes `text` to `path` (stdout when absent or `-`), transcoding from UTF-8 if needed.
pub fn write_text(path: Option<&Path>, text: &str, encoding: &'static Encoding) -> Result<()> {
    let bytes = encode_text(text, encoding)?;
    match path {
        Some(p) if !is_dash(p) => {
            let mut writer = BufWriter::new(
                File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
            );
            writer.write_all(&bytes)?;
            writer.flush()?;
            debug!("Wrote {} byte(s) to {:?}", bytes.len(), p);
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

fn encode_text(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    if encoding == UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }
    let (encoded, _, had_errors) = encoding.encode(text);
    if had_errors {
        bail!("Failed to encode output using {}", encoding.name());
    }
    Ok(encoded.into_owned())
}

/// Loads field definitions from a JSON or YAML file, chosen by extension.
pub fn load_field_set(path: &Path) -> Result<FieldSet> {
    let raw = fs::read_to_string(path).with_context(|| format!("Opening schema file {path:?}"))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));
    let fields: FieldSet = if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing YAML schema {path:?}"))?
    } else {
        serde_json::from_str(&raw).with_context(|| format!("Parsing JSON schema {path:?}"))?
    };
    if fields.is_empty() {
        bail!("Schema file {path:?} defines no fields");
    }
    Ok(fields)
}
