use std::fs;

use anyhow::{Context, Result};
use log::info;

use crate::{
    analysis::{AnalysisService, provenance_label},
    cli::{DescribeArgs, PreviewArgs, PreviewFormat},
    config::AnalysisConfig,
    data::Row,
    export::{self, ExportFormat},
    io_utils,
    synth::{FieldSet, Synthesizer},
    table,
};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let fields = io_utils::load_field_set(&args.schema)?;
    let rows = Synthesizer::from_seed_option(args.seed).preview_rows(&fields, args.rows);
    print_rows(&fields, &rows, args.format)?;
    info!(
        "Synthesized {} preview row(s) for {} field(s) from {:?}",
        rows.len(),
        fields.len(),
        args.schema
    );
    Ok(())
}

pub fn execute_describe(args: &DescribeArgs) -> Result<()> {
    let config = AnalysisConfig::from_args(&args.ai)?;
    let service = AnalysisService::from_config(config);
    let outcome = service.schema_from_description_or_fallback(
        &args.description,
        &args.domain,
        &args.data_type,
    );
    let described = &outcome.value;
    info!(
        "Schema with {} field(s) for domain '{}' ({})",
        described.schema.len(),
        described.detected_domain,
        provenance_label(outcome.provenance)
    );

    let headers = vec![
        "field".to_string(),
        "type".to_string(),
        "description".to_string(),
    ];
    table::print_table(&headers, &described.schema.render_rows());
    println!();
    println!(
        "domain: {}  estimated rows: {}",
        described.detected_domain, described.estimated_rows
    );
    for suggestion in &described.suggestions {
        println!("- {suggestion}");
    }

    if let Some(path) = &args.schema_out {
        let text = serde_json::to_string_pretty(&described.schema)?;
        fs::write(path, text).with_context(|| format!("Writing schema to {path:?}"))?;
        info!("Saved proposed schema to {:?}", path);
    }

    if args.rows > 0 {
        println!();
        let rows =
            Synthesizer::from_seed_option(args.seed).preview_rows(&described.schema, args.rows);
        print_rows(&described.schema, &rows, PreviewFormat::Table)?;
    }
    Ok(())
}

fn print_rows(fields: &FieldSet, rows: &[Row], format: PreviewFormat) -> Result<()> {
    match format {
        PreviewFormat::Table => {
            let headers = fields
                .iter()
                .map(|field| field.name.clone())
                .collect::<Vec<_>>();
            let cells = rows
                .iter()
                .map(|row| row.values().map(|value| value.as_display()).collect())
                .collect::<Vec<Vec<String>>>();
            table::print_table(&headers, &cells);
        }
        PreviewFormat::Csv => println!("{}", export::export_data(rows, ExportFormat::Csv)?),
        PreviewFormat::Json => println!("{}", export::export_data(rows, ExportFormat::Json)?),
    }
    Ok(())
}
