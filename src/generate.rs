use anyhow::{Context, Result};
use chrono::Utc;
use encoding_rs::UTF_8;
use log::info;

use crate::{
    analysis::{AnalysisService, GenerationConfig, GenerationReport},
    cli::GenerateArgs,
    config::AnalysisConfig,
    export, io_utils, table,
    upload::Upload,
};

pub fn execute(args: &GenerateArgs) -> Result<()> {
    let fields = io_utils::load_field_set(&args.schema)?;
    let original = match &args.sample {
        Some(path) => {
            let upload = Upload::read(path, None)?;
            let dataset = upload
                .parse(UTF_8)
                .with_context(|| format!("Parsing sample {path:?}"))?;
            Some(dataset)
        }
        None => None,
    };
    let encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let config = AnalysisConfig::from_args(&args.ai)?;
    let service = AnalysisService::from_config(config);

    let request = GenerationConfig {
        row_count: args.rows,
        domain: args.domain.clone(),
        data_type: args.data_type.clone(),
        description: args.description.clone(),
    };
    let outcome = service.generate_synthetic_data_or_fallback(&fields, &request);
    let mut report = GenerationReport::new(&outcome, args.rows, Utc::now());
    if let Some(original) = &original {
        let assessment = service.assess_quality_or_fallback(&outcome.value, original.rows());
        report = report.with_assessment(assessment);
    }

    let rendered = export::export_data(&outcome.value, args.format)
        .with_context(|| format!("Serializing generated rows as {:?}", args.format))?;
    io_utils::write_text(args.output.as_deref(), &rendered, encoding)?;

    // Rows own stdout when no output file is given.
    let headers = vec!["metric".to_string(), "value".to_string()];
    let summary = table::render_table(&headers, &report.render_rows());
    if args.output.as_deref().is_some_and(|p| !io_utils::is_dash(p)) {
        print!("{summary}");
    } else {
        eprint!("{summary}");
    }
    info!(
        "Generated {} row(s) x {} column(s) (requested {})",
        report.rows_generated, report.columns_generated, args.rows
    );
    Ok(())
}
