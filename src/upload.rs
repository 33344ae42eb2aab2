//! Upload composition: read a file once, parse it, and combine local profiling
//! with the AI-backed assessments into one renderable result.

use std::path::Path;

use anyhow::{Result, bail};
use encoding_rs::Encoding;
use log::info;
use serde::Serialize;

use crate::{
    analysis::{
        AnalysisService, BiasReport, Outcome, PrivacyReport, Recommendations, RelationshipMap,
        SchemaAnalysis, format_score, provenance_label,
    },
    cli::AnalyzeArgs,
    config::AnalysisConfig,
    data::Dataset,
    error::DataResult,
    gemini::TextGenerator,
    io_utils, parser,
    parser::FileFormat,
    profile::{self, SchemaProfile},
    stats::{self, DatasetStatistics},
    table,
};

/// A named upload held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads the whole file in one call. A `format` override renames the upload to
    /// `<stem>.<ext>` so parsing follows the override; stdin requires one.
    pub fn read(path: &Path, format: Option<FileFormat>) -> Result<Self> {
        let stem = if io_utils::is_dash(path) {
            if format.is_none() {
                bail!("Reading from stdin requires --input-format");
            }
            "stdin".to_string()
        } else {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let name = match format {
            Some(format) => format!("{stem}.{}", format.extension()),
            None => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let bytes = io_utils::read_bytes(path)?;
        info!("Read {} byte(s) from {:?} as '{}'", bytes.len(), path, name);
        Ok(Self::new(name, bytes))
    }

    pub fn format(&self) -> DataResult<FileFormat> {
        FileFormat::from_file_name(&self.name)
    }

    pub fn parse(&self, encoding: &'static Encoding) -> DataResult<Dataset> {
        parser::parse_with_encoding(&self.bytes, &self.name, encoding)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadAnalysis {
    pub file_name: String,
    pub dataset: Dataset,
    pub statistics: DatasetStatistics,
    pub profiles: SchemaProfile,
    pub analysis: Outcome<SchemaAnalysis>,
    pub relationships: Outcome<RelationshipMap>,
    pub bias: Outcome<BiasReport>,
    pub privacy: Outcome<PrivacyReport>,
    pub recommendations: Recommendations,
}

/// Profiles the dataset locally, then asks the service for its analyses,
/// substituting fallbacks where the service cannot answer.
pub fn analyze_upload<G: TextGenerator>(
    file_name: impl Into<String>,
    dataset: Dataset,
    service: &AnalysisService<G>,
    domain: &str,
) -> UploadAnalysis {
    let statistics = stats::compute_statistics(&dataset);
    let profiles = profile::infer_schema(&dataset);
    let rows = dataset.rows();
    let analysis = service.analyze_schema_or_fallback(rows, domain, &profiles);
    let relationships = service.map_relationships_or_fallback(rows, domain);
    let bias = service.detect_bias_or_fallback(rows, domain);
    let privacy = service.assess_privacy_or_fallback(rows, domain);
    let recommendations = Recommendations::for_upload(dataset.len(), &privacy.value);
    UploadAnalysis {
        file_name: file_name.into(),
        dataset,
        statistics,
        profiles,
        analysis,
        relationships,
        bias,
        privacy,
        recommendations,
    }
}

impl UploadAnalysis {
    fn summary_rows(&self) -> Vec<Vec<String>> {
        let mut rows = self.statistics.render_rows();
        let quality = match self.analysis.value.quality {
            Some(score) => scored(score, &self.analysis),
            None => "n/a".to_string(),
        };
        rows.push(vec!["quality score".to_string(), quality]);
        rows.push(vec![
            "preservation score".to_string(),
            scored(
                self.relationships.value.preservation_score,
                &self.relationships,
            ),
        ]);
        rows.push(vec![
            "bias score".to_string(),
            scored(self.bias.value.bias_score, &self.bias),
        ]);
        rows.push(vec![
            "privacy score".to_string(),
            scored(self.privacy.value.privacy_score, &self.privacy),
        ]);
        rows.push(vec!["domain".to_string(), self.analysis.value.domain.clone()]);
        rows.push(vec![
            "suggested rows".to_string(),
            self.recommendations.suggested_row_count.to_string(),
        ]);
        rows.push(vec![
            "privacy level".to_string(),
            self.recommendations.suggested_privacy_level.clone(),
        ]);
        rows.push(vec![
            "estimated time".to_string(),
            self.recommendations.estimated_generation_time.clone(),
        ]);
        rows
    }

    fn notes(&self) -> Vec<Vec<String>> {
        let analysis = &self.analysis.value;
        let mapped = &self.relationships.value;
        let labelled = |source: &str, items: &[String]| {
            items
                .iter()
                .map(|item| vec![source.to_string(), item.clone()])
                .collect::<Vec<_>>()
        };
        [
            labelled("relationship", &analysis.relationships),
            labelled("relationship", &mapped.relationships),
            labelled("dependency", &mapped.dependencies),
            labelled("business rule", &mapped.business_rules),
            labelled("generation order", &mapped.generation_order),
            labelled("suggestion", &analysis.suggestions),
            labelled("bias", &self.bias.value.bias_types),
            labelled("bias fix", &self.bias.value.recommendations),
            labelled("privacy risk", &self.privacy.value.risks),
            labelled("privacy fix", &self.privacy.value.recommendations),
        ]
        .concat()
    }
}

fn scored<T>(score: f64, outcome: &Outcome<T>) -> String {
    format!(
        "{} ({})",
        format_score(score),
        provenance_label(outcome.provenance)
    )
}

pub fn execute(args: &AnalyzeArgs) -> Result<()> {
    let (name, dataset) = io_utils::load_dataset(&args.input)?;
    let config = AnalysisConfig::from_args(&args.ai)?;
    let service = AnalysisService::from_config(config);
    let result = analyze_upload(name, dataset, &service, &args.domain);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let headers = vec!["metric".to_string(), "value".to_string()];
        table::print_table(&headers, &result.summary_rows());
        println!();
        let headers = vec![
            "column".to_string(),
            "kind".to_string(),
            "summary".to_string(),
        ];
        table::print_table(&headers, &result.profiles.render_rows());
        let notes = result.notes();
        if !notes.is_empty() {
            println!();
            let headers = vec!["note".to_string(), "detail".to_string()];
            table::print_table(&headers, &notes);
        }
    }
    info!(
        "Analyzed {} row(s) across {} column(s) from '{}'",
        result.statistics.row_count, result.statistics.column_count, result.file_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::Provenance, data::Value, error::DataError};
    use encoding_rs::UTF_8;

    struct Fixed(&'static str);

    impl TextGenerator for Fixed {
        fn generate(&self, _prompt: &str) -> DataResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct Down;

    impl TextGenerator for Down {
        fn generate(&self, _prompt: &str) -> DataResult<String> {
            Err(DataError::ExternalService("connection refused".to_string()))
        }
    }

    fn dataset() -> Dataset {
        Upload::new("people.csv", b"name,age\nAlice,30\nBob,\n".to_vec())
            .parse(UTF_8)
            .unwrap()
    }

    #[test]
    fn upload_parses_by_name() {
        let dataset = dataset();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[1].get("age"), Some(&Value::Null));
        let err = Upload::new("sheet.xlsx", Vec::new()).parse(UTF_8).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat { .. }));
    }

    #[test]
    fn stdin_without_format_is_rejected() {
        let err = Upload::read(Path::new("-"), None).unwrap_err();
        assert!(err.to_string().contains("--input-format"));
    }

    #[test]
    fn format_override_renames_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.txt");
        std::fs::write(&path, "[{\"a\": 1}]").unwrap();
        let upload = Upload::read(&path, Some(FileFormat::Json)).unwrap();
        assert_eq!(upload.name, "export.json");
        assert_eq!(upload.format().unwrap(), FileFormat::Json);
        assert_eq!(upload.parse(UTF_8).unwrap().len(), 1);
    }

    #[test]
    fn failed_service_still_yields_full_result() {
        let service = AnalysisService::with_generator(Down);
        let result = analyze_upload("people.csv", dataset(), &service, "general");
        assert_eq!(result.statistics.null_value_count, 1);
        assert_eq!(result.profiles.get("age").map(|p| p.kind()), Some("number"));
        assert!(result.analysis.is_fallback());
        assert!(result.bias.is_fallback());
        assert!(result.privacy.is_fallback());
        assert!(result.relationships.is_fallback());
        assert_eq!(result.analysis.value.quality, None);
        assert_eq!(result.relationships.value.preservation_score, 85.0);
        let summary = result.summary_rows();
        assert!(summary.contains(&vec!["quality score".to_string(), "n/a".to_string()]));
        assert!(summary.contains(&vec![
            "preservation score".to_string(),
            "85 (fallback)".to_string()
        ]));
        assert_eq!(result.recommendations.suggested_row_count, 1_000);
        assert_eq!(result.recommendations.suggested_privacy_level, "medium");
    }

    #[test]
    fn service_answers_are_used() {
        let service =
            AnalysisService::with_generator(Fixed(r#"{"risks": ["name"], "bias_score": 70}"#));
        let result = analyze_upload("people.csv", dataset(), &service, "hr");
        assert_eq!(result.privacy.provenance, Provenance::Service);
        assert_eq!(result.privacy.value.privacy_score, 85.0);
        assert_eq!(result.bias.value.bias_score, 70.0);
        assert_eq!(result.relationships.value.preservation_score, 93.0);
        assert_eq!(result.recommendations.suggested_privacy_level, "high");
    }
}
