//! AI-backed analysis with a fallback for every operation.
//!
//! [`AnalysisService`] builds prompts, sends them through a [`TextGenerator`],
//! and decodes the free-form reply into typed results. Decoding is isolated in
//! [`decode_object`] and [`decode_rows`], which fail with
//! [`DataError::MalformedResponse`]. The `*_or_fallback` methods never fail:
//! any service, configuration, or decoding error is logged and replaced with a
//! fixed fallback value so callers always have something to render.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value as JsonValue, json};

use crate::{
    config::AnalysisConfig,
    data::{Row, Value},
    error::{DataError, DataResult},
    gemini::{GeminiClient, TextGenerator},
    profile::SchemaProfile,
    synth::{Constraints, FieldSchema, FieldSet},
};

pub const SCHEMA_SAMPLE_ROWS: usize = 10;
pub const BIAS_SAMPLE_ROWS: usize = 20;
pub const PRIVACY_SAMPLE_ROWS: usize = 5;
pub const RELATIONSHIP_SAMPLE_ROWS: usize = 15;
pub const QUALITY_SAMPLE_ROWS: usize = 10;
pub const FALLBACK_ROW_COUNT: usize = 100;

const DEFAULT_QUALITY_SCORE: f64 = 92.0;
const DEFAULT_BIAS_SCORE: f64 = 88.0;
const DEFAULT_PRIVACY_SCORE: f64 = 85.0;
const DEFAULT_PRESERVATION_SCORE: f64 = 93.0;
const FALLBACK_QUALITY_SCORE: f64 = 85.0;
const FALLBACK_BIAS_SCORE: f64 = 80.0;
const FALLBACK_PRIVACY_SCORE: f64 = 75.0;
const FALLBACK_PRESERVATION_SCORE: f64 = 85.0;
const FALLBACK_ESTIMATED_ROWS: u64 = 1000;
const GENERATED_PRIVACY_SCORE: f64 = 95.0;
const GENERATED_BIAS_SCORE: f64 = 88.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Service,
    Fallback,
}

/// A result paired with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Outcome<T> {
    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

/// Column descriptions keyed by name. `quality` is whatever the service reports;
/// there is no default score for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSchemaAnalysis")]
pub struct SchemaAnalysis {
    pub schema: Map<String, JsonValue>,
    pub relationships: Vec<String>,
    pub quality: Option<f64>,
    pub domain: String,
    pub suggestions: Vec<String>,
}

/// Replies name the column map `schema` or `columns`, sometimes both.
#[derive(Deserialize)]
struct RawSchemaAnalysis {
    #[serde(default)]
    schema: Option<Map<String, JsonValue>>,
    #[serde(default)]
    columns: Option<Map<String, JsonValue>>,
    #[serde(default, deserialize_with = "string_list")]
    relationships: Vec<String>,
    #[serde(default, alias = "quality_score", alias = "qualityScore")]
    quality: Option<f64>,
    #[serde(default = "default_domain")]
    domain: String,
    #[serde(default, deserialize_with = "string_list")]
    suggestions: Vec<String>,
}

impl From<RawSchemaAnalysis> for SchemaAnalysis {
    fn from(raw: RawSchemaAnalysis) -> Self {
        let mut schema = raw.schema.unwrap_or_default();
        for (name, column) in raw.columns.unwrap_or_default() {
            schema.entry(name).or_insert(column);
        }
        Self {
            schema,
            relationships: raw.relationships,
            quality: raw.quality,
            domain: raw.domain,
            suggestions: raw.suggestions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasReport {
    #[serde(default = "default_bias_score", alias = "biasScore")]
    pub bias_score: f64,
    #[serde(default, alias = "biasTypes", deserialize_with = "string_list")]
    pub bias_types: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyReport {
    #[serde(default = "default_privacy_score", alias = "privacyScore")]
    pub privacy_score: f64,
    #[serde(default, alias = "pii_detected", deserialize_with = "string_list")]
    pub risks: Vec<String>,
    #[serde(
        default,
        alias = "recommended_techniques",
        deserialize_with = "string_list"
    )]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMap {
    #[serde(default = "default_preservation_score", alias = "preservationScore")]
    pub preservation_score: f64,
    #[serde(default, deserialize_with = "string_list")]
    pub relationships: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub dependencies: Vec<String>,
    #[serde(default, alias = "businessRules", deserialize_with = "string_list")]
    pub business_rules: Vec<String>,
    #[serde(default, alias = "generationOrder", deserialize_with = "string_list")]
    pub generation_order: Vec<String>,
}

/// How closely generated rows track an original sample. Sub-scores are optional
/// because replies often leave them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    #[serde(default = "default_quality_score", alias = "overallScore")]
    pub overall_score: f64,
    #[serde(default, alias = "statisticalSimilarity")]
    pub statistical_similarity: Option<f64>,
    #[serde(default, alias = "distributionPreservation")]
    pub distribution_preservation: Option<f64>,
    #[serde(default, alias = "patternConsistency")]
    pub pattern_consistency: Option<f64>,
    #[serde(default, alias = "dataValidity")]
    pub data_validity: Option<f64>,
    #[serde(default)]
    pub completeness: Option<f64>,
    #[serde(default)]
    pub consistency: Option<f64>,
    #[serde(default, alias = "qualityIssues", deserialize_with = "string_list")]
    pub quality_issues: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribedSchema {
    #[serde(default)]
    pub schema: FieldSet,
    #[serde(default, alias = "detectedDomain")]
    pub detected_domain: String,
    #[serde(default = "default_estimated_rows", alias = "estimatedRows")]
    pub estimated_rows: u64,
    #[serde(default, deserialize_with = "string_list")]
    pub relationships: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub row_count: usize,
    pub domain: String,
    pub data_type: String,
    pub description: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            row_count: FALLBACK_ROW_COUNT,
            domain: default_domain(),
            data_type: "tabular".to_string(),
            description: None,
        }
    }
}

/// Next-step hints attached to an upload analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub suggested_row_count: usize,
    pub suggested_privacy_level: String,
    pub estimated_generation_time: String,
}

impl Recommendations {
    pub fn for_upload(sample_rows: usize, privacy: &PrivacyReport) -> Self {
        let level = if privacy.risks.is_empty() {
            "medium"
        } else {
            "high"
        };
        Self {
            suggested_row_count: (sample_rows * 10).clamp(1_000, 100_000),
            suggested_privacy_level: level.to_string(),
            estimated_generation_time: "2-5 minutes".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub rows_generated: usize,
    pub columns_generated: usize,
    pub generation_time: String,
    pub quality_score: f64,
    pub privacy_score: f64,
    pub bias_score: f64,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Outcome<QualityAssessment>>,
}

impl GenerationReport {
    pub fn new(outcome: &Outcome<Vec<Row>>, requested_rows: usize, now: DateTime<Utc>) -> Self {
        let rows = &outcome.value;
        let ratio = rows.len() as f64 / requested_rows.max(1) as f64 * 100.0;
        Self {
            rows_generated: rows.len(),
            columns_generated: rows.first().map_or(0, Row::len),
            generation_time: now.to_rfc3339(),
            quality_score: ratio.clamp(80.0, 100.0),
            privacy_score: GENERATED_PRIVACY_SCORE,
            bias_score: GENERATED_BIAS_SCORE,
            provenance: outcome.provenance,
            assessment: None,
        }
    }

    /// Attaches a comparison against the original sample.
    pub fn with_assessment(mut self, assessment: Outcome<QualityAssessment>) -> Self {
        self.assessment = Some(assessment);
        self
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        let mut rows = vec![
            vec!["rows generated".to_string(), self.rows_generated.to_string()],
            vec![
                "columns generated".to_string(),
                self.columns_generated.to_string(),
            ],
            vec!["quality score".to_string(), format_score(self.quality_score)],
            vec!["privacy score".to_string(), format_score(self.privacy_score)],
            vec!["bias score".to_string(), format_score(self.bias_score)],
            vec![
                "source".to_string(),
                provenance_label(self.provenance).to_string(),
            ],
        ];
        if let Some(assessment) = &self.assessment {
            rows.push(vec![
                "assessed quality".to_string(),
                format!(
                    "{} ({})",
                    format_score(assessment.value.overall_score),
                    provenance_label(assessment.provenance)
                ),
            ]);
            rows.extend(
                assessment
                    .value
                    .quality_issues
                    .iter()
                    .map(|issue| vec!["quality issue".to_string(), issue.clone()]),
            );
        }
        rows
    }
}

pub struct AnalysisService<G = GeminiClient> {
    generator: Option<G>,
}

impl AnalysisService<GeminiClient> {
    /// Builds the Gemini-backed service; an unconfigured or unbuildable client leaves it offline.
    pub fn from_config(config: AnalysisConfig) -> Self {
        if !config.configured {
            debug!("Analysis service not configured; using fallback results");
            return Self::offline();
        }
        match GeminiClient::new(config) {
            Ok(client) => Self::with_generator(client),
            Err(err) => {
                warn!("Analysis client unavailable ({err}); using fallback results");
                Self::offline()
            }
        }
    }
}

impl<G: TextGenerator> AnalysisService<G> {
    pub fn with_generator(generator: G) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    pub fn offline() -> Self {
        Self { generator: None }
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    fn ask(&self, prompt: &str) -> DataResult<String> {
        self.generator
            .as_ref()
            .ok_or(DataError::NotConfigured)?
            .generate(prompt)
    }

    pub fn analyze_schema(&self, rows: &[Row], domain: &str) -> DataResult<SchemaAnalysis> {
        let sample = sample_json(rows, SCHEMA_SAMPLE_ROWS);
        let prompt = format!(
            "Analyze the structure of this {domain} dataset sample.\n\n\
             Sample rows:\n{sample}\n\n\
             Describe each column's type, constraints and notable patterns, list \
             relationships between columns, score overall data quality from 0 to 100, \
             name the most likely business domain, and suggest improvements for \
             synthetic generation.\n\n\
             Reply with JSON only:\n\
             {{\"schema\": {{\"<column>\": \
             {{\"type\": \"\", \"constraints\": [], \"patterns\": []}}}}, \
             \"relationships\": [], \"quality\": 0, \"domain\": \"\", \"suggestions\": []}}"
        );
        decode_object(&self.ask(&prompt)?)
    }

    pub fn detect_bias(&self, rows: &[Row], domain: &str) -> DataResult<BiasReport> {
        let sample = sample_json(rows, BIAS_SAMPLE_ROWS);
        let prompt = format!(
            "Check this {domain} dataset sample for bias: demographic, selection, \
             historical, and representation bias, plus anything specific to the domain.\n\n\
             Sample rows:\n{sample}\n\n\
             Score fairness from 0 (heavily biased) to 100 (no detectable bias) and give \
             mitigation recommendations.\n\n\
             Reply with JSON only:\n\
             {{\"bias_score\": 0, \"bias_types\": [], \"recommendations\": []}}"
        );
        decode_object(&self.ask(&prompt)?)
    }

    pub fn assess_privacy(&self, rows: &[Row], domain: &str) -> DataResult<PrivacyReport> {
        let sample = sample_json(rows, PRIVACY_SAMPLE_ROWS);
        let prompt = format!(
            "Assess privacy risk in this {domain} dataset sample. Identify personally \
             identifiable information, sensitive attributes, and re-identification or \
             linkage risks.\n\n\
             Sample rows:\n{sample}\n\n\
             Score privacy safety from 0 (high risk) to 100 (safe) and recommend \
             anonymization techniques.\n\n\
             Reply with JSON only:\n\
             {{\"privacy_score\": 0, \"risks\": [], \"recommendations\": []}}"
        );
        decode_object(&self.ask(&prompt)?)
    }

    pub fn map_relationships(&self, rows: &[Row], domain: &str) -> DataResult<RelationshipMap> {
        let sample = sample_json(rows, RELATIONSHIP_SAMPLE_ROWS);
        let prompt = format!(
            "Map the relationships in this {domain} dataset sample: column correlations, \
             functional and hierarchical dependencies, temporal ordering, and business \
             rules.\n\n\
             Sample rows:\n{sample}\n\n\
             Give the order in which columns should be generated to keep dependencies \
             intact, and score from 0 to 100 how well synthetic data can preserve them.\n\n\
             Reply with JSON only:\n\
             {{\"relationships\": [], \"dependencies\": [], \"business_rules\": [], \
             \"generation_order\": [], \"preservation_score\": 0}}"
        );
        decode_object(&self.ask(&prompt)?)
    }

    /// Compares bounded samples of generated and original rows.
    pub fn assess_quality(
        &self,
        synthetic: &[Row],
        original: &[Row],
    ) -> DataResult<QualityAssessment> {
        let synthetic = sample_json(synthetic, QUALITY_SAMPLE_ROWS);
        let original = sample_json(original, QUALITY_SAMPLE_ROWS);
        let prompt = format!(
            "Assess synthetic data quality against the original data.\n\n\
             Original sample:\n{original}\n\n\
             Synthetic sample:\n{synthetic}\n\n\
             Score from 0 to 100 the statistical similarity, distribution preservation, \
             pattern consistency, validity, completeness and consistency, then give an \
             overall score, the quality issues found, and recommendations.\n\n\
             Reply with JSON only:\n\
             {{\"overall_score\": 0, \"statistical_similarity\": 0, \
             \"distribution_preservation\": 0, \"pattern_consistency\": 0, \
             \"data_validity\": 0, \"completeness\": 0, \"consistency\": 0, \
             \"quality_issues\": [], \"recommendations\": []}}"
        );
        decode_object(&self.ask(&prompt)?)
    }

    pub fn schema_from_description(
        &self,
        description: &str,
        domain: &str,
        data_type: &str,
    ) -> DataResult<DescribedSchema> {
        let prompt = format!(
            "Design a {data_type} dataset schema for the {domain} domain from this \
             description:\n\n\"{description}\"\n\n\
             Use field types from: string, number, boolean, date, datetime, email, phone, \
             uuid, text. Give numeric fields min/max constraints and string fields a few \
             realistic examples.\n\n\
             Reply with JSON only:\n\
             {{\"schema\": {{\"<field>\": {{\"type\": \"\", \"description\": \"\", \
             \"constraints\": {{\"min\": 0, \"max\": 0, \"required\": true, \"unique\": false}}, \
             \"examples\": []}}}}, \"detected_domain\": \"\", \"estimated_rows\": 0, \
             \"relationships\": [], \"suggestions\": []}}"
        );
        let mut described: DescribedSchema = decode_object(&self.ask(&prompt)?)?;
        if described.schema.is_empty() {
            return Err(DataError::MalformedResponse(
                "schema contains no fields".to_string(),
            ));
        }
        if described.detected_domain.trim().is_empty() {
            described.detected_domain = domain.to_string();
        }
        Ok(described)
    }

    pub fn generate_synthetic_data(
        &self,
        fields: &FieldSet,
        config: &GenerationConfig,
    ) -> DataResult<Vec<Row>> {
        let schema = serde_json::to_string_pretty(fields)
            .map_err(|err| DataError::ExternalService(format!("encoding schema: {err}")))?;
        let context = config
            .description
            .as_deref()
            .map(|text| format!("Dataset description: {text}\n"))
            .unwrap_or_default();
        let prompt = format!(
            "Generate {rows} rows of realistic synthetic {data_type} data for the {domain} \
             domain.\n{context}\n\
             Field schema:\n{schema}\n\n\
             Respect every constraint, keep values varied and plausible, and never copy \
             real personal data.\n\n\
             Reply with a JSON array of row objects only.",
            rows = config.row_count,
            data_type = config.data_type,
            domain = config.domain,
        );
        decode_rows(&self.ask(&prompt)?)
    }

    pub fn analyze_schema_or_fallback(
        &self,
        rows: &[Row],
        domain: &str,
        profile: &SchemaProfile,
    ) -> Outcome<SchemaAnalysis> {
        settle(
            "schema analysis",
            self.analyze_schema(rows, domain),
            || fallback_schema_analysis(profile),
        )
    }

    pub fn detect_bias_or_fallback(&self, rows: &[Row], domain: &str) -> Outcome<BiasReport> {
        settle("bias detection", self.detect_bias(rows, domain), fallback_bias_report)
    }

    pub fn assess_privacy_or_fallback(
        &self,
        rows: &[Row],
        domain: &str,
    ) -> Outcome<PrivacyReport> {
        settle(
            "privacy assessment",
            self.assess_privacy(rows, domain),
            fallback_privacy_report,
        )
    }

    pub fn map_relationships_or_fallback(
        &self,
        rows: &[Row],
        domain: &str,
    ) -> Outcome<RelationshipMap> {
        settle(
            "relationship mapping",
            self.map_relationships(rows, domain),
            fallback_relationship_map,
        )
    }

    pub fn assess_quality_or_fallback(
        &self,
        synthetic: &[Row],
        original: &[Row],
    ) -> Outcome<QualityAssessment> {
        settle(
            "quality assessment",
            self.assess_quality(synthetic, original),
            fallback_quality_assessment,
        )
    }

    pub fn schema_from_description_or_fallback(
        &self,
        description: &str,
        domain: &str,
        data_type: &str,
    ) -> Outcome<DescribedSchema> {
        settle(
            "schema from description",
            self.schema_from_description(description, domain, data_type),
            || fallback_described_schema(domain),
        )
    }

    pub fn generate_synthetic_data_or_fallback(
        &self,
        fields: &FieldSet,
        config: &GenerationConfig,
    ) -> Outcome<Vec<Row>> {
        settle(
            "synthetic generation",
            self.generate_synthetic_data(fields, config),
            || fallback_rows(Utc::now()),
        )
    }
}

fn settle<T>(operation: &str, result: DataResult<T>, fallback: impl FnOnce() -> T) -> Outcome<T> {
    match result {
        Ok(value) => Outcome {
            value,
            provenance: Provenance::Service,
        },
        Err(err) => {
            match &err {
                DataError::NotConfigured => debug!("Skipping {operation}: {err}"),
                _ => warn!("{operation} failed, using fallback: {err}"),
            }
            Outcome {
                value: fallback(),
                provenance: Provenance::Fallback,
            }
        }
    }
}

/// Strips a surrounding Markdown code fence, then parses the remainder as JSON.
pub fn decode_object<T: DeserializeOwned>(text: &str) -> DataResult<T> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|err| DataError::MalformedResponse(err.to_string()))
}

/// Parses the span from the first `[` to the last `]` as an array of row objects.
pub fn decode_rows(text: &str) -> DataResult<Vec<Row>> {
    let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) else {
        return Err(DataError::MalformedResponse(
            "no JSON array in response".to_string(),
        ));
    };
    if end < start {
        return Err(DataError::MalformedResponse(
            "no JSON array in response".to_string(),
        ));
    }
    let items: Vec<JsonValue> = serde_json::from_str(&text[start..=end])
        .map_err(|err| DataError::MalformedResponse(err.to_string()))?;
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            JsonValue::Object(object) => Ok(Row::from_object(object)),
            _ => Err(DataError::MalformedResponse(format!(
                "row {idx} is not an object"
            ))),
        })
        .collect()
}

pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let opened = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    opened.strip_suffix("```").unwrap_or(opened).trim()
}

pub fn fallback_schema_analysis(profile: &SchemaProfile) -> SchemaAnalysis {
    let schema = profile
        .iter()
        .map(|(name, column)| (name.to_string(), json!({ "type": column.kind() })))
        .collect();
    SchemaAnalysis {
        schema,
        relationships: Vec::new(),
        quality: None,
        domain: default_domain(),
        suggestions: vec![
            "Review columns with many missing values before generating".to_string(),
            "Add constraints to numeric fields to keep generated values realistic".to_string(),
            "Enable AI analysis for relationship and pattern detection".to_string(),
        ],
    }
}

pub fn fallback_bias_report() -> BiasReport {
    BiasReport {
        bias_score: FALLBACK_BIAS_SCORE,
        bias_types: Vec::new(),
        recommendations: vec![
            "Check demographic columns for balanced representation".to_string(),
            "Compare category frequencies against the target population".to_string(),
        ],
    }
}

pub fn fallback_privacy_report() -> PrivacyReport {
    PrivacyReport {
        privacy_score: FALLBACK_PRIVACY_SCORE,
        risks: Vec::new(),
        recommendations: vec![
            "Remove or mask direct identifiers such as names, emails, and phone numbers"
                .to_string(),
            "Generalize quasi-identifiers like birth dates and postal codes".to_string(),
        ],
    }
}

pub fn fallback_relationship_map() -> RelationshipMap {
    RelationshipMap {
        preservation_score: FALLBACK_PRESERVATION_SCORE,
        relationships: Vec::new(),
        dependencies: Vec::new(),
        business_rules: Vec::new(),
        generation_order: Vec::new(),
    }
}

pub fn fallback_quality_assessment() -> QualityAssessment {
    QualityAssessment {
        overall_score: FALLBACK_QUALITY_SCORE,
        statistical_similarity: None,
        distribution_preservation: None,
        pattern_consistency: None,
        data_validity: None,
        completeness: None,
        consistency: None,
        quality_issues: Vec::new(),
        recommendations: vec![
            "Compare column distributions of generated and original rows by hand".to_string(),
        ],
    }
}

pub fn fallback_described_schema(domain: &str) -> DescribedSchema {
    let age = Constraints {
        min: Some(18.0),
        max: Some(90.0),
        ..Constraints::default()
    };
    let schema = FieldSet::new(vec![
        FieldSchema::new("id", "uuid"),
        FieldSchema::with_examples(
            "name",
            "string",
            ["Alex Morgan", "Jordan Lee", "Sam Patel", "Riley Chen"]
                .into_iter()
                .map(Value::from)
                .collect(),
        ),
        FieldSchema::new("email", "email"),
        FieldSchema::new("phone", "phone"),
        FieldSchema::with_constraints("age", "number", age),
        FieldSchema::new("active", "boolean"),
        FieldSchema::new("created_at", "date"),
    ]);
    DescribedSchema {
        schema,
        detected_domain: domain.to_string(),
        estimated_rows: FALLBACK_ESTIMATED_ROWS,
        relationships: Vec::new(),
        suggestions: vec![
            "Describe the entities and fields you need in more detail".to_string(),
            "Upload a sample file for a schema based on real structure".to_string(),
        ],
    }
}

/// Fixed rows returned when synthetic generation is unavailable.
pub fn fallback_rows(now: DateTime<Utc>) -> Vec<Row> {
    let generated_at = now.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    (0..FALLBACK_ROW_COUNT)
        .map(|i| {
            let mut row = Row::with_capacity(5);
            row.insert("id", Value::from(i as i64));
            row.insert("value", Value::String(format!("synthetic_value_{i}")));
            row.insert("category", Value::String(format!("category_{}", i % 3)));
            row.insert("score", Value::from((50 + i % 50) as i64));
            row.insert("generated_at", Value::String(generated_at.clone()));
            row
        })
        .collect()
}

pub fn provenance_label(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Service => "ai",
        Provenance::Fallback => "fallback",
    }
}

pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

fn sample_json(rows: &[Row], limit: usize) -> String {
    let sample = rows.iter().take(limit).map(Row::to_json).collect::<Vec<_>>();
    serde_json::to_string_pretty(&sample).unwrap_or_else(|_| "[]".to_string())
}

/// Accepts any JSON list, rendering non-string items as compact JSON.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<JsonValue>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .map(|item| match item {
            JsonValue::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

fn default_domain() -> String {
    "general".to_string()
}

fn default_quality_score() -> f64 {
    DEFAULT_QUALITY_SCORE
}

fn default_bias_score() -> f64 {
    DEFAULT_BIAS_SCORE
}

fn default_privacy_score() -> f64 {
    DEFAULT_PRIVACY_SCORE
}

fn default_preservation_score() -> f64 {
    DEFAULT_PRESERVATION_SCORE
}

fn default_estimated_rows() -> u64 {
    FALLBACK_ESTIMATED_ROWS
}
