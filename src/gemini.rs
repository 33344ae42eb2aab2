//! Blocking HTTP client for the Gemini `generateContent` endpoint.

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::AnalysisConfig,
    error::{DataError, DataResult},
};

const ERROR_BODY_PREVIEW: usize = 200;
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Turns a prompt into free-form model text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> DataResult<String>;
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
    }
}

#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    config: AnalysisConfig,
}

impl GeminiClient {
    pub fn new(config: AnalysisConfig) -> DataResult<Self> {
        if !config.configured {
            return Err(DataError::NotConfigured);
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("datagenesis/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn url(&self) -> String {
        generate_url(&self.config.endpoint, &self.config.model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> DataResult<String> {
        let key = self.config.api_key.as_deref().ok_or(DataError::NotConfigured)?;
        debug!(
            "Sending {} byte prompt to model '{}'",
            prompt.len(),
            self.config.model
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let response = self
            .http
            .post(self.url())
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            let preview = text.chars().take(ERROR_BODY_PREVIEW).collect::<String>();
            return Err(DataError::ExternalService(format!(
                "model returned HTTP {status}: {preview}"
            )));
        }
        extract_candidate_text(&text)
    }
}

fn generate_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    )
}

fn extract_candidate_text(body: &str) -> DataResult<String> {
    let payload: GenerateResponse = serde_json::from_str(body)
        .map_err(|err| DataError::MalformedResponse(format!("unreadable envelope: {err}")))?;
    payload
        .first_text()
        .ok_or_else(|| DataError::MalformedResponse("no candidate text in response".to_string()))
}
