use crate::config::Settings;
use crate::provider::{GenerateRequest, GenerateResult, ProviderError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Minimal client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_base: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
        }
    }

    /// Resolves the api key from the environment variable named in settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                env: settings.api_key_env.clone(),
            })?;
        Ok(Self::new(
            &settings.api_base,
            &api_key,
            &settings.model,
            Duration::from_secs(settings.request_timeout_seconds),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base,
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }

    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerateResult, ProviderError> {
        let body = build_request_body(request);
        let response = ureq::post(&self.endpoint())
            .timeout(self.timeout)
            .send_json(body)
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => ProviderError::Status {
                    status,
                    body: response.into_string().unwrap_or_default(),
                },
                other => ProviderError::Transport(other.to_string()),
            })?;

        let decoded: GenerateResponse = response
            .into_json()
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        parse_generate_response(decoded, &self.model)
    }
}

fn build_request_body(request: &GenerateRequest) -> Value {
    let mut body = json!({
        "system_instruction": {
            "parts": [{ "text": request.system_instruction }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.user_content }]
        }],
    });
    if request.enable_web_search {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    body
}

fn parse_generate_response(
    response: GenerateResponse,
    model: &str,
) -> Result<GenerateResult, ProviderError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::EmptyResponse {
            model: model.to_string(),
        })?;
    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if text.is_empty() {
        return Err(ProviderError::EmptyResponse {
            model: model.to_string(),
        });
    }
    Ok(GenerateResult { text })
}
