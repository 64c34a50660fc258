use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::timeout;
use tracing::debug;

use crate::api::models::GenerationResult;
use crate::error::Error;
use crate::generator::Generator;

const COMPONENT_LIBRARY: &str = "@visa/nova-react";

/// Client for the external chat-completion endpoint. Builds the prompt, sends
/// one authenticated request per call, and strictly parses the JSON embedded
/// in the first candidate's text.
pub struct LlmGateway {
    client: ReqwestClient,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamRequest {
    model: String,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

impl LlmGateway {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: ReqwestClient::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        }
    }

    fn request_body(&self, prompt: &str) -> UpstreamRequest {
        UpstreamRequest {
            model: self.model.clone(),
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: build_prompt(prompt),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }
}

#[async_trait]
impl Generator for LlmGateway {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, Error> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::empty_prompt());
        }

        let fut = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send();

        let response = timeout(self.timeout, fut)
            .await
            .map_err(|_| Error::Transport("upstream request timed out".to_string()))?
            .map_err(|err| Error::Transport(format!("failed to reach upstream: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            return Err(Error::Upstream(format!(
                "upstream request failed ({status}): {body}"
            )));
        }

        let envelope: UpstreamResponse = response
            .json()
            .await
            .map_err(|err| Error::Upstream(format!("malformed upstream envelope: {err}")))?;

        let text = envelope
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .ok_or_else(|| Error::Upstream("no candidate content in response".to_string()))?;

        debug!(chars = text.len(), "received candidate text");
        parse_generation_result(text)
    }
}

/// Strips one leading code fence (with an optional language tag up to the
/// first newline) and one trailing fence. Unfenced input passes through
/// unchanged apart from whitespace trimming.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn parse_generation_result(text: &str) -> Result<GenerationResult, Error> {
    serde_json::from_str(strip_code_fence(text)).map_err(|err| {
        Error::Upstream(format!("candidate text is not a valid generation result: {err}"))
    })
}

fn build_prompt(prompt: &str) -> String {
    format!(
        "You are an expert in React and the {COMPONENT_LIBRARY} component library from the Visa Product Design System.\n\
         A developer wants to build a UI.\n\
         \n\
         Developer's description: \"{prompt}\"\n\
         \n\
         Your task:\n\
         1. Analyze the developer's request and identify the most relevant components from the {COMPONENT_LIBRARY} library.\n\
         2. Generate a single, complete, and runnable React functional component using these components.\n\
         3. The generated code must include the necessary import statements from '{COMPONENT_LIBRARY}'.\n\
         4. Use Tailwind CSS for styling to create a modern and clean layout.\n\
         5. The generated code should be a single string.\n\
         \n\
         Return your response as a JSON object matching this schema:\n\
         {{\n\
             \"suggestedComponents\": [\"Component1\", \"Component2\"],\n\
             \"codeSnippet\": \"import React from 'react';\\n...\"\n\
         }}\n"
    )
}

fn response_schema() -> Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "suggestedComponents": { "type": "ARRAY", "items": { "type": "STRING" } },
            "codeSnippet": { "type": "STRING" }
        },
        "required": ["suggestedComponents", "codeSnippet"]
    })
}
