//! Gemini-backed decision oracle.
//!
//! Sends the battle context as a prompt to the `generateContent` endpoint with a
//! JSON response schema, then decodes the reply strictly into an
//! [`OracleDecision`]. Anything that does not decode is an error for the
//! battle's fallback to handle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::ai::oracle::{DecisionContext, DecisionOracle, OracleDecision};
use crate::config::GeminiConfig;
use crate::error::OracleError;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: i32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

fn decision_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "moveIndex": { "type": "INTEGER", "description": "The index of the move to use (0-3)." },
            "commentary": { "type": "STRING", "description": "Short battle commentary." }
        },
        "required": ["moveIndex", "commentary"]
    })
}

impl GeminiClient {
    /// `model` is a Gemini model name such as "gemini-2.0-flash".
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(config.api_key.clone(), config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one prompt and returns the first candidate's text with any
    /// markdown fence removed.
    pub async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_URL, self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 256,
                response_mime_type: "application/json".to_string(),
                response_schema: decision_schema(),
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)?;

        if let Some(error) = gemini_response.error {
            return Err(OracleError::Api(error.message));
        }

        let text = gemini_response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(OracleError::EmptyResponse)?;

        Ok(strip_code_fence(&text).to_string())
    }
}

fn strip_code_fence(text: &str) -> &str {
    let fenced = text
        .split("```json")
        .nth(1)
        .or_else(|| text.split("```").nth(1));
    match fenced {
        Some(inner) => inner.split("```").next().unwrap_or(inner).trim(),
        None => text.trim(),
    }
}

/// Decodes a reply body into a decision. Missing or extra fields are errors.
pub fn decode_decision(text: &str) -> Result<OracleDecision, OracleError> {
    Ok(serde_json::from_str(strip_code_fence(text))?)
}

/// Build the move-selection prompt for the side described by `context`.
pub fn build_move_prompt(context: &DecisionContext) -> String {
    let moves = context
        .moves
        .iter()
        .map(|m| format!("{}: {} (Type: {}, Power: {})", m.index, m.name, m.element, m.power))
        .collect::<Vec<_>>()
        .join("\n");
    let last_index = context.moves.len().saturating_sub(1);

    format!(
        r#"You are playing a Pokemon battle.
You are controlling: {me} (HP: {me_hp}/{me_max}, Type: {me_type}).
Your opponent is: {foe} (HP: {foe_hp}/{foe_max}, Type: {foe_type}).

Here are your available moves:
{moves}

Type effectiveness chart reminder:
Water > Fire
Fire > Grass
Grass > Water
Electric > Water

Select the best move index (0-{last_index}) to defeat the opponent. Consider type effectiveness.
Also provide a short, exciting, in-character commentary (max 1 sentence) as if the Pokemon or its trainer is speaking.
The response must be a JSON object with the keys "moveIndex" and "commentary"."#,
        me = context.controlled.name,
        me_hp = context.controlled.hp,
        me_max = context.controlled.max_hp,
        me_type = context.controlled.element,
        foe = context.foe.name,
        foe_hp = context.foe.hp,
        foe_max = context.foe.max_hp,
        foe_type = context.foe.element,
        moves = moves,
        last_index = last_index,
    )
}

pub struct GeminiOracle {
    client: GeminiClient,
}

impl GeminiOracle {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(GeminiClient::from_config(config))
    }
}

#[async_trait]
impl DecisionOracle for GeminiOracle {
    async fn choose_move(&self, context: &DecisionContext) -> Result<OracleDecision, OracleError> {
        let prompt = build_move_prompt(context);
        let text = self.client.generate(&prompt).await?;
        debug!(model = self.client.model(), reply = %text, "gemini replied");
        decode_decision(&text)
    }
}
