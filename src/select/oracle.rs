//! Relevance oracle: an external model that picks files for a goal.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::OracleConfig;

const SYSTEM_PROMPT: &str = "You select the files a developer needs for a task. \
You receive a goal and a numbered list of project files. \
Reply with the numbers of the relevant files only, one number per line, most relevant first.";

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("relevance oracle disabled")]
    Disabled,

    #[error("no credential found in ${0}")]
    MissingCredential(String),

    #[error("oracle request failed: {0}")]
    Transport(String),

    #[error("oracle returned HTTP {0}")]
    Status(u16),

    #[error("malformed oracle response: {0}")]
    Malformed(String),
}

/// Anything that can answer "which of these numbered files matter for this
/// goal". The reply is raw text; index parsing happens in the selector.
pub trait RelevanceOracle {
    fn rank(&self, goal: &str, numbered_files: &str) -> Result<String, OracleError>;
}

impl<F> RelevanceOracle for F
where
    F: Fn(&str, &str) -> Result<String, OracleError>,
{
    fn rank(&self, goal: &str, numbered_files: &str) -> Result<String, OracleError> {
        self(goal, numbered_files)
    }
}

/// Oracle backed by an OpenAI-compatible chat-completions endpoint.
pub struct HttpOracle {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl HttpOracle {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from configuration, reading the credential from the configured
    /// environment variable.
    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        if !config.enabled {
            return Err(OracleError::Disabled);
        }
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| OracleError::MissingCredential(config.api_key_env.clone()))?;
        Self::new(
            config.endpoint.clone(),
            config.model.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }
}

impl RelevanceOracle for HttpOracle {
    fn rank(&self, goal: &str, numbered_files: &str) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT.to_string() },
                ChatMessage {
                    role: "user",
                    content: format!("Goal: {goal}\n\nFiles:\n{numbered_files}"),
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| OracleError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Status(status.as_u16()));
        }

        let body: ChatResponse =
            response.json().map_err(|e| OracleError::Malformed(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::Malformed("no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_yields_no_oracle() {
        let config = OracleConfig { enabled: false, ..OracleConfig::default() };
        assert!(matches!(HttpOracle::from_config(&config), Err(OracleError::Disabled)));
    }

    #[test]
    fn missing_credential_is_reported_by_variable_name() {
        let config = OracleConfig {
            api_key_env: "JYMP_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..OracleConfig::default()
        };
        match HttpOracle::from_config(&config) {
            Err(OracleError::MissingCredential(var)) => {
                assert_eq!(var, "JYMP_TEST_KEY_THAT_IS_NEVER_SET")
            }
            other => panic!("expected missing credential, got {:?}", other.err()),
        }
    }

    #[test]
    fn closures_act_as_oracles() {
        let oracle = |_goal: &str, _files: &str| Ok::<_, OracleError>("2\n1\n".to_string());
        assert_eq!(oracle.rank("goal", "1. a\n2. b").expect("rank"), "2\n1\n");
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let oracle = HttpOracle::new(
            "http://127.0.0.1:9/v1/chat/completions",
            "model",
            "key",
            Duration::from_secs(2),
        )
        .expect("client");
        assert!(matches!(oracle.rank("goal", "1. a"), Err(OracleError::Transport(_))));
    }
}
