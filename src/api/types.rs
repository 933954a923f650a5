use crate::agent::TurnOutcome;
use crate::modules::analysis::Analysis;
use crate::modules::emotion::EmotionSnapshot;
use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_ID: &str = "cosmo";
pub const DEFAULT_USER_NAME: &str = "Dear";

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_user_name() -> String {
    DEFAULT_USER_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default)]
    pub text: String,
}

impl TurnRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            user_id: default_user_id(),
            user_name: default_user_name(),
            text: text.into(),
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self.user_name = user_name.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_state: Option<EmotionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A response body paired with its HTTP-style status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    pub status: u16,
    pub body: TurnResponse,
}

impl ApiResult {
    pub fn success(outcome: TurnOutcome) -> Self {
        Self {
            status: 200,
            body: TurnResponse {
                reply: outcome.reply,
                emotion_state: Some(outcome.emotion_state),
                analysis: outcome.analysis,
                stage: Some(outcome.stage.to_string()),
                error: None,
            },
        }
    }

    pub fn error(status: u16, reply: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status,
            body: TurnResponse {
                reply: reply.into(),
                error,
                ..TurnResponse::default()
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
