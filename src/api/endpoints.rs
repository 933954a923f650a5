use crate::agent::{Agent, AgentError};
use crate::api::types::{ApiResult, TurnRequest};

pub const EMPTY_TEXT_REPLY: &str = "I didn't get that. Please say something!";
pub const INTERNAL_ERROR_REPLY: &str = "Sorry, something went wrong on my side. Could you try that again?";

/// Runs one turn and maps the outcome onto a status and response body.
pub async fn handle_message(agent: &Agent, request: TurnRequest) -> ApiResult {
    if request.text.trim().is_empty() {
        return ApiResult::error(400, EMPTY_TEXT_REPLY, None);
    }

    match agent
        .handle_turn(&request.user_id, &request.user_name, &request.text)
        .await
    {
        Ok(outcome) => ApiResult::success(outcome),
        Err(AgentError::Validation(_)) => ApiResult::error(400, EMPTY_TEXT_REPLY, None),
        Err(e) => {
            tracing::error!(user_id = %request.user_id, error = %e, "turn failed");
            ApiResult::error(e.status_code(), INTERNAL_ERROR_REPLY, Some(e.to_string()))
        }
    }
}

/// Same as [`handle_message`] but starting from a raw JSON body.
pub async fn handle_message_json(agent: &Agent, body: &str) -> ApiResult {
    let request: TurnRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            return ApiResult::error(400, EMPTY_TEXT_REPLY, Some(format!("Failed to parse request: {}", e)));
        }
    };

    handle_message(agent, request).await
}
