pub mod endpoints;
pub mod types;

pub use endpoints::{handle_message, handle_message_json};
pub use types::{ApiResult, TurnRequest, TurnResponse};
