pub mod api;

/// Gateway failures. `Api` carries the Bot API error envelope so the
/// orchestrator can relay code and description back to the chat.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("telegram api request failed: {0}")]
    Request(String),
    #[error("telegram api error {code}: {description}")]
    Api { code: i64, description: String },
}
