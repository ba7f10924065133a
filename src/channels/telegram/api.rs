use super::TelegramError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub const PARSE_MODE_HTML: &str = "HTML";

#[derive(Debug, Clone)]
pub struct TelegramApiClient {
    api_base: String,
    token: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TelegramEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

impl<T> TelegramEnvelope<T> {
    fn into_result(self) -> Result<T, TelegramError> {
        if self.ok {
            self.result
                .ok_or_else(|| TelegramError::Request("missing result in api response".to_string()))
        } else {
            Err(TelegramError::Api {
                code: self.error_code.unwrap_or(0),
                description: self
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// Participant display identity: the username when set, otherwise the
    /// first name.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditMessageText {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Clone, Serialize)]
struct GetUpdates {
    offset: i64,
    allowed_updates: [&'static str; 2],
}

impl TelegramApiClient {
    pub fn new(token: String) -> Self {
        let api_base = std::env::var("GATHERBOT_TELEGRAM_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string());
        Self { api_base, token }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.token,
            method
        )
    }

    fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TelegramError> {
        let url = self.endpoint(method);
        let payload =
            serde_json::to_value(body).map_err(|e| TelegramError::Request(e.to_string()))?;
        // the Bot API keeps its error envelope in non-2xx bodies too
        let response = match ureq::post(&url).send_json(payload) {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(err) => return Err(TelegramError::Request(err.to_string())),
        };
        let envelope: TelegramEnvelope<T> = response
            .into_json()
            .map_err(|e| TelegramError::Request(e.to_string()))?;
        envelope.into_result()
    }

    pub fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &json!({}))
    }

    /// Interactions since the given cursor, in arrival order.
    pub fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                allowed_updates: ["message", "callback_query"],
            },
        )
    }

    pub fn send_message(&self, request: &SendMessage) -> Result<Message, TelegramError> {
        self.call("sendMessage", request)
    }

    pub fn edit_message_text(&self, request: &EditMessageText) -> Result<(), TelegramError> {
        let _: serde_json::Value = self.call("editMessageText", request)?;
        Ok(())
    }

    pub fn pin_chat_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        let _: serde_json::Value = self.call(
            "pinChatMessage",
            &json!({ "chat_id": chat_id, "message_id": message_id }),
        )?;
        Ok(())
    }

    pub fn unpin_chat_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        let _: serde_json::Value = self.call(
            "unpinChatMessage",
            &json!({ "chat_id": chat_id, "message_id": message_id }),
        )?;
        Ok(())
    }
}
