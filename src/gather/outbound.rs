use super::entity::Gathering;
use crate::channels::telegram::api::{
    EditMessageText, InlineKeyboardMarkup, SendMessage, TelegramApiClient, PARSE_MODE_HTML,
};
use crate::channels::telegram::TelegramError;
use crate::i18n::{fill, Catalog};
use crate::shared::logging::append_log_line;
use std::path::Path;

/// One outbound chat mutation. Actions run strictly in order: a Send with
/// `anchor` set records the created message id, and a following Pin without
/// an explicit id pins that message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    Send {
        chat_id: i64,
        reply_to: Option<i64>,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
        anchor: bool,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Pin {
        chat_id: i64,
        message_id: Option<i64>,
    },
    Unpin {
        chat_id: i64,
        message_id: i64,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteReport {
    pub executed: usize,
    pub failed: usize,
}

/// Run an action list against the gateway. A failure is logged and answered
/// with a best-effort error notice to the chat; the remaining actions still
/// run. When `anchor` is given, a successful anchor-Send updates its
/// `message_id`.
pub fn execute_actions(
    api: &TelegramApiClient,
    catalog: &Catalog,
    state_root: &Path,
    actions: &[OutboundAction],
    mut anchor: Option<&mut Gathering>,
) -> ExecuteReport {
    let mut report = ExecuteReport::default();
    let mut last_sent: Option<i64> = None;

    for action in actions {
        match action {
            OutboundAction::Send {
                chat_id,
                reply_to,
                text,
                keyboard,
                anchor: tracks_anchor,
            } => {
                let request = SendMessage {
                    chat_id: *chat_id,
                    text: text.clone(),
                    parse_mode: PARSE_MODE_HTML,
                    reply_to_message_id: *reply_to,
                    reply_markup: keyboard.clone(),
                };
                match api.send_message(&request) {
                    Ok(message) => {
                        report.executed += 1;
                        if *tracks_anchor {
                            last_sent = Some(message.message_id);
                            if let Some(gathering) = anchor.as_deref_mut() {
                                gathering.message_id = Some(message.message_id);
                            }
                        }
                    }
                    Err(err) => {
                        notify_failure(api, catalog, state_root, *chat_id, *reply_to, &err);
                        report.failed += 1;
                    }
                }
            }
            OutboundAction::Edit {
                chat_id,
                message_id,
                text,
                keyboard,
            } => {
                let request = EditMessageText {
                    chat_id: *chat_id,
                    message_id: *message_id,
                    text: text.clone(),
                    parse_mode: PARSE_MODE_HTML,
                    reply_markup: keyboard.clone(),
                };
                match api.edit_message_text(&request) {
                    Ok(()) => report.executed += 1,
                    Err(err) => {
                        notify_failure(
                            api,
                            catalog,
                            state_root,
                            *chat_id,
                            Some(*message_id),
                            &err,
                        );
                        report.failed += 1;
                    }
                }
            }
            OutboundAction::Pin {
                chat_id,
                message_id,
            } => {
                let Some(message_id) = message_id.or(last_sent) else {
                    let _ = append_log_line(
                        state_root,
                        &format!("skipping pin in chat {chat_id}: no message to pin"),
                    );
                    continue;
                };
                match api.pin_chat_message(*chat_id, message_id) {
                    Ok(()) => report.executed += 1,
                    Err(err) => {
                        notify_failure(api, catalog, state_root, *chat_id, Some(message_id), &err);
                        report.failed += 1;
                    }
                }
            }
            OutboundAction::Unpin {
                chat_id,
                message_id,
            } => match api.unpin_chat_message(*chat_id, *message_id) {
                Ok(()) => report.executed += 1,
                Err(err) => {
                    notify_failure(api, catalog, state_root, *chat_id, Some(*message_id), &err);
                    report.failed += 1;
                }
            },
        }
    }

    report
}

fn notify_failure(
    api: &TelegramApiClient,
    catalog: &Catalog,
    state_root: &Path,
    chat_id: i64,
    reply_to: Option<i64>,
    err: &TelegramError,
) {
    let _ = append_log_line(state_root, &format!("telegram error: {err}"));

    let (code, description) = match err {
        TelegramError::Api { code, description } => (code.to_string(), description.clone()),
        other => ("-".to_string(), other.to_string()),
    };
    let notice = SendMessage {
        chat_id,
        text: fill(
            catalog.telegram_error,
            &[("code", &code), ("description", &description)],
        ),
        parse_mode: PARSE_MODE_HTML,
        reply_to_message_id: reply_to,
        reply_markup: None,
    };
    if let Err(nested) = api.send_message(&notice) {
        let _ = append_log_line(state_root, &format!("telegram error notice failed: {nested}"));
    }
}
