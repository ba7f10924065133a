//! The per-pass reconciliation: merges inbound interactions with the
//! time-driven tick rule, producing at most one outcome per gathering per
//! pass. `reconcile` is pure; `run_pass` wires it to the gateway and store.

use super::entity::{validate_new, GatherState, Gathering, GuardViolation, Reply};
use super::grammar;
use super::outbound::{execute_actions, OutboundAction};
use super::render;
use super::timeparse::TimeParser;
use crate::channels::telegram::api::{CallbackQuery, Message, TelegramApiClient, Update, User};
use crate::channels::telegram::TelegramError;
use crate::i18n::{catalog_for, fill, Catalog};
use crate::shared::logging::append_log_line;
use crate::shared::now_secs;
use crate::store::{BotSettings, GatherStore, StoreError};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::path::Path;

/// A cursor last touched this long ago points at interactions the gateway
/// no longer retains; it is reset and polling restarts from the live tail.
const CURSOR_STALENESS_SECS: i64 = 6 * 24 * 60 * 60;

const DEFAULT_MAX_COUNT: i64 = 6;

#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
    #[error("telegram fetch failed: {0}")]
    Fetch(#[from] TelegramError),
    #[error("invalid timezone `{0}` in bot settings; expected IANA timezone id")]
    InvalidTimezone(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub updates_processed: usize,
    pub actions_executed: usize,
    pub actions_failed: usize,
    pub gatherings_saved: usize,
}

/// Per-gathering pending outcome. `actions` stays `None` until an
/// interaction or the tick resolves the gathering; a resolved slot is never
/// touched by the tick afterwards. Interactions later in the batch replace
/// the action list but compose their entity mutations.
#[derive(Debug, Clone)]
pub struct Slot {
    pub gathering: Gathering,
    pub actions: Option<Vec<OutboundAction>>,
    pub mutated: bool,
}

/// The deterministic plan of one pass: actions to run right away (not bound
/// to any gathering), one slot per gathering, and log notes for dropped
/// interactions.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub immediate: Vec<OutboundAction>,
    pub slots: Vec<Slot>,
    pub notes: Vec<String>,
}

enum CommandOutcome {
    None,
    Immediate(Vec<OutboundAction>),
    Resolved {
        index: usize,
        actions: Vec<OutboundAction>,
        mutated: bool,
    },
    Created {
        gathering: Gathering,
        actions: Vec<OutboundAction>,
    },
    Dropped(String),
}

enum AnchorLookup {
    Missing,
    One(usize),
    Ambiguous,
}

/// Build the pass plan. Updates are handled in arrival order and the cursor
/// advances over each one whether or not it was handled successfully; the
/// tick rule then runs once for every still-unresolved gathering.
pub fn reconcile(
    updates: &[Update],
    gatherings: Vec<Gathering>,
    settings: &mut BotSettings,
    bot: &User,
    time: &TimeParser,
    catalog: &Catalog,
) -> Reconciliation {
    let mut plan = Reconciliation {
        immediate: Vec::new(),
        slots: gatherings
            .into_iter()
            .map(|gathering| Slot {
                gathering,
                actions: None,
                mutated: false,
            })
            .collect(),
        notes: Vec::new(),
    };

    let mention = format!("@{} ", bot.username.as_deref().unwrap_or(&bot.first_name));

    for update in updates {
        let outcome = if let Some(message) = update.message.as_ref() {
            match message
                .text
                .as_deref()
                .and_then(|text| text.strip_prefix(&mention))
            {
                Some(command_text) => handle_command(
                    &mut plan.slots,
                    settings,
                    message,
                    command_text.trim(),
                    time,
                    catalog,
                ),
                None => CommandOutcome::None,
            }
        } else if let Some(callback) = update.callback_query.as_ref() {
            handle_callback(&mut plan.slots, callback, time, catalog)
        } else {
            CommandOutcome::None
        };

        match outcome {
            CommandOutcome::None => {}
            CommandOutcome::Immediate(actions) => plan.immediate.extend(actions),
            CommandOutcome::Resolved {
                index,
                actions,
                mutated,
            } => {
                let slot = &mut plan.slots[index];
                slot.actions = Some(actions);
                slot.mutated |= mutated;
            }
            CommandOutcome::Created { gathering, actions } => plan.slots.push(Slot {
                gathering,
                actions: Some(actions),
                mutated: true,
            }),
            CommandOutcome::Dropped(note) => plan.notes.push(note),
        }

        settings.last_update_id = update.update_id;
    }

    for slot in plan.slots.iter_mut() {
        if slot.actions.is_some() {
            continue;
        }
        if let Some(actions) = tick(&mut slot.gathering, time, catalog) {
            slot.actions = Some(actions);
            slot.mutated = true;
        }
    }

    plan
}

/// One full batch: load, reconcile, execute, persist. Gatherings persist
/// independently; the settings row (with the advanced cursor) goes last so
/// a crash mid-pass re-delivers the in-flight batch instead of skipping it.
pub fn run_pass(
    api: &TelegramApiClient,
    store: &GatherStore,
    state_root: &Path,
) -> Result<PassReport, PassError> {
    let now = now_secs();
    let mut settings = store.load_or_init_settings()?;
    refresh_cursor(&mut settings, now);

    let tz: Tz = settings
        .timezone
        .parse()
        .map_err(|_| PassError::InvalidTimezone(settings.timezone.clone()))?;
    let catalog = catalog_for(&settings.locale);
    let time = TimeParser::new(now, tz);

    let gatherings = store.load_open_gatherings()?;
    let bot = api.get_me()?;
    let updates = api.get_updates(settings.last_update_id + 1)?;

    let mut report = PassReport {
        updates_processed: updates.len(),
        ..Default::default()
    };
    let mut plan = reconcile(&updates, gatherings, &mut settings, &bot, &time, catalog);

    for note in &plan.notes {
        let _ = append_log_line(state_root, note);
    }

    let immediate = execute_actions(api, catalog, state_root, &plan.immediate, None);
    report.actions_executed += immediate.executed;
    report.actions_failed += immediate.failed;

    for slot in plan.slots.iter_mut() {
        if let Some(actions) = slot.actions.take() {
            let executed =
                execute_actions(api, catalog, state_root, &actions, Some(&mut slot.gathering));
            report.actions_executed += executed.executed;
            report.actions_failed += executed.failed;
        }
        if slot.mutated {
            store.save_gathering(&slot.gathering)?;
            report.gatherings_saved += 1;
        }
    }

    store.save_settings(&settings)?;
    Ok(report)
}

pub(crate) fn refresh_cursor(settings: &mut BotSettings, now: i64) {
    if settings.last_update_time + CURSOR_STALENESS_SECS < now {
        settings.last_update_id = -1;
    }
    settings.last_update_time = now;
}

fn handle_command(
    slots: &mut Vec<Slot>,
    settings: &mut BotSettings,
    message: &Message,
    text: &str,
    time: &TimeParser,
    catalog: &Catalog,
) -> CommandOutcome {
    let chat_id = message.chat.id;
    let reply_to = message.message_id;

    let parsed = match grammar::parse(text, true) {
        Ok(parsed) => parsed,
        Err(_) => return invalid_command(chat_id, reply_to, text, catalog),
    };

    match parsed.action.as_deref().unwrap_or("") {
        "help" => {
            CommandOutcome::Immediate(vec![reply(chat_id, reply_to, catalog.help.to_string())])
        }
        "schedule" | "plan" => handle_schedule(
            settings,
            chat_id,
            reply_to,
            text,
            &parsed.arguments,
            time,
            catalog,
        ),
        "start" => handle_start(slots, message, time, catalog),
        "stop" => handle_stop(slots, message, time, catalog),
        "cancel" => handle_cancel(slots, message, catalog),
        "edit" => handle_edit(slots, message, text, &parsed.arguments, time, catalog),
        other => CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            fill(catalog.unknown_command, &[("command", other)]),
        )]),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_schedule(
    settings: &mut BotSettings,
    chat_id: i64,
    reply_to: i64,
    text: &str,
    arguments: &BTreeMap<String, String>,
    time: &TimeParser,
    catalog: &Catalog,
) -> CommandOutcome {
    let start = match time.parse_optional(arguments.get("start").map(String::as_str)) {
        Ok(parsed) => parsed.unwrap_or_else(|| time.now()),
        Err(_) => return invalid_command(chat_id, reply_to, text, catalog),
    };
    let end = match time.parse_optional(arguments.get("end").map(String::as_str)) {
        Ok(parsed) => parsed,
        Err(_) => return invalid_command(chat_id, reply_to, text, catalog),
    };
    let max_count = match arguments.get("max") {
        None => DEFAULT_MAX_COUNT,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) if value <= i64::from(u32::MAX) => value,
            _ => return invalid_command(chat_id, reply_to, text, catalog),
        },
    };
    let subject = arguments.get("what");

    let violations = validate_new(
        subject.map(String::as_str),
        start,
        end,
        max_count,
        time.now(),
    );
    if !violations.is_empty() {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            fill(
                catalog.not_created,
                &[("errors", &violation_list(catalog, &violations))],
            ),
        )]);
    }

    let gathering = Gathering::new(
        settings.next_gathering_id(),
        chat_id,
        start,
        end,
        max_count as u32,
        subject.cloned().unwrap_or_default(),
        arguments.get("where").cloned(),
        arguments.get("when").cloned(),
    );
    let notice = fill(
        catalog.created,
        &[("what", &gathering.subject), ("start", &time.format(start))],
    );
    let actions = vec![
        OutboundAction::Send {
            chat_id,
            reply_to: Some(reply_to),
            text: notice,
            keyboard: None,
            anchor: true,
        },
        OutboundAction::Pin {
            chat_id,
            message_id: None,
        },
    ];
    CommandOutcome::Created { gathering, actions }
}

fn handle_start(
    slots: &mut [Slot],
    message: &Message,
    time: &TimeParser,
    catalog: &Catalog,
) -> CommandOutcome {
    let chat_id = message.chat.id;
    let reply_to = message.message_id;
    let Some(target) = message.reply_to_message.as_deref() else {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            catalog.need_to_reply_created.to_string(),
        )]);
    };
    match find_by_anchor(slots, target.message_id) {
        AnchorLookup::Missing => CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            catalog.no_gathering.to_string(),
        )]),
        AnchorLookup::Ambiguous => ambiguous_anchor(target.message_id),
        AnchorLookup::One(index) => {
            let gathering = &mut slots[index].gathering;
            if gathering.state != GatherState::Scheduled {
                return CommandOutcome::Immediate(vec![reply(
                    chat_id,
                    reply_to,
                    catalog.gathering_already_running.to_string(),
                )]);
            }
            // only pull the start forward; the tick performs the actual
            // transition once it sees `now >= start`
            gathering.start = time.now();
            CommandOutcome::Resolved {
                index,
                actions: Vec::new(),
                mutated: true,
            }
        }
    }
}

fn handle_stop(
    slots: &mut [Slot],
    message: &Message,
    time: &TimeParser,
    catalog: &Catalog,
) -> CommandOutcome {
    let chat_id = message.chat.id;
    let reply_to = message.message_id;
    let Some(target) = message.reply_to_message.as_deref() else {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            catalog.need_to_reply_gathering.to_string(),
        )]);
    };
    match find_by_anchor(slots, target.message_id) {
        AnchorLookup::Missing => CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            catalog.no_gathering.to_string(),
        )]),
        AnchorLookup::Ambiguous => ambiguous_anchor(target.message_id),
        AnchorLookup::One(index) => {
            let gathering = &mut slots[index].gathering;
            if gathering.state != GatherState::Started {
                return CommandOutcome::Immediate(vec![reply(
                    chat_id,
                    reply_to,
                    catalog.gathering_not_running.to_string(),
                )]);
            }
            gathering.end = Some(time.now());
            let actions = finish_actions(gathering, time, catalog);
            CommandOutcome::Resolved {
                index,
                actions,
                mutated: true,
            }
        }
    }
}

fn handle_cancel(slots: &mut [Slot], message: &Message, catalog: &Catalog) -> CommandOutcome {
    let chat_id = message.chat.id;
    let reply_to = message.message_id;
    let Some(target) = message.reply_to_message.as_deref() else {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            catalog.need_to_reply_gathering.to_string(),
        )]);
    };
    match find_by_anchor(slots, target.message_id) {
        AnchorLookup::Missing => CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            catalog.no_gathering.to_string(),
        )]),
        AnchorLookup::Ambiguous => ambiguous_anchor(target.message_id),
        AnchorLookup::One(index) => {
            let gathering = &mut slots[index].gathering;
            // reachable when an earlier interaction in the batch already
            // stopped it; the terminal state never regresses
            if gathering.state == GatherState::Stopped {
                return CommandOutcome::Immediate(vec![reply(
                    chat_id,
                    reply_to,
                    catalog.gathering_not_running.to_string(),
                )]);
            }
            let notice = fill(catalog.cancelled, &[("what", &gathering.subject)]);
            gathering.state = GatherState::Stopped;
            CommandOutcome::Resolved {
                index,
                actions: vec![reply(chat_id, reply_to, notice)],
                mutated: true,
            }
        }
    }
}

fn handle_edit(
    slots: &mut [Slot],
    message: &Message,
    text: &str,
    arguments: &BTreeMap<String, String>,
    time: &TimeParser,
    catalog: &Catalog,
) -> CommandOutcome {
    let chat_id = message.chat.id;
    let reply_to = message.message_id;
    let Some(target) = message.reply_to_message.as_deref() else {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            catalog.need_to_reply_created_or_gathering.to_string(),
        )]);
    };
    let index = match find_by_anchor(slots, target.message_id) {
        AnchorLookup::Missing => {
            return CommandOutcome::Immediate(vec![reply(
                chat_id,
                reply_to,
                catalog.no_gathering.to_string(),
            )]);
        }
        AnchorLookup::Ambiguous => return ambiguous_anchor(target.message_id),
        AnchorLookup::One(index) => index,
    };
    if slots[index].gathering.state == GatherState::Stopped {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            catalog.gathering_not_running.to_string(),
        )]);
    }

    // grammar problems abort the whole command before any field is applied
    let new_start = match time.parse_optional(arguments.get("start").map(String::as_str)) {
        Ok(parsed) => parsed,
        Err(_) => return invalid_command(chat_id, reply_to, text, catalog),
    };
    let new_end = match time.parse_optional(arguments.get("end").map(String::as_str)) {
        Ok(parsed) => parsed,
        Err(_) => return invalid_command(chat_id, reply_to, text, catalog),
    };
    let new_max = match arguments.get("max") {
        None => None,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) if value <= i64::from(u32::MAX) => Some(value),
            _ => return invalid_command(chat_id, reply_to, text, catalog),
        },
    };

    let gathering = &mut slots[index].gathering;
    let mut edits = Vec::new();
    let mut violations = Vec::new();

    if let Some(start) = new_start {
        if gathering.start != start {
            if start < time.now() {
                violations.push(GuardViolation::StartInPast);
            } else {
                gathering.start = start;
                edits.push(fill(catalog.edited_start, &[("start", &time.format(start))]));
            }
        }
    }

    if let Some(end) = new_end {
        if gathering.end != Some(end) {
            // validated against the start supplied with this command, or
            // the current one otherwise
            let against = new_start.unwrap_or(gathering.start);
            if end < time.now() {
                violations.push(GuardViolation::EndInPast);
            } else if end < against {
                violations.push(GuardViolation::EndBeforeStart);
            } else {
                gathering.end = Some(end);
                edits.push(fill(catalog.edited_end, &[("end", &time.format(end))]));
            }
        }
    }

    if let Some(max_count) = new_max {
        if i64::from(gathering.max_count) != max_count {
            if max_count <= 0 {
                violations.push(GuardViolation::NoCapacity);
            } else {
                gathering.max_count = max_count as u32;
                edits.push(fill(
                    catalog.edited_max,
                    &[("count", &max_count.to_string())],
                ));
            }
        }
    }

    if let Some(subject) = arguments.get("what") {
        if &gathering.subject != subject {
            if subject.is_empty() {
                violations.push(GuardViolation::MissingSubject);
            } else {
                gathering.subject = subject.clone();
                edits.push(fill(catalog.edited_what, &[("what", subject)]));
            }
        }
    }

    if let Some(place) = arguments.get("where") {
        if gathering.place.as_deref() != Some(place.as_str()) {
            gathering.place = Some(place.clone());
            edits.push(fill(catalog.edited_where, &[("place", place)]));
        }
    }

    if let Some(when) = arguments.get("when") {
        if gathering.when.as_deref() != Some(when.as_str()) {
            gathering.when = Some(when.clone());
            edits.push(fill(catalog.edited_when, &[("when", when)]));
        }
    }

    if edits.is_empty() && violations.is_empty() {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            reply_to,
            fill(
                catalog.not_edited,
                &[("what", &gathering.subject), ("errors", catalog.no_edits)],
            ),
        )]);
    }

    let mut actions = Vec::new();
    if !edits.is_empty() {
        if gathering.state == GatherState::Started {
            let poll = render::poll_text(gathering, catalog, time);
            if poll != gathering.poll_text {
                if let Some(anchor) = gathering.message_id {
                    actions.push(OutboundAction::Edit {
                        chat_id: gathering.chat_id,
                        message_id: anchor,
                        text: poll.clone(),
                        keyboard: Some(render::poll_keyboard(catalog)),
                    });
                }
                gathering.poll_text = poll;
            }
        }
        actions.push(reply(
            chat_id,
            reply_to,
            fill(
                catalog.edited,
                &[("what", &gathering.subject), ("edits", &edits.join("\n"))],
            ),
        ));
    }
    if !violations.is_empty() {
        actions.push(reply(
            chat_id,
            reply_to,
            fill(
                catalog.not_edited,
                &[
                    ("what", &gathering.subject),
                    ("errors", &violation_list(catalog, &violations)),
                ],
            ),
        ));
    }

    if edits.is_empty() {
        // guard failures only: report them, nothing changed
        CommandOutcome::Immediate(actions)
    } else {
        CommandOutcome::Resolved {
            index,
            actions,
            mutated: true,
        }
    }
}

fn handle_callback(
    slots: &mut [Slot],
    callback: &CallbackQuery,
    time: &TimeParser,
    catalog: &Catalog,
) -> CommandOutcome {
    let Some(message) = callback.message.as_ref() else {
        return CommandOutcome::None;
    };
    let chat_id = message.chat.id;
    let anchor_id = message.message_id;

    let index = match find_by_anchor(slots, anchor_id) {
        AnchorLookup::Missing => {
            return CommandOutcome::Immediate(vec![reply(
                chat_id,
                anchor_id,
                catalog.no_gathering.to_string(),
            )]);
        }
        AnchorLookup::Ambiguous => return ambiguous_anchor(anchor_id),
        AnchorLookup::One(index) => index,
    };

    let gathering = &mut slots[index].gathering;
    if gathering.state != GatherState::Started {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            anchor_id,
            catalog.gathering_not_running.to_string(),
        )]);
    }

    let data = callback.data.as_deref().unwrap_or("");
    let Some(answer) = Reply::parse(data) else {
        return CommandOutcome::Immediate(vec![reply(
            chat_id,
            anchor_id,
            fill(catalog.unknown_command, &[("command", data)]),
        )]);
    };

    let name = callback.from.display_name().to_string();
    let changed = gathering.apply_reply(&name, answer);

    let mut actions = Vec::new();
    if changed {
        let poll = render::poll_text(gathering, catalog, time);
        if poll != gathering.poll_text {
            if let Some(anchor) = gathering.message_id {
                actions.push(OutboundAction::Edit {
                    chat_id: gathering.chat_id,
                    message_id: anchor,
                    text: poll.clone(),
                    keyboard: Some(render::poll_keyboard(catalog)),
                });
            }
            gathering.poll_text = poll;
        }
    }
    CommandOutcome::Resolved {
        index,
        actions,
        mutated: changed,
    }
}

fn tick(gathering: &mut Gathering, time: &TimeParser, catalog: &Catalog) -> Option<Vec<OutboundAction>> {
    match gathering.state {
        GatherState::Scheduled if time.now() >= gathering.start => {
            Some(start_actions(gathering, time, catalog))
        }
        GatherState::Started if gathering.end.is_some_and(|end| time.now() >= end) => {
            Some(finish_actions(gathering, time, catalog))
        }
        _ => None,
    }
}

fn start_actions(
    gathering: &mut Gathering,
    time: &TimeParser,
    catalog: &Catalog,
) -> Vec<OutboundAction> {
    let mut actions = Vec::new();
    // release the pin on the creation notice before the poll takes it over
    if let Some(stale) = gathering.message_id {
        actions.push(OutboundAction::Unpin {
            chat_id: gathering.chat_id,
            message_id: stale,
        });
    }
    gathering.state = GatherState::Started;
    let poll = render::poll_text(gathering, catalog, time);
    gathering.poll_text = poll.clone();
    actions.push(OutboundAction::Send {
        chat_id: gathering.chat_id,
        reply_to: None,
        text: poll,
        keyboard: Some(render::poll_keyboard(catalog)),
        anchor: true,
    });
    actions.push(OutboundAction::Pin {
        chat_id: gathering.chat_id,
        message_id: None,
    });
    actions
}

fn finish_actions(
    gathering: &mut Gathering,
    time: &TimeParser,
    catalog: &Catalog,
) -> Vec<OutboundAction> {
    let mut actions = Vec::new();
    // freeze the poll (text stays, keyboard goes) and release the pin
    if let Some(anchor) = gathering.message_id {
        actions.push(OutboundAction::Edit {
            chat_id: gathering.chat_id,
            message_id: anchor,
            text: render::poll_text(gathering, catalog, time),
            keyboard: None,
        });
        actions.push(OutboundAction::Unpin {
            chat_id: gathering.chat_id,
            message_id: anchor,
        });
    }
    actions.push(OutboundAction::Send {
        chat_id: gathering.chat_id,
        reply_to: gathering.message_id,
        text: render::result_text(gathering, catalog),
        keyboard: None,
        anchor: false,
    });
    gathering.state = GatherState::Stopped;
    actions
}

fn find_by_anchor(slots: &[Slot], message_id: i64) -> AnchorLookup {
    let mut found = None;
    for (index, slot) in slots.iter().enumerate() {
        if slot.gathering.message_id == Some(message_id) {
            if found.is_some() {
                return AnchorLookup::Ambiguous;
            }
            found = Some(index);
        }
    }
    match found {
        Some(index) => AnchorLookup::One(index),
        None => AnchorLookup::Missing,
    }
}

fn ambiguous_anchor(message_id: i64) -> CommandOutcome {
    CommandOutcome::Dropped(format!(
        "anchor message {message_id} is bound to more than one open gathering; interaction dropped"
    ))
}

fn reply(chat_id: i64, reply_to: i64, text: String) -> OutboundAction {
    OutboundAction::Send {
        chat_id,
        reply_to: Some(reply_to),
        text,
        keyboard: None,
        anchor: false,
    }
}

fn invalid_command(chat_id: i64, reply_to: i64, text: &str, catalog: &Catalog) -> CommandOutcome {
    CommandOutcome::Immediate(vec![reply(
        chat_id,
        reply_to,
        fill(catalog.invalid_command, &[("command", text)]),
    )])
}

fn violation_text(catalog: &Catalog, violation: GuardViolation) -> &'static str {
    match violation {
        GuardViolation::MissingSubject => catalog.no_subject,
        GuardViolation::StartInPast => catalog.start_time_in_past,
        GuardViolation::EndInPast => catalog.end_time_in_past,
        GuardViolation::EndBeforeStart => catalog.end_time_earlier_than_start,
        GuardViolation::NoCapacity => catalog.no_participants,
    }
}

fn violation_list(catalog: &Catalog, violations: &[GuardViolation]) -> String {
    violations
        .iter()
        .map(|violation| violation_text(catalog, *violation))
        .collect::<Vec<_>>()
        .join("\n")
}
