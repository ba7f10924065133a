//! Pure rendering of a gathering into display text and the poll keyboard.

use super::entity::{Gathering, Reply};
use super::timeparse::TimeParser;
use crate::channels::telegram::api::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::i18n::{fill, Catalog};
use std::collections::BTreeSet;

/// The open poll body: subject header, capacity, optional end time, and the
/// three participant lists.
pub fn poll_text(gathering: &Gathering, catalog: &Catalog, time: &TimeParser) -> String {
    let until_line = match gathering.end {
        Some(end) => fill(catalog.poll_until, &[("end", &time.format(end))]),
        None => String::new(),
    };
    fill(
        catalog.poll,
        &[
            ("what", &gathering.subject),
            ("where", &place_line(gathering, catalog)),
            ("when", &when_line(gathering, catalog)),
            ("max_count", &gathering.max_count.to_string()),
            ("end", &until_line),
            ("participants_yes", &join_names(&gathering.participants_yes)),
            (
                "participants_maybe",
                &join_names(&gathering.participants_maybe),
            ),
            ("participants_no", &join_names(&gathering.participants_no)),
        ],
    )
}

/// The closed-poll results: the poll header without the end-time line, plus
/// the legionnaire shortfall note when one applies.
pub fn result_text(gathering: &Gathering, catalog: &Catalog) -> String {
    fill(
        catalog.poll_result,
        &[
            ("what", &gathering.subject),
            ("where", &place_line(gathering, catalog)),
            ("when", &when_line(gathering, catalog)),
            ("max_count", &gathering.max_count.to_string()),
            ("participants_yes", &join_names(&gathering.participants_yes)),
            (
                "participants_maybe",
                &join_names(&gathering.participants_maybe),
            ),
            ("participants_no", &join_names(&gathering.participants_no)),
            ("legionnaires", &legionnaire_note(gathering, catalog)),
        ],
    )
    .trim_end()
    .to_string()
}

/// How many unregistered players are still needed to fill the roster.
/// Everyone in `maybe` showing up gives the lower bound, nobody showing up
/// gives the upper bound; both are clamped at zero by construction.
pub fn legionnaire_note(gathering: &Gathering, catalog: &Catalog) -> String {
    let yes = gathering.participants_yes.len() as i64;
    let maybe = gathering.participants_maybe.len() as i64;
    let max_count = i64::from(gathering.max_count);

    let min_needed = (max_count - yes - maybe).max(0);
    let max_needed = max_count - yes;

    if min_needed == 1 && max_needed == 1 {
        catalog.legionnaires_one.to_string()
    } else if (min_needed > 1 || max_needed > 1) && min_needed == max_needed {
        fill(
            catalog.legionnaires_many,
            &[("count", &min_needed.to_string())],
        )
    } else if min_needed > 1 || max_needed > 1 {
        fill(
            catalog.legionnaires_many,
            &[("count", &format!("{min_needed}-{max_needed}"))],
        )
    } else {
        String::new()
    }
}

/// Fixed 2x2 answer keyboard: affirm/maybe on top, decline/remove below.
pub fn poll_keyboard(catalog: &Catalog) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![
                button(catalog.button_yes, Reply::Yes),
                button(catalog.button_maybe, Reply::Maybe),
            ],
            vec![
                button(catalog.button_no, Reply::No),
                button(catalog.button_remove, Reply::Remove),
            ],
        ],
    }
}

fn button(text: &str, reply: Reply) -> InlineKeyboardButton {
    InlineKeyboardButton {
        text: text.to_string(),
        callback_data: reply.as_str().to_string(),
    }
}

fn place_line(gathering: &Gathering, catalog: &Catalog) -> String {
    match &gathering.place {
        Some(place) => fill(catalog.poll_where, &[("place", place)]),
        None => String::new(),
    }
}

fn when_line(gathering: &Gathering, catalog: &Catalog) -> String {
    match &gathering.when {
        Some(when) => fill(catalog.poll_when, &[("when", when)]),
        None => String::new(),
    }
}

fn join_names(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        return String::new();
    }
    let mut joined = String::new();
    for name in names {
        joined.push('\n');
        joined.push_str(name);
    }
    joined
}
