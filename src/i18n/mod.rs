//! Localized message catalog. Handlers pass template names and arguments;
//! no display language is ever hardcoded outside this module.

/// One locale's message table. All templates use `{{name}}` placeholders
/// filled by [`fill`]. Text is Telegram HTML (`parse_mode=HTML`).
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub help: &'static str,

    pub not_created: &'static str,
    pub not_edited: &'static str,
    pub start_time_in_past: &'static str,
    pub end_time_in_past: &'static str,
    pub end_time_earlier_than_start: &'static str,
    pub no_participants: &'static str,
    pub no_subject: &'static str,
    pub no_edits: &'static str,

    pub need_to_reply_created: &'static str,
    pub need_to_reply_gathering: &'static str,
    pub need_to_reply_created_or_gathering: &'static str,
    pub no_gathering: &'static str,
    pub gathering_not_running: &'static str,
    pub gathering_already_running: &'static str,

    pub created: &'static str,
    pub cancelled: &'static str,

    pub edited: &'static str,
    pub edited_start: &'static str,
    pub edited_end: &'static str,
    pub edited_max: &'static str,
    pub edited_what: &'static str,
    pub edited_where: &'static str,
    pub edited_when: &'static str,

    pub button_yes: &'static str,
    pub button_maybe: &'static str,
    pub button_no: &'static str,
    pub button_remove: &'static str,

    pub poll: &'static str,
    pub poll_where: &'static str,
    pub poll_when: &'static str,
    pub poll_until: &'static str,
    pub poll_result: &'static str,
    pub legionnaires_one: &'static str,
    pub legionnaires_many: &'static str,

    pub telegram_error: &'static str,
    pub unknown_command: &'static str,
    pub invalid_command: &'static str,
}

pub static EN: Catalog = Catalog {
    help: "Gather Bot - bot to simplify gathering a team for an event.\n\
\n\
Available commands:\n\
* <b>help</b> - this help.\n\
\n\
* <b>schedule</b> or <b>plan</b> - schedule a gathering, parameters (all parameters are optional unless stated otherwise):\n\
  - <i>start</i>: gathering start time in <code>[[[YYYY-]MM-]DD'T']HH[:mm[:ss]]</code> format\n\
    where missing date parts are equal to the ones of today, missing time parts are equal to zero,\n\
    by default the gathering starts at the time of the schedule message being sent;\n\
  - <i>end</i>: gathering end time in the same format, only manual stop by default;\n\
  - <i>max</i>: the maximum number of participants, 6 by default;\n\
  - <i>what</i>: event name, a required parameter;\n\
  - <i>where</i>: event place, empty by default;\n\
  - <i>when</i>: event time, empty by default.\n\
\n\
* <b>start</b> - manual gathering start, this command should be sent in response to the gathering schedule message.\n\
\n\
* <b>stop</b> - manual gathering stop, this command should be sent in response to the gathering poll.\n\
\n\
* <b>cancel</b> - gathering cancellation, this command should be sent in response either to the gathering schedule message or to the gathering poll.\n\
\n\
* <b>edit</b> - gathering edit, accepts the same parameters as <b>schedule</b>.\n\
\n\
Upon reaching the gathering end time or receiving the <b>stop</b> command, the gathering poll is closed and the results message is sent.",

    not_created: "<i>Gathering not created.</i>\n{{errors}}",
    not_edited: "<i>Gathering \"<b>{{what}}</b>\" not changed.</i>\n{{errors}}",
    start_time_in_past: "- <i>Start time is already in the past.</i>",
    end_time_in_past: "- <i>End time is already in the past.</i>",
    end_time_earlier_than_start: "- <i>End time is earlier than start time.</i>",
    no_participants: "- <i>No participants planned.</i>",
    no_subject: "- <i>Gathering subject not set.</i>",
    no_edits: "<i>No gathering edits.</i>",

    need_to_reply_created: "<i>The command must be executed as a reply to the message about gathering creation.</i>",
    need_to_reply_gathering: "<i>The command must be executed as a reply to the gathering message.</i>",
    need_to_reply_created_or_gathering: "<i>The command must be executed as a reply to the message about gathering creation or to the gathering message.</i>",
    no_gathering: "<i>Gathering not found.</i>",
    gathering_not_running: "<i>Gathering is not running.</i>",
    gathering_already_running: "<i>Gathering is already running.</i>",

    created: "Gathering \"<b>{{what}}</b>\" created. Starts <b>{{start}}</b>.",
    cancelled: "Gathering \"<b>{{what}}</b>\" cancelled.",

    edited: "Gathering \"<b>{{what}}</b>\" changed:\n{{edits}}",
    edited_start: "- New start: {{start}}",
    edited_end: "- New end: {{end}}",
    edited_max: "- New participants count: {{count}}",
    edited_what: "- New subject: {{what}}",
    edited_where: "- New place: {{place}}",
    edited_when: "- New time: {{when}}",

    button_yes: "\u{2705} I will be",
    button_maybe: "\u{2753} Maybe",
    button_no: "\u{1f6ab} I won't be",
    button_remove: "\u{274c} Remove my answer",

    poll: "What: <b>{{what}}</b>{{where}}{{when}}\n\
Participants: <b>{{max_count}}</b>{{end}}\n\
\n\
\u{2705} <b>Will be</b>:{{participants_yes}}\n\
\n\
\u{2753} <b>Maybe</b>:{{participants_maybe}}\n\
\n\
\u{1f6ab} <b>Won't be</b>:{{participants_no}}",
    poll_where: "\nWhere: <b>{{place}}</b>",
    poll_when: "\nWhen: <b>{{when}}</b>",
    poll_until: "\nGathering until: <b>{{end}}</b>",
    poll_result: "What: <b>{{what}}</b>{{where}}{{when}}\n\
Participants: <b>{{max_count}}</b>\n\
\n\
\u{2705} <b>Will be</b>:{{participants_yes}}\n\
\n\
\u{2753} <b>Maybe</b>:{{participants_maybe}}\n\
\n\
\u{1f6ab} <b>Won't be</b>:{{participants_no}}\n\
\n\
{{legionnaires}}",
    legionnaires_one: "<b>One</b> more legionnaire might be needed.",
    legionnaires_many: "<b>{{count}}</b> more legionnaires might be needed.",

    telegram_error: "<i>Telegram error occurred: {{code}}\n{{description}}</i>",
    unknown_command: "<i>Unknown command: {{command}}.</i>",
    invalid_command: "<i>Invalid command: \"{{command}}\".</i>",
};

/// Unknown locales fall back to English.
pub fn catalog_for(locale: &str) -> &'static Catalog {
    match locale {
        "en" => &EN,
        _ => &EN,
    }
}

/// Fill `{{name}}` placeholders from the argument list. Tokens with no
/// matching argument are left in place verbatim.
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut rendered = String::new();
    let mut cursor = template;
    while let Some(start) = cursor.find("{{") {
        rendered.push_str(&cursor[..start]);
        let after_open = &cursor[start + 2..];
        let Some(close_offset) = after_open.find("}}") else {
            rendered.push_str(&cursor[start..]);
            return rendered;
        };
        let token = after_open[..close_offset].trim();
        match args.iter().find(|(name, _)| *name == token) {
            Some((_, value)) => rendered.push_str(value),
            None => rendered.push_str(&cursor[start..start + 2 + close_offset + 2]),
        }
        cursor = &after_open[close_offset + 2..];
    }
    rendered.push_str(cursor);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_substitutes_named_tokens() {
        let rendered = fill(
            "Gathering \"{{what}}\" starts {{start}}.",
            &[("what", "Quiz"), ("start", "2024-05-01 18:00")],
        );
        assert_eq!(rendered, "Gathering \"Quiz\" starts 2024-05-01 18:00.");
    }

    #[test]
    fn fill_leaves_unknown_tokens_verbatim() {
        let rendered = fill("{{known}} and {{unknown}}", &[("known", "value")]);
        assert_eq!(rendered, "value and {{unknown}}");
    }

    #[test]
    fn fill_keeps_unclosed_braces() {
        assert_eq!(fill("broken {{token", &[("token", "x")]), "broken {{token");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let catalog = catalog_for("xx");
        assert_eq!(catalog.no_gathering, EN.no_gathering);
    }
}
