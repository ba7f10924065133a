use std::collections::BTreeMap;

/// A tokenized chat command: an optional bare action word followed by
/// `key:value` arguments. Duplicate keys keep the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub action: Option<String>,
    pub arguments: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} `{input}` at {position}: {message}")]
pub struct ParseError {
    pub input: String,
    pub kind: &'static str,
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(
        input: &str,
        kind: &'static str,
        position: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            input: input.to_string(),
            kind,
            position,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Action,
    ExpectWhitespace,
    Whitespace,
    Key,
    ExpectValue,
    Value,
    QuotedValue,
    Escape,
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn unexpected(input: &str, position: usize, c: char, expected: &str) -> ParseError {
    ParseError::new(
        input,
        "command",
        position,
        format!("expected {expected}, got `{c}`"),
    )
}

/// Single left-to-right pass over `input`, no backtracking. With
/// `expect_action` the first bare word is the action; without it the whole
/// input is a `key:value` list. A trailing partial action, key or value is
/// accepted as-is; end of input inside a quoted value or escape is an error.
pub fn parse(input: &str, expect_action: bool) -> Result<ParsedCommand, ParseError> {
    let mut action = None;
    let mut arguments = BTreeMap::new();

    let mut state = if expect_action {
        State::Action
    } else {
        State::Whitespace
    };
    let mut key = String::new();
    let mut value = String::new();

    let mut position = 0usize;
    for c in input.chars() {
        match state {
            State::Action => {
                if is_word(c) {
                    value.push(c);
                } else if c.is_whitespace() {
                    if !value.is_empty() {
                        action = Some(std::mem::take(&mut value));
                    }
                    state = State::Whitespace;
                } else {
                    return Err(unexpected(
                        input,
                        position,
                        c,
                        "a letter, digit, underscore or whitespace",
                    ));
                }
            }
            State::ExpectWhitespace => {
                if c.is_whitespace() {
                    state = State::Whitespace;
                } else {
                    return Err(unexpected(input, position, c, "whitespace after closing quote"));
                }
            }
            State::Whitespace => {
                if is_word(c) {
                    key.push(c);
                    state = State::Key;
                } else if !c.is_whitespace() {
                    return Err(unexpected(
                        input,
                        position,
                        c,
                        "a letter, digit, underscore or whitespace",
                    ));
                }
            }
            State::Key => {
                if is_word(c) {
                    key.push(c);
                } else if c == ':' {
                    state = State::ExpectValue;
                } else {
                    return Err(unexpected(
                        input,
                        position,
                        c,
                        "a letter, digit, underscore or colon",
                    ));
                }
            }
            State::ExpectValue => {
                if c == '"' {
                    state = State::QuotedValue;
                } else if is_word(c) {
                    value.push(c);
                    state = State::Value;
                } else if c.is_whitespace() {
                    arguments.insert(std::mem::take(&mut key), std::mem::take(&mut value));
                    state = State::Whitespace;
                } else {
                    return Err(unexpected(
                        input,
                        position,
                        c,
                        "a letter, digit, underscore, whitespace or quote",
                    ));
                }
            }
            State::Value => {
                if is_word(c) {
                    value.push(c);
                } else if c.is_whitespace() {
                    arguments.insert(std::mem::take(&mut key), std::mem::take(&mut value));
                    state = State::Whitespace;
                } else {
                    return Err(unexpected(
                        input,
                        position,
                        c,
                        "a letter, digit, underscore or whitespace",
                    ));
                }
            }
            State::QuotedValue => {
                if c == '"' {
                    arguments.insert(std::mem::take(&mut key), std::mem::take(&mut value));
                    state = State::ExpectWhitespace;
                } else if c == '\\' {
                    state = State::Escape;
                } else {
                    value.push(c);
                }
            }
            State::Escape => {
                value.push(c);
                state = State::QuotedValue;
            }
        }
        position += 1;
    }

    match state {
        State::Action => {
            if !value.is_empty() {
                action = Some(value);
            }
        }
        State::Whitespace | State::ExpectWhitespace => {}
        State::Key | State::ExpectValue | State::Value => {
            arguments.insert(key, value);
        }
        State::QuotedValue | State::Escape => {
            return Err(ParseError::new(
                input,
                "command",
                position,
                "unterminated quoted value",
            ));
        }
    }

    Ok(ParsedCommand { action, arguments })
}
