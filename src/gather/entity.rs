use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lifecycle states, strictly monotonic: Scheduled -> Started -> Stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatherState {
    Scheduled,
    Started,
    Stopped,
}

impl GatherState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Started => "started",
            Self::Stopped => "stopped",
        }
    }
}

/// Callback payloads of the poll keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Yes,
    Maybe,
    No,
    Remove,
}

impl Reply {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(Self::Yes),
            "maybe" => Some(Self::Maybe),
            "no" => Some(Self::No),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Maybe => "maybe",
            Self::No => "no",
            Self::Remove => "remove",
        }
    }
}

/// Business-rule failures of create/edit guards. Rendering to display text
/// happens in the reconciliation layer via the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardViolation {
    MissingSubject,
    StartInPast,
    EndInPast,
    EndBeforeStart,
    NoCapacity,
}

/// The scheduled event poll. `message_id` is the anchor of the currently
/// rendered message (creation notice while Scheduled, the poll once
/// Started); `poll_text` holds the last rendered poll body so re-renders
/// with no visible change can skip the gateway edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gathering {
    pub id: String,
    pub chat_id: i64,
    #[serde(default)]
    pub message_id: Option<i64>,
    pub state: GatherState,
    pub start: i64,
    #[serde(default)]
    pub end: Option<i64>,
    pub max_count: u32,
    #[serde(default)]
    pub participants_yes: BTreeSet<String>,
    #[serde(default)]
    pub participants_maybe: BTreeSet<String>,
    #[serde(default)]
    pub participants_no: BTreeSet<String>,
    pub subject: String,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub when: Option<String>,
    #[serde(default)]
    pub poll_text: String,
}

impl Gathering {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        chat_id: i64,
        start: i64,
        end: Option<i64>,
        max_count: u32,
        subject: String,
        place: Option<String>,
        when: Option<String>,
    ) -> Self {
        Self {
            id,
            chat_id,
            message_id: None,
            state: GatherState::Scheduled,
            start,
            end,
            max_count,
            participants_yes: BTreeSet::new(),
            participants_maybe: BTreeSet::new(),
            participants_no: BTreeSet::new(),
            subject,
            place,
            when,
            poll_text: String::new(),
        }
    }

    /// Apply a participant's answer. A participant is a member of at most
    /// one of the three sets; an affirmative answer at full capacity is a
    /// silent no-op. Returns whether anything changed.
    pub fn apply_reply(&mut self, name: &str, reply: Reply) -> bool {
        match reply {
            Reply::Yes => {
                if self.participants_yes.len() as u32 >= self.max_count
                    && !self.participants_yes.contains(name)
                {
                    return false;
                }
                let added = self.participants_yes.insert(name.to_string());
                added
                    | self.participants_maybe.remove(name)
                    | self.participants_no.remove(name)
            }
            Reply::Maybe => {
                let added = self.participants_maybe.insert(name.to_string());
                added
                    | self.participants_yes.remove(name)
                    | self.participants_no.remove(name)
            }
            Reply::No => {
                let added = self.participants_no.insert(name.to_string());
                added
                    | self.participants_yes.remove(name)
                    | self.participants_maybe.remove(name)
            }
            Reply::Remove => {
                self.participants_yes.remove(name)
                    | self.participants_maybe.remove(name)
                    | self.participants_no.remove(name)
            }
        }
    }
}

/// Creation guards, in reporting order. `max_count` arrives as a raw signed
/// number so the non-positive case can be reported rather than wrapped.
pub fn validate_new(
    subject: Option<&str>,
    start: i64,
    end: Option<i64>,
    max_count: i64,
    now: i64,
) -> Vec<GuardViolation> {
    let mut violations = Vec::new();
    if subject.map_or(true, str::is_empty) {
        violations.push(GuardViolation::MissingSubject);
    }
    if start < now {
        violations.push(GuardViolation::StartInPast);
    }
    if let Some(end) = end {
        if end < now {
            violations.push(GuardViolation::EndInPast);
        }
        if end < start {
            violations.push(GuardViolation::EndBeforeStart);
        }
    }
    if max_count <= 0 {
        violations.push(GuardViolation::NoCapacity);
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gathering(max_count: u32) -> Gathering {
        Gathering::new(
            "1".to_string(),
            -100,
            1_700_000_000,
            None,
            max_count,
            "Quiz night".to_string(),
            None,
            None,
        )
    }

    fn assert_disjoint(g: &Gathering) {
        for name in &g.participants_yes {
            assert!(!g.participants_maybe.contains(name));
            assert!(!g.participants_no.contains(name));
        }
        for name in &g.participants_maybe {
            assert!(!g.participants_no.contains(name));
        }
    }

    #[test]
    fn replies_move_participant_between_sets() {
        let mut g = gathering(6);
        assert!(g.apply_reply("alice", Reply::Yes));
        assert!(g.participants_yes.contains("alice"));
        assert_disjoint(&g);

        assert!(g.apply_reply("alice", Reply::Maybe));
        assert!(g.participants_maybe.contains("alice"));
        assert!(!g.participants_yes.contains("alice"));
        assert_disjoint(&g);

        assert!(g.apply_reply("alice", Reply::No));
        assert!(g.participants_no.contains("alice"));
        assert_disjoint(&g);

        assert!(g.apply_reply("alice", Reply::Remove));
        assert!(g.participants_no.is_empty());
    }

    #[test]
    fn repeated_reply_reports_no_change() {
        let mut g = gathering(6);
        assert!(g.apply_reply("alice", Reply::Maybe));
        assert!(!g.apply_reply("alice", Reply::Maybe));
        assert!(!g.apply_reply("bob", Reply::Remove));
    }

    #[test]
    fn affirmative_reply_is_capacity_gated() {
        let mut g = gathering(1);
        assert!(g.apply_reply("alice", Reply::Yes));
        assert!(!g.apply_reply("bob", Reply::Yes));
        assert!(!g.participants_yes.contains("bob"));
        assert_eq!(g.participants_yes.len(), 1);

        // a full set still accepts answers into the other sets
        assert!(g.apply_reply("bob", Reply::Maybe));
        assert_disjoint(&g);
    }

    #[test]
    fn capacity_gate_ignores_a_participant_already_in() {
        let mut g = gathering(1);
        assert!(g.apply_reply("alice", Reply::Yes));
        assert!(!g.apply_reply("alice", Reply::Yes));
        assert!(g.participants_yes.contains("alice"));
    }

    #[test]
    fn creation_guards_report_in_order() {
        let now = 1_700_000_000;
        let violations = validate_new(None, now - 10, Some(now - 20), 0, now);
        assert_eq!(
            violations,
            vec![
                GuardViolation::MissingSubject,
                GuardViolation::StartInPast,
                GuardViolation::EndInPast,
                GuardViolation::EndBeforeStart,
                GuardViolation::NoCapacity,
            ]
        );
    }

    #[test]
    fn valid_draft_has_no_violations() {
        let now = 1_700_000_000;
        assert!(validate_new(Some("Quiz"), now, Some(now + 3600), 6, now).is_empty());
    }

    #[test]
    fn empty_subject_counts_as_missing() {
        let now = 1_700_000_000;
        assert_eq!(
            validate_new(Some(""), now, None, 6, now),
            vec![GuardViolation::MissingSubject]
        );
    }

    #[test]
    fn end_before_start_but_after_now_is_reported_once() {
        let now = 1_700_000_000;
        assert_eq!(
            validate_new(Some("Quiz"), now + 7200, Some(now + 3600), 6, now),
            vec![GuardViolation::EndBeforeStart]
        );
    }
}
