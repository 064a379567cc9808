//! Reminder composition: window + event metadata -> a platform-neutral message.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::event::EventInfo;
use crate::time::{format_instant, TimeWindow};

pub const REMINDER_TITLE: &str = "CTF challenge is starting soon !!";
pub const REMINDER_DESCRIPTION: &str = "Make sure to prepare and join in time!";
/// 0xE8D44F
pub const REMINDER_COLOR: u32 = 15258703;

pub const TIME_REMAINING_LABEL: &str = "Time Remaining";
pub const REGISTER_LABEL: &str = "Register";
pub const TIMELINE_LABEL: &str = "Challenge Time Line";

/// One labeled block of the message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    pub value: String,
    /// Hint that the section may share a row with its neighbours.
    pub compact: bool,
}

impl Section {
    fn new(label: &str, value: String, compact: bool) -> Self {
        Self {
            label: label.to_string(),
            value,
            compact,
        }
    }
}

/// Presentation block rendered above the sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub content: String,
    pub headline: Headline,
    pub sections: Vec<Section>,
}

impl NotificationMessage {
    pub fn section(&self, label: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.label == label)
    }
}

/// Build the reminder for `event`. The countdown is taken from `clock` at call time,
/// so the same inputs and the same instant always give the same message.
pub fn compose(event: &EventInfo, window: &TimeWindow, clock: &dyn Clock) -> NotificationMessage {
    let content = format!("{} incoming. Register to {} team", event.name, event.team_name);

    let register = format!(
        "Team Name: {}\nPassword: {}",
        event.team_name, event.team_credential
    );
    let timeline = format!(
        "Start at: {}\nEnd at: {}",
        format_instant(&window.start()),
        format_instant(&window.end())
    );

    NotificationMessage {
        content,
        headline: Headline {
            title: REMINDER_TITLE.to_string(),
            description: REMINDER_DESCRIPTION.to_string(),
            url: event.url.clone(),
            color: REMINDER_COLOR,
        },
        sections: vec![
            Section::new(TIME_REMAINING_LABEL, window.remaining_time(clock), true),
            Section::new(REGISTER_LABEL, register, false),
            Section::new(TIMELINE_LABEL, timeline, false),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::time::{resolve, TIMESTAMP_LAYOUT};
    use chrono::{Duration, TimeZone, Utc};

    fn punkctf() -> EventInfo {
        EventInfo::new("punkctf", "https://ctf.example.com").with_team("teamName", "teamPassword")
    }

    fn window() -> TimeWindow {
        resolve("UTC", "2024-01-01 00:00:00", "2024-02-01 00:00:00", TIMESTAMP_LAYOUT).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2023, 12, 30, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_content_and_register() {
        let msg = compose(&punkctf(), &window(), &clock());

        assert_eq!(msg.content, "punkctf incoming. Register to teamName team");
        assert_eq!(
            msg.section(REGISTER_LABEL).unwrap().value,
            "Team Name: teamName\nPassword: teamPassword"
        );
    }

    #[test]
    fn test_sections_fixed_order_and_layout() {
        let msg = compose(&punkctf(), &window(), &clock());

        let labels: Vec<&str> = msg.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, [TIME_REMAINING_LABEL, REGISTER_LABEL, TIMELINE_LABEL]);

        let compact: Vec<bool> = msg.sections.iter().map(|s| s.compact).collect();
        assert_eq!(compact, [true, false, false]);
    }

    #[test]
    fn test_timeline_uses_reporting_zone() {
        let msg = compose(&punkctf(), &window(), &clock());
        assert_eq!(
            msg.section(TIMELINE_LABEL).unwrap().value,
            "Start at: Mon, 01 Jan 2024 01:00:00 CET\nEnd at: Thu, 01 Feb 2024 01:00:00 CET"
        );
    }

    #[test]
    fn test_countdown_from_clock() {
        let msg = compose(&punkctf(), &window(), &clock());
        // 2 days to Jan 1 + 31 days of January
        assert_eq!(msg.sections[0].value, "792h0m0s");

        let late = clock().advanced(Duration::days(34));
        let msg = compose(&punkctf(), &window(), &late);
        assert_eq!(msg.sections[0].value, "-24h0m0s");
    }

    #[test]
    fn test_headline_constants() {
        let msg = compose(&punkctf(), &window(), &clock());
        assert_eq!(msg.headline.title, REMINDER_TITLE);
        assert_eq!(msg.headline.description, REMINDER_DESCRIPTION);
        assert_eq!(msg.headline.url, "https://ctf.example.com");
        assert_eq!(msg.headline.color, 15258703);
    }

    #[test]
    fn test_compose_is_deterministic_for_fixed_clock() {
        let a = compose(&punkctf(), &window(), &clock());
        let b = compose(&punkctf(), &window(), &clock());
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_strings_still_compose() {
        let msg = compose(&EventInfo::new("", ""), &window(), &clock());
        assert_eq!(msg.content, " incoming. Register to  team");
        assert_eq!(msg.sections.len(), 3);
    }
}
