//! Event + team metadata shown in a reminder.

use serde::{Deserialize, Serialize};

/// Display data only. Nothing here is validated; any string renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub name: String,
    pub url: String,
    pub team_name: String,
    pub team_credential: String,
}

impl EventInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            team_name: String::new(),
            team_credential: String::new(),
        }
    }

    pub fn with_team(mut self, name: impl Into<String>, credential: impl Into<String>) -> Self {
        self.team_name = name.into();
        self.team_credential = credential.into();
        self
    }
}
