use chrono::{DateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::{ContestSummary, Platform};

/// A Codeforces user, as returned by `user.info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesUser {
    pub handle: String,
    pub rating: Option<i32>,
    pub rank: Option<String>,
    pub max_rating: Option<i32>,
    pub max_rank: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    /// Epoch seconds.
    pub last_online_time_seconds: Option<i64>,
    /// Epoch seconds.
    pub registration_time_seconds: Option<i64>,
    pub contribution: Option<i32>,
    pub friend_of_count: Option<u32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub title_photo: Option<String>,
}

/// A contest from `contest.list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesContest {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub contest_type: Option<String>,
    pub phase: ContestPhase,
    pub frozen: Option<bool>,
    pub duration_seconds: u64,
    pub start_time_seconds: Option<i64>,
    pub relative_time_seconds: Option<i64>,
}

/// The phase of a Codeforces contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestPhase {
    Before,
    Coding,
    PendingSystemTest,
    SystemTest,
    Finished,
    #[serde(other)]
    Unknown,
}

impl CodeforcesContest {
    /// Normalize into a [`ContestSummary`]. `None` when the contest has no valid start time.
    pub fn summary(&self) -> Option<ContestSummary> {
        let start_time = DateTime::from_timestamp(self.start_time_seconds?, 0)?;
        let end_time = i64::try_from(self.duration_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|d| start_time.checked_add_signed(d));

        Some(ContestSummary {
            platform: Platform::Codeforces,
            id: self.id.to_string(),
            name: self.name.clone(),
            start_time,
            duration_seconds: Some(self.duration_seconds),
            end_time,
        })
    }
}
