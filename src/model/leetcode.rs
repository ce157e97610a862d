use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use url::Url;

use super::common::deserialize_label;
use super::{Platform, ProblemOfTheDay};

/// Solved-problem statistics for a LeetCode user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeStats {
    pub total_solved: Option<u32>,
    pub total_questions: Option<u32>,
    pub easy_solved: Option<u32>,
    pub total_easy: Option<u32>,
    pub medium_solved: Option<u32>,
    pub total_medium: Option<u32>,
    pub hard_solved: Option<u32>,
    pub total_hard: Option<u32>,
    pub acceptance_rate: Option<f64>,
    pub ranking: Option<u64>,
    pub contribution_points: Option<i64>,
    pub reputation: Option<i64>,
    /// Epoch-seconds day key to submission count. Empty when upstream sends none.
    pub submission_calendar: BTreeMap<String, u32>,
}

/// The GraphQL payload for the active daily challenge, forwarded as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeetCodePotd {
    pub data: LeetCodePotdData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodePotdData {
    pub active_daily_coding_challenge_question: LeetCodeDailyChallenge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeDailyChallenge {
    pub date: Option<String>,
    pub user_status: Option<String>,
    /// Relative link, e.g. `/problems/two-sum/`.
    pub link: Option<String>,
    pub question: LeetCodeQuestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeQuestion {
    pub ac_rate: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub difficulty: LeetCodeDifficulty,
    pub freq_bar: Option<f64>,
    pub frontend_question_id: Option<String>,
    pub is_favor: Option<bool>,
    pub paid_only: Option<bool>,
    pub status: Option<String>,
    pub title: String,
    pub title_slug: String,
    pub has_video_solution: Option<bool>,
    pub has_solution: Option<bool>,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTag {
    pub name: String,
    pub id: String,
    pub slug: String,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, EnumString, strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum LeetCodeDifficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
}

impl LeetCodeDailyChallenge {
    /// Normalize into a [`ProblemOfTheDay`], resolving the problem URL against `base`.
    pub fn summary(&self, base: &Url) -> Option<ProblemOfTheDay> {
        let path = self
            .link
            .clone()
            .unwrap_or_else(|| format!("/problems/{}/", self.question.title_slug));
        let url = base.join(&path).ok()?;

        Some(ProblemOfTheDay {
            platform: Platform::LeetCode,
            title: self.question.title.clone(),
            difficulty: self.question.difficulty.to_string(),
            acceptance: self.question.ac_rate,
            url: url.to_string(),
        })
    }
}
