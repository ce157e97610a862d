use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ContestSummary, Platform};

/// A CodeChef user profile, extracted from the public profile page.
///
/// Every scalar is optional: a missing element on the page leaves its field
/// `None` instead of failing the whole profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeChefProfile {
    pub handle: String,
    pub rating: Option<i32>,
    /// Raw badge text, e.g. `3★`.
    pub stars: Option<String>,
    pub star_count: Option<u8>,
    pub highest_rating: Option<i32>,
    pub global_rank: Option<u32>,
    pub country_rank: Option<u32>,
    pub contests: Vec<CodeChefContestResult>,
    pub fully_solved: Vec<SolvedCategory>,
}

/// One row of the rating table on a profile page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeChefContestResult {
    pub name: String,
    pub rating: Option<i32>,
    pub global_rank: Option<u32>,
    pub country_rank: Option<u32>,
}

/// A group of fully solved problems under one heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvedCategory {
    pub name: String,
    pub problems: Vec<SolvedProblem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvedProblem {
    pub name: String,
    /// Absolute URL of the problem.
    pub link: Option<String>,
}

/// The four contest buckets of `list/contests/all`, republished unchanged.
///
/// A bucket the upstream sends as `null` (or omits) stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeChefContests {
    pub present_contests: Option<Vec<CodeChefContest>>,
    pub future_contests: Option<Vec<CodeChefContest>>,
    pub practice_contests: Option<Vec<CodeChefContest>>,
    pub past_contests: Option<Vec<CodeChefContest>>,
}

impl CodeChefContests {
    /// Every contest across the four buckets, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &CodeChefContest> {
        [
            &self.present_contests,
            &self.future_contests,
            &self.practice_contests,
            &self.past_contests,
        ]
        .into_iter()
        .flatten()
        .flatten()
    }
}

/// A CodeChef contest. Fields beyond code and name are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeChefContest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contest_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contest_name: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl CodeChefContest {
    fn detail_time(&self, key: &str) -> Option<DateTime<Utc>> {
        self.details
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }

    /// `contest_duration` is in minutes and arrives as either a string or a number.
    fn duration_minutes(&self) -> Option<u64> {
        match self.details.get("contest_duration")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Normalize into a [`ContestSummary`]. `None` when the code or start time is
    /// missing or unparseable, or when the contest would end before it starts.
    pub fn summary(&self) -> Option<ContestSummary> {
        let start_time = self.detail_time("contest_start_date_iso")?;
        let end_time = self.detail_time("contest_end_date_iso");

        let duration_seconds = match (self.duration_minutes(), end_time) {
            (Some(minutes), _) => Some(minutes.checked_mul(60)?),
            (None, Some(end)) => Some(u64::try_from((end - start_time).num_seconds()).ok()?),
            (None, None) => None,
        };
        if end_time.is_some_and(|end| end < start_time) {
            return None;
        }

        Some(ContestSummary {
            platform: Platform::CodeChef,
            id: self.contest_code.clone()?,
            name: self.contest_name.clone().unwrap_or_default(),
            start_time,
            duration_seconds,
            end_time,
        })
    }
}
