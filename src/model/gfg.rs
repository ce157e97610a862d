use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::EnumString;

use super::common::{deserialize_count, deserialize_label};
use super::{Platform, ProblemOfTheDay};

/// Solved-problem counts for a GeeksForGeeks user. Unrecognized fields are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GfgStats {
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    #[serde(
        rename = "totalProblemsSolved",
        default,
        deserialize_with = "deserialize_count"
    )]
    pub total_problems_solved: Option<u32>,
    #[serde(rename = "School", default, deserialize_with = "deserialize_count")]
    pub school: Option<u32>,
    #[serde(rename = "Basic", default, deserialize_with = "deserialize_count")]
    pub basic: Option<u32>,
    #[serde(rename = "Easy", default, deserialize_with = "deserialize_count")]
    pub easy: Option<u32>,
    #[serde(rename = "Medium", default, deserialize_with = "deserialize_count")]
    pub medium: Option<u32>,
    #[serde(rename = "Hard", default, deserialize_with = "deserialize_count")]
    pub hard: Option<u32>,
    /// Every other field of the proxy body, verbatim.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl GfgStats {
    /// Whether the body identifies a user at all.
    pub fn has_user(&self) -> bool {
        self.user_name.is_some() || self.total_problems_solved.is_some()
    }
}

/// Today's GeeksForGeeks problem. Fields beyond the typed ones are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GfgPotd {
    pub problem_name: String,
    pub problem_url: String,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub difficulty: GfgDifficulty,
    pub accuracy: Option<f64>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, EnumString, strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum GfgDifficulty {
    School,
    Basic,
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
}

impl GfgPotd {
    pub fn summary(&self) -> ProblemOfTheDay {
        ProblemOfTheDay {
            platform: Platform::Gfg,
            title: self.problem_name.clone(),
            difficulty: self.difficulty.to_string(),
            acceptance: self.accuracy,
            url: self.problem_url.clone(),
        }
    }
}
