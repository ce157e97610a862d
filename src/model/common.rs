use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::EnumString;

/// The upstream platforms a dashboard can aggregate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Codeforces,
    CodeChef,
    LeetCode,
    Gfg,
}

/// A contest normalized across platforms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContestSummary {
    pub platform: Platform,
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub duration_seconds: Option<u64>,
    pub end_time: Option<DateTime<Utc>>,
}

/// A problem of the day normalized across platforms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemOfTheDay {
    pub platform: Platform,
    pub title: String,
    pub difficulty: String,
    pub acceptance: Option<f64>,
    pub url: String,
}

/// Deserialize a difficulty label into a closed enum, falling back to its default
/// (`Unknown`) for absent or unrecognized labels.
pub(crate) fn deserialize_label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label
        .and_then(|l| T::from_str(l.trim()).ok())
        .unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u32),
    Text(String),
}

/// Third-party stat proxies are loose about numbers; accept `12` or `"12"`,
/// reject anything that is not a count.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Count::Number(n)) => Ok(Some(n)),
        Some(Count::Text(t)) => t
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Counted {
        #[serde(default, deserialize_with = "deserialize_count")]
        n: Option<u32>,
    }

    #[test]
    fn test_deserialize_count() {
        let parse = |s: &str| serde_json::from_str::<Counted>(s).map(|c| c.n);
        assert_eq!(parse(r#"{"n": 12}"#).unwrap(), Some(12));
        assert_eq!(parse(r#"{"n": " 7 "}"#).unwrap(), Some(7));
        assert_eq!(parse(r#"{"n": null}"#).unwrap(), None);
        assert_eq!(parse(r#"{}"#).unwrap(), None);
        assert!(parse(r#"{"n": "many"}"#).is_err());
        assert!(parse(r#"{"n": -3}"#).is_err());
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::CodeChef.to_string(), "codechef");
        assert_eq!(Platform::from_str("gfg").unwrap(), Platform::Gfg);
    }
}
