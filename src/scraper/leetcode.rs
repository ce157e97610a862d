use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, StatsError};
use crate::model::{LeetCodeDailyChallenge, LeetCodePotd, LeetCodePotdData, LeetCodeStats, Platform};
use crate::scraper::{endpoint, get_json, post_json, require_handle};
use crate::transport::Transport;

const POTD_QUERY: &str = r#"
query questionOfToday {
  activeDailyCodingChallengeQuestion {
    date
    userStatus
    link
    question {
      acRate
      difficulty
      freqBar
      frontendQuestionId: questionFrontendId
      isFavor
      paidOnly: isPaidOnly
      status
      title
      titleSlug
      hasVideoSolution
      hasSolution
      topicTags {
        name
        id
        slug
      }
    }
  }
}
"#;

/// Body of the stats proxy. Unknown users come back as `status: "error"` with zeroed counts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    status: Option<String>,
    message: Option<String>,
    total_solved: Option<u32>,
    total_questions: Option<u32>,
    easy_solved: Option<u32>,
    total_easy: Option<u32>,
    medium_solved: Option<u32>,
    total_medium: Option<u32>,
    hard_solved: Option<u32>,
    total_hard: Option<u32>,
    acceptance_rate: Option<f64>,
    ranking: Option<u64>,
    contribution_points: Option<i64>,
    reputation: Option<i64>,
    submission_calendar: Option<BTreeMap<String, u32>>,
}

#[instrument(skip(transport, base))]
pub(crate) async fn get_stats(
    transport: &dyn Transport,
    base: &Url,
    handle: &str,
) -> Result<LeetCodeStats> {
    let handle = require_handle(Platform::LeetCode, handle)?;
    let url = endpoint(base, &[handle]);
    let response: StatsResponse = get_json(transport, &url).await?;
    let stats = normalize_stats(response)?;
    debug!(handle, total_solved = ?stats.total_solved, "parsed leetcode stats");
    Ok(stats)
}

fn normalize_stats(response: StatsResponse) -> Result<LeetCodeStats> {
    if response.status.as_deref() == Some("error") {
        return Err(StatsError::UpstreamStatus {
            platform: Platform::LeetCode,
            message: response
                .message
                .unwrap_or_else(|| "stats lookup failed".to_string()),
        });
    }

    Ok(LeetCodeStats {
        total_solved: response.total_solved,
        total_questions: response.total_questions,
        easy_solved: response.easy_solved,
        total_easy: response.total_easy,
        medium_solved: response.medium_solved,
        total_medium: response.total_medium,
        hard_solved: response.hard_solved,
        total_hard: response.total_hard,
        acceptance_rate: response.acceptance_rate,
        ranking: response.ranking,
        contribution_points: response.contribution_points,
        reputation: response.reputation,
        submission_calendar: response.submission_calendar.unwrap_or_default(),
    })
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<PotdData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PotdData {
    active_daily_coding_challenge_question: Option<LeetCodeDailyChallenge>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[instrument(skip(transport, graphql))]
pub(crate) async fn get_potd(transport: &dyn Transport, graphql: &Url) -> Result<LeetCodePotd> {
    let payload = json!({ "query": POTD_QUERY });
    let response: GraphqlResponse = post_json(transport, graphql, &payload).await?;

    if let Some(error) = response.errors.first() {
        return Err(StatsError::UpstreamStatus {
            platform: Platform::LeetCode,
            message: error.message.clone(),
        });
    }
    let challenge = response
        .data
        .and_then(|d| d.active_daily_coding_challenge_question)
        .ok_or_else(|| StatsError::UpstreamStatus {
            platform: Platform::LeetCode,
            message: "no active daily challenge".to_string(),
        })?;

    debug!(title = %challenge.question.title, "parsed leetcode daily challenge");
    Ok(LeetCodePotd {
        data: LeetCodePotdData {
            active_daily_coding_challenge_question: challenge,
        },
    })
}
