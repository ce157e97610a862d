use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{Result, StatsError};
use crate::model::{CodeforcesContest, CodeforcesUser, ContestPhase, Platform};
use crate::scraper::{endpoint, get_json, require_handle};
use crate::transport::Transport;

/// Every Codeforces API response is wrapped as `{status, comment?, result?}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    comment: Option<String>,
    result: Option<T>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T> {
        if self.status != "OK" {
            return Err(StatsError::UpstreamStatus {
                platform: Platform::Codeforces,
                message: self.comment.unwrap_or(self.status),
            });
        }
        self.result.ok_or_else(|| StatsError::UpstreamStatus {
            platform: Platform::Codeforces,
            message: "response has no result".to_string(),
        })
    }
}

#[instrument(skip(transport, base))]
pub(crate) async fn get_user(
    transport: &dyn Transport,
    base: &Url,
    handle: &str,
) -> Result<CodeforcesUser> {
    let handle = require_handle(Platform::Codeforces, handle)?;
    let mut url = endpoint(base, &["user.info"]);
    url.query_pairs_mut().append_pair("handles", handle);

    let envelope: Envelope<Vec<CodeforcesUser>> = get_json(transport, &url).await?;
    let user = first_user(envelope)?;
    debug!(handle, rating = ?user.rating, "parsed codeforces user");
    Ok(user)
}

fn first_user(envelope: Envelope<Vec<CodeforcesUser>>) -> Result<CodeforcesUser> {
    envelope
        .into_result()?
        .into_iter()
        .next()
        .ok_or_else(|| StatsError::UpstreamStatus {
            platform: Platform::Codeforces,
            message: "user.info returned no users".to_string(),
        })
}

#[instrument(skip(transport, base))]
pub(crate) async fn get_upcoming_contests(
    transport: &dyn Transport,
    base: &Url,
) -> Result<Vec<CodeforcesContest>> {
    let url = endpoint(base, &["contest.list"]);
    let envelope: Envelope<Vec<Value>> = get_json(transport, &url).await?;
    let contests = parse_contests(envelope.into_result()?);
    let upcoming = upcoming_contests(contests);
    debug!(count = upcoming.len(), "parsed upcoming codeforces contests");
    Ok(upcoming)
}

fn parse_contests(raw: Vec<Value>) -> Vec<CodeforcesContest> {
    raw.into_iter()
        .filter_map(|v| match serde_json::from_value(v) {
            Ok(contest) => Some(contest),
            Err(e) => {
                warn!(error = %e, "skipping unparsable codeforces contest");
                None
            }
        })
        .collect()
}

/// Keep the contests that have not started yet, in upstream order.
pub fn upcoming_contests(contests: Vec<CodeforcesContest>) -> Vec<CodeforcesContest> {
    contests
        .into_iter()
        .filter(|c| c.phase == ContestPhase::Before)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    const USER_URL: &str = "https://codeforces.com/api/user.info?handles=tourist";
    const CONTESTS_URL: &str = "https://codeforces.com/api/contest.list";

    fn base() -> Url {
        Url::parse("https://codeforces.com/api/").unwrap()
    }

    const TOURIST: &str = r#"{"status":"OK","result":[{"handle":"tourist","rating":3500,
        "rank":"legendary grandmaster","maxRating":4009,"maxRank":"tourist",
        "country":"Belarus","city":"Gomel","organization":"ITMO University",
        "lastOnlineTimeSeconds":1725000000,"contribution":120,"friendOfCount":70000}]}"#;

    #[tokio::test]
    async fn test_get_user() {
        let transport = MockTransport::new().with_body(USER_URL, TOURIST);
        let user = get_user(&transport, &base(), "tourist").await.unwrap();

        assert_eq!(user.handle, "tourist");
        assert_eq!(user.rating, Some(3500));
        assert_eq!(user.max_rating, Some(4009));
        assert_eq!(user.rank.as_deref(), Some("legendary grandmaster"));
        assert_eq!(user.last_online_time_seconds, Some(1_725_000_000));
        assert_eq!(user.first_name, None);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_rating_is_not_converted() {
        let body = r#"{"status":"OK","result":[{"handle":"x","rating":1500,"rank":"expert"}]}"#;
        let url = "https://codeforces.com/api/user.info?handles=x";
        let transport = MockTransport::new().with_body(url, body);
        let user = get_user(&transport, &base(), "x").await.unwrap();
        assert_eq!(user.rating, Some(1500));
        assert_eq!(user.rank.as_deref(), Some("expert"));
    }

    #[tokio::test]
    async fn test_empty_handle_makes_no_call() {
        let transport = MockTransport::new();
        let result = get_user(&transport, &base(), "").await;
        assert!(matches!(
            result,
            Err(StatsError::NotConfigured {
                platform: Platform::Codeforces
            })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failures() {
        let failed = r#"{"status":"FAILED","comment":"handles: User with handle nobody not found"}"#;
        let transport = MockTransport::new()
            .with_body("https://codeforces.com/api/user.info?handles=nobody", failed)
            .with_body("https://codeforces.com/api/user.info?handles=empty", r#"{"status":"OK","result":[]}"#)
            .with_body("https://codeforces.com/api/user.info?handles=garbled", "<html>")
            .with_status("https://codeforces.com/api/user.info?handles=down", 503);

        match get_user(&transport, &base(), "nobody").await {
            Err(StatsError::UpstreamStatus { message, .. }) => {
                assert!(message.contains("not found"))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            get_user(&transport, &base(), "empty").await,
            Err(StatsError::UpstreamStatus { .. })
        ));
        assert!(matches!(
            get_user(&transport, &base(), "garbled").await,
            Err(StatsError::Json { .. })
        ));
        let down = get_user(&transport, &base(), "down").await.unwrap_err();
        assert_eq!(down.status_code(), 500);
    }

    #[tokio::test]
    async fn test_mistyped_rating_is_an_error() {
        let body = r#"{"status":"OK","result":[{"handle":"x","rating":"high"}]}"#;
        let url = "https://codeforces.com/api/user.info?handles=x";
        let transport = MockTransport::new().with_body(url, body);
        assert!(matches!(
            get_user(&transport, &base(), "x").await,
            Err(StatsError::Json { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_user_is_idempotent() {
        let transport = MockTransport::new().with_body(USER_URL, TOURIST);
        let first = get_user(&transport, &base(), "tourist").await.unwrap();
        let second = get_user(&transport, &base(), "tourist").await.unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_upcoming_contests_keep_order() {
        let body = r#"{"status":"OK","result":[
            {"id":3,"name":"Round C","phase":"BEFORE","durationSeconds":7200,"startTimeSeconds":1800000000},
            {"id":2,"name":"Round B","phase":"CODING","durationSeconds":7200,"startTimeSeconds":1700000000},
            {"id":9,"name":"Broken","phase":"BEFORE"},
            {"id":1,"name":"Round A","phase":"FINISHED","durationSeconds":7200,"startTimeSeconds":1600000000},
            {"id":4,"name":"Round D","phase":"BEFORE","durationSeconds":9000,"startTimeSeconds":1900000000}
        ]}"#;
        let transport = MockTransport::new().with_body(CONTESTS_URL, body);
        let contests = get_upcoming_contests(&transport, &base()).await.unwrap();

        let ids: Vec<u64> = contests.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(contests.iter().all(|c| c.phase == ContestPhase::Before));
    }

    #[test]
    fn test_upcoming_contests_filter() {
        let contest = |id: u64, phase: ContestPhase| CodeforcesContest {
            id,
            name: format!("Round {id}"),
            contest_type: None,
            phase,
            frozen: None,
            duration_seconds: 0,
            start_time_seconds: None,
            relative_time_seconds: None,
        };
        let filtered = upcoming_contests(vec![
            contest(1, ContestPhase::Before),
            contest(2, ContestPhase::Coding),
            contest(3, ContestPhase::Finished),
        ]);
        assert_eq!(filtered, vec![contest(1, ContestPhase::Before)]);
    }

    #[tokio::test]
    #[ignore = "hits the network"]
    async fn test_get_user_live() {
        let transport =
            crate::transport::ReqwestTransport::from_config(&Default::default()).unwrap();
        let user = get_user(&transport, &base(), "tourist").await.unwrap();
        assert_eq!(user.handle, "tourist");
        assert!(user.rating.is_some());
    }
}
