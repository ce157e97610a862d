//! CodeChef has no public profile API, so profiles are read off the HTML page.
//!
//! Each field is located by its own extraction function returning an `Option`.
//! A selector that matches nothing leaves that one field empty; only a missing
//! rating header (no profile at all) fails the call.

use ::scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{Result, StatsError};
use crate::model::{
    CodeChefContest, CodeChefContestResult, CodeChefContests, CodeChefProfile, Platform, SolvedCategory,
    SolvedProblem,
};
use crate::scraper::{element_text, endpoint, get_json, require_handle, select_text};
use crate::transport::Transport;

const PROFILE_SELECTOR: &str = ".rating-header";
const RATING_SELECTOR: &str = ".rating-number";
const STARS_SELECTOR: &str = ".rating";
const HIGHEST_RATING_SELECTOR: &str = ".rating-header small";
const RANKS_SELECTOR: &str = ".rating-ranks a strong";
const CONTEST_ROW_SELECTOR: &str = ".rating-table tr";
const SOLVED_CATEGORY_SELECTOR: &str = ".rating-data-section.problems-solved article";

/// Position of the number in `(Highest Rating 2045)` once split on whitespace.
const HIGHEST_RATING_TOKEN: usize = 2;

/// Rank cells read `NA` for unranked users.
const NOT_AVAILABLE: &str = "NA";

#[instrument(skip(transport, base))]
pub(crate) async fn get_profile(
    transport: &dyn Transport,
    base: &Url,
    handle: &str,
) -> Result<CodeChefProfile> {
    let handle = require_handle(Platform::CodeChef, handle)?;
    let url = endpoint(base, &["users", handle]);
    debug!(%url, "fetching profile page");

    let body = transport.get(&url).await?;
    let profile = parse_profile(handle, base, &body)?;

    debug!(
        handle,
        rating = ?profile.rating,
        contests = profile.contests.len(),
        categories = profile.fully_solved.len(),
        "parsed codechef profile"
    );
    Ok(profile)
}

/// Extract a profile from a profile page. `base` resolves relative problem links.
pub(crate) fn parse_profile(handle: &str, base: &Url, body: &str) -> Result<CodeChefProfile> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let profile_selector = Selector::parse(PROFILE_SELECTOR)?;
    if root.select(&profile_selector).next().is_none() {
        return Err(StatsError::ElementNotFound {
            context: "codechef rating header",
        });
    }

    let stars = extract_stars(&root)?;
    let (global_rank, country_rank) = extract_ranks(&root)?;

    Ok(CodeChefProfile {
        handle: handle.to_string(),
        rating: extract_rating(&root)?,
        star_count: stars.as_deref().and_then(parse_star_count),
        stars,
        highest_rating: extract_highest_rating(&root)?,
        global_rank,
        country_rank,
        contests: extract_contest_history(&root)?,
        fully_solved: extract_fully_solved(&root, base)?,
    })
}

fn first_text(root: &ElementRef, selector: &str) -> Result<Option<String>> {
    let selector = Selector::parse(selector)?;
    Ok(Some(select_text(root, &selector)).filter(|t| !t.is_empty()))
}

fn extract_rating(root: &ElementRef) -> Result<Option<i32>> {
    Ok(first_text(root, RATING_SELECTOR)?.and_then(|t| parse_number(&t)))
}

fn extract_stars(root: &ElementRef) -> Result<Option<String>> {
    first_text(root, STARS_SELECTOR)
}

fn extract_highest_rating(root: &ElementRef) -> Result<Option<i32>> {
    let selector = Selector::parse(HIGHEST_RATING_SELECTOR)?;
    Ok(root
        .select(&selector)
        .last()
        .and_then(|small| parse_highest_rating(&element_text(&small))))
}

/// Global rank is the first entry of the ranks block, country rank the last.
fn extract_ranks(root: &ElementRef) -> Result<(Option<u32>, Option<u32>)> {
    let selector = Selector::parse(RANKS_SELECTOR)?;
    let ranks: Vec<String> = root.select(&selector).map(|e| element_text(&e)).collect();
    let global = ranks.first().and_then(|t| parse_rank(t));
    let country = ranks.last().and_then(|t| parse_rank(t));
    Ok((global, country))
}

fn extract_contest_history(root: &ElementRef) -> Result<Vec<CodeChefContestResult>> {
    let row_selector = Selector::parse(CONTEST_ROW_SELECTOR)?;
    let cell_selector = Selector::parse("td")?;
    let link_selector = Selector::parse("a")?;

    let rank_in = |cell: Option<&ElementRef>| {
        cell.map(|c| match c.select(&link_selector).next() {
            Some(a) => element_text(&a),
            None => element_text(c),
        })
        .and_then(|t| parse_rank(&t))
    };

    let contests = root
        .select(&row_selector)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
            let Some(name_cell) = cells.first() else {
                warn!("skipping codechef rating row without cells");
                return None;
            };
            Some(CodeChefContestResult {
                name: element_text(name_cell),
                rating: cells.get(1).and_then(|c| parse_number(&element_text(c))),
                global_rank: rank_in(cells.get(2)),
                country_rank: rank_in(cells.get(3)),
            })
        })
        .collect();
    Ok(contests)
}

fn extract_fully_solved(root: &ElementRef, base: &Url) -> Result<Vec<SolvedCategory>> {
    let category_selector = Selector::parse(SOLVED_CATEGORY_SELECTOR)?;
    let heading_selector = Selector::parse("h5")?;
    let problem_selector = Selector::parse("p")?;
    let link_selector = Selector::parse("a")?;

    let categories = root
        .select(&category_selector)
        .map(|article| {
            let problems = article
                .select(&problem_selector)
                .filter_map(|p| p.select(&link_selector).next())
                .map(|a| SolvedProblem {
                    name: element_text(&a),
                    link: a
                        .value()
                        .attr("href")
                        .and_then(|href| base.join(href.trim()).ok())
                        .map(String::from),
                })
                .collect();
            SolvedCategory {
                name: select_text(&article, &heading_selector),
                problems,
            }
        })
        .collect();
    Ok(categories)
}

/// Leading integer of a rating cell, e.g. `1876?` or `1876 (-12)` → 1876.
pub(crate) fn parse_number(text: &str) -> Option<i32> {
    let text = text.trim();
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let parsed = digits.parse::<i32>().ok().map(|n| sign * n);
    if parsed.is_none() {
        debug!(text, "not a number");
    }
    parsed
}

/// `NA` is an explicit "no rank"; anything unparseable is treated the same.
pub(crate) fn parse_rank(text: &str) -> Option<u32> {
    let text = text.trim();
    if text == NOT_AVAILABLE {
        return None;
    }
    let parsed = text.parse().ok();
    if parsed.is_none() {
        debug!(text, "unparseable rank");
    }
    parsed
}

/// Leading digits of the star badge, e.g. `3★` → 3.
pub(crate) fn parse_star_count(stars: &str) -> Option<u8> {
    let digits: String = stars
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Read the highest rating out of the header's `(Highest Rating 2045)` text.
///
/// This depends on the word position in the header and is the first thing to
/// revisit when the page layout changes.
pub(crate) fn parse_highest_rating(text: &str) -> Option<i32> {
    let token = text.split_whitespace().nth(HIGHEST_RATING_TOKEN)?;
    let token = token
        .strip_suffix(|c: char| !c.is_ascii_digit())
        .unwrap_or(token);
    token.parse().ok()
}

#[derive(Debug, Deserialize)]
struct ContestsEnvelope {
    status: String,
    message: Option<String>,
    #[serde(flatten)]
    contests: CodeChefContests,
}

#[instrument(skip(transport, base))]
pub(crate) async fn get_contests(transport: &dyn Transport, base: &Url) -> Result<CodeChefContests> {
    let url = endpoint(base, &["api", "list", "contests", "all"]);
    let envelope: ContestsEnvelope = get_json(transport, &url).await?;
    if envelope.status != "success" {
        return Err(StatsError::UpstreamStatus {
            platform: Platform::CodeChef,
            message: envelope.message.unwrap_or(envelope.status),
        });
    }

    let contests = envelope.contests;
    debug!(
        present = bucket_len(&contests.present_contests),
        future = bucket_len(&contests.future_contests),
        practice = bucket_len(&contests.practice_contests),
        past = bucket_len(&contests.past_contests),
        "parsed codechef contests"
    );
    Ok(contests)
}

fn bucket_len(bucket: &Option<Vec<CodeChefContest>>) -> usize {
    bucket.as_ref().map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    const FULL_PROFILE: &str = r##"
<html><body>
<div class="user-details-container">
  <div class="rating-header text-center">
    <div class="rating-number">1876</div>
    <div class="rating-star"><span class="rating">3★</span></div>
    <div><small>(Div 2)</small></div>
    <small>(Highest Rating 2045)</small>
  </div>
  <div class="rating-ranks">
    <ul>
      <li><a href="/ratings/all"><strong>4321</strong></a> Global Rank</li>
      <li><a href="/ratings/all?filterBy=Country"><strong>NA</strong></a> Country Rank</li>
    </ul>
  </div>
</div>
<table class="rating-table">
  <tr><th>Contest</th><th>Rating</th><th>Global Rank</th><th>Country Rank</th></tr>
  <tr><td>Starters 150</td><td>1876</td><td><a href="#">1234</a></td><td><a href="#">NA</a></td></tr>
  <tr><td>Starters 149</td><td>1790</td><td><a href="#">NA</a></td><td><a href="#">88</a></td></tr>
</table>
<section class="rating-data-section problems-solved">
  <article>
    <h5>Practice (2)</h5>
    <p><a href="/problems/FLOW001">FLOW001</a></p>
    <p><a href="/problems/TEST">TEST</a></p>
  </article>
  <article>
    <h5>Starters 150 (1)</h5>
    <p><a href="/START150/problems/ABC">ABC</a></p>
    <p>no link here</p>
  </article>
</section>
</body></html>"##;

    const MINIMAL_PROFILE: &str = r#"
<html><body>
  <div class="rating-header"><div class="rating-number"> 1500 </div></div>
</body></html>"#;

    fn base() -> Url {
        Url::parse("https://www.codechef.com/").unwrap()
    }

    #[test]
    fn test_parse_full_profile() {
        let profile = parse_profile("chef", &base(), FULL_PROFILE).unwrap();

        assert_eq!(profile.handle, "chef");
        assert_eq!(profile.rating, Some(1876));
        assert_eq!(profile.stars.as_deref(), Some("3★"));
        assert_eq!(profile.star_count, Some(3));
        assert_eq!(profile.highest_rating, Some(2045));
        assert_eq!(profile.global_rank, Some(4321));
        assert_eq!(profile.country_rank, None);

        assert_eq!(profile.contests.len(), 2);
        let first = &profile.contests[0];
        assert_eq!(first.name, "Starters 150");
        assert_eq!(first.rating, Some(1876));
        assert_eq!(first.global_rank, Some(1234));
        assert_eq!(first.country_rank, None);
        assert_eq!(profile.contests[1].global_rank, None);
        assert_eq!(profile.contests[1].country_rank, Some(88));

        assert_eq!(profile.fully_solved.len(), 2);
        let practice = &profile.fully_solved[0];
        assert_eq!(practice.name, "Practice (2)");
        assert_eq!(practice.problems.len(), 2);
        assert_eq!(practice.problems[0].name, "FLOW001");
        assert_eq!(
            practice.problems[0].link.as_deref(),
            Some("https://www.codechef.com/problems/FLOW001")
        );
        assert_eq!(profile.fully_solved[1].problems.len(), 1);
    }

    #[test]
    fn test_missing_sections_are_empty_not_errors() {
        let profile = parse_profile("chef", &base(), MINIMAL_PROFILE).unwrap();
        assert_eq!(profile.rating, Some(1500));
        assert!(profile.contests.is_empty());
        assert!(profile.fully_solved.is_empty());
        assert_eq!(profile.stars, None);
        assert_eq!(profile.star_count, None);
        assert_eq!(profile.highest_rating, None);
        assert_eq!(profile.global_rank, None);
        assert_eq!(profile.country_rank, None);
    }

    #[test]
    fn test_missing_rating_number_is_omitted() {
        let page = r#"<div class="rating-header"><small>(Highest Rating 1999)</small></div>"#;
        let profile = parse_profile("chef", &base(), page).unwrap();
        assert_eq!(profile.rating, None);
        assert_eq!(profile.highest_rating, Some(1999));
    }

    #[test]
    fn test_missing_profile_block_fails() {
        let page = "<html><body><h1>Page not found</h1></body></html>";
        let err = parse_profile("ghost", &base(), page).unwrap_err();
        assert!(matches!(err, StatsError::ElementNotFound { .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank("NA"), None);
        assert_eq!(parse_rank("1234"), Some(1234));
        assert_eq!(parse_rank(" 77 "), Some(77));
        assert_eq!(parse_rank(""), None);
        assert_eq!(parse_rank("-"), None);
    }

    #[test]
    fn test_parse_highest_rating() {
        assert_eq!(parse_highest_rating("(Highest Rating 2045)"), Some(2045));
        assert_eq!(parse_highest_rating("Highest Rating 2045"), Some(2045));
        assert_eq!(parse_highest_rating("(Highest Rating"), None);
        assert_eq!(parse_highest_rating(""), None);
        assert_eq!(parse_highest_rating("(Div 2)"), None);
    }

    #[test]
    fn test_parse_number_takes_leading_integer() {
        assert_eq!(parse_number("1876"), Some(1876));
        assert_eq!(parse_number(" 1876? "), Some(1876));
        assert_eq!(parse_number("1876 (-12)"), Some(1876));
        assert_eq!(parse_number("-12"), Some(-12));
        assert_eq!(parse_number("+40"), Some(40));
        assert_eq!(parse_number("NA"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_provisional_ratings_keep_their_number() {
        let page = r#"
<div class="rating-header"><div class="rating-number">1876?</div></div>
<table class="rating-table">
  <tr><th>Contest</th><th>Rating</th><th>Global Rank</th><th>Country Rank</th></tr>
  <tr><td>Starters 151</td><td>1876 (-12)</td><td>NA</td><td>NA</td></tr>
</table>"#;
        let profile = parse_profile("chef", &base(), page).unwrap();
        assert_eq!(profile.rating, Some(1876));
        assert_eq!(profile.contests[0].rating, Some(1876));
        assert_eq!(profile.contests[0].global_rank, None);
    }

    #[test]
    fn test_parse_star_count() {
        assert_eq!(parse_star_count("3★"), Some(3));
        assert_eq!(parse_star_count("7★"), Some(7));
        assert_eq!(parse_star_count("★"), None);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_profile("chef", &base(), FULL_PROFILE).unwrap();
        let second = parse_profile("chef", &base(), FULL_PROFILE).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_get_profile() {
        let transport =
            MockTransport::new().with_body("https://www.codechef.com/users/chef", FULL_PROFILE);
        let profile = get_profile(&transport, &base(), "chef").await.unwrap();
        assert_eq!(profile.rating, Some(1876));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_profile_empty_handle() {
        let transport = MockTransport::new();
        let err = get_profile(&transport, &base(), "").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(transport.calls(), 0);
    }

    const CONTESTS_URL: &str = "https://www.codechef.com/api/list/contests/all";

    #[tokio::test]
    async fn test_get_contests() {
        let body = r#"{"status":"success","message":"All contests list",
            "present_contests":[{"contest_code":"START150","contest_name":"Starters 150",
                "contest_start_date_iso":"2024-09-04T20:00:00+05:30","distinct_users":0}],
            "future_contests":[{"contest_code":"START151","contest_name":"Starters 151",
                "contest_duration":"120"}],
            "past_contests":[]}"#;
        let transport = MockTransport::new().with_body(CONTESTS_URL, body);
        let contests = get_contests(&transport, &base()).await.unwrap();

        assert_eq!(contests.present_contests.as_ref().map(Vec::len), Some(1));
        let future = contests.future_contests.as_ref().unwrap();
        assert_eq!(future[0].contest_code.as_deref(), Some("START151"));
        assert_eq!(future[0].details["contest_duration"], "120");
        assert_eq!(contests.practice_contests, None);
        assert_eq!(contests.past_contests, Some(vec![]));
    }

    #[tokio::test]
    async fn test_get_contests_keeps_loose_buckets() {
        let body = r#"{"status":"success","present_contests":[],
            "future_contests":[{"contest_code":"X"}],"practice_contests":null,"past_contests":[]}"#;
        let transport = MockTransport::new().with_body(CONTESTS_URL, body);
        let contests = get_contests(&transport, &base()).await.unwrap();

        let future = contests.future_contests.as_ref().unwrap();
        assert_eq!(future[0].contest_code.as_deref(), Some("X"));
        assert_eq!(future[0].contest_name, None);
        assert_eq!(contests.practice_contests, None);

        let json = serde_json::to_value(&contests).unwrap();
        assert_eq!(json["future_contests"], serde_json::json!([{"contest_code": "X"}]));
        assert!(json["practice_contests"].is_null());
    }

    #[tokio::test]
    async fn test_get_contests_failure_status() {
        let body = r#"{"status":"failure","message":"Something went wrong"}"#;
        let transport = MockTransport::new().with_body(CONTESTS_URL, body);
        match get_contests(&transport, &base()).await {
            Err(StatsError::UpstreamStatus { platform, message }) => {
                assert_eq!(platform, Platform::CodeChef);
                assert_eq!(message, "Something went wrong");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore = "hits the network"]
    async fn test_get_profile_live() {
        let transport =
            crate::transport::ReqwestTransport::from_config(&Default::default()).unwrap();
        let profile = get_profile(&transport, &base(), "gennady.korotkevich")
            .await
            .unwrap();
        assert!(profile.rating.is_some());
    }
}
