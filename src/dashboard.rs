//! Aggregation facade: one dashboard load, every resource fetched independently.
//!
//! Handles are resolved once per load. Each resource then runs concurrently
//! and reports on its own; a failing resource never hides the others.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::future::join_all;
use itertools::Itertools;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};
use tracing::{debug, instrument, warn};

use crate::client::StatsClient;
use crate::error::{Result, StatsError};
use crate::model::Platform;
use crate::profile::{PlatformHandles, ProfileStore};

/// A logical dashboard resource, named as the calling layer addresses it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, strum_macros::Display,
)]
pub enum Resource {
    #[strum(serialize = "profile")]
    Profile,
    #[strum(serialize = "codeforces")]
    Codeforces,
    #[strum(serialize = "codeforcesContests")]
    CodeforcesContests,
    #[strum(serialize = "codechef")]
    CodeChef,
    #[strum(serialize = "codechefContests")]
    CodeChefContests,
    #[strum(serialize = "leetcode")]
    LeetCode,
    #[strum(serialize = "leetcodePOTD")]
    LeetCodePotd,
    #[strum(serialize = "gfg")]
    Gfg,
    #[strum(serialize = "gfgPOTD")]
    GfgPotd,
}

impl Resource {
    /// The platform whose handle this resource needs, if any.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            Resource::Codeforces => Some(Platform::Codeforces),
            Resource::CodeChef => Some(Platform::CodeChef),
            Resource::LeetCode => Some(Platform::LeetCode),
            Resource::Gfg => Some(Platform::Gfg),
            _ => None,
        }
    }

    /// Whether this resource needs the user's profile at all.
    pub fn is_user_scoped(&self) -> bool {
        matches!(self, Resource::Profile) || self.platform().is_some()
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One resource's answer: the normalized data, or `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceResponse {
    /// HTTP-equivalent status: 200, 400 (handle not configured), 404, or 500.
    pub status: u16,
    pub body: Value,
}

impl ResourceResponse {
    pub fn ok<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self {
                status: 500,
                body: json!({ "error": format!("failed to serialize response: {e}") }),
            },
        }
    }

    pub fn error(error: &StatsError) -> Self {
        Self {
            status: error.status_code(),
            body: json!({ "error": error.to_string() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Every resource of one dashboard load, keyed by resource name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DashboardResponse {
    pub resources: BTreeMap<Resource, ResourceResponse>,
}

impl DashboardResponse {
    pub fn get(&self, resource: Resource) -> Option<&ResourceResponse> {
        self.resources.get(&resource)
    }
}

pub struct Dashboard<S> {
    client: StatsClient,
    store: S,
    deadline: Option<Duration>,
}

impl<S: ProfileStore> Dashboard<S> {
    pub fn new(client: StatsClient, store: S) -> Self {
        Self {
            client,
            store,
            deadline: None,
        }
    }

    /// Bound the handle lookup and each resource fetch by `deadline`.
    ///
    /// Resources run concurrently, so a load finishes within two deadlines.
    /// A resource cut off this way reports a 500.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fetch a single resource for `user_id`.
    #[instrument(skip(self))]
    pub async fn fetch(&self, user_id: &str, resource: Resource) -> ResourceResponse {
        let handles = if resource.is_user_scoped() {
            self.handles(user_id).await
        } else {
            Ok(PlatformHandles::default())
        };
        self.resolve(resource, &handles).await
    }

    /// Fetch the given resources concurrently, resolving handles once.
    /// Repeated resources are fetched once.
    #[instrument(skip(self, resources))]
    pub async fn fetch_many(&self, user_id: &str, resources: &[Resource]) -> DashboardResponse {
        let resources: Vec<Resource> = resources.iter().copied().unique().collect();
        let handles = if resources.iter().any(Resource::is_user_scoped) {
            self.handles(user_id).await
        } else {
            Ok(PlatformHandles::default())
        };
        if let Err(e) = &handles {
            warn!(user_id, error = %e, "could not resolve handles");
        }

        let responses = join_all(resources.iter().map(|r| self.resolve(*r, &handles))).await;
        let resources: BTreeMap<_, _> = resources.into_iter().zip(responses).collect();

        debug!(
            total = resources.len(),
            failed = resources.values().filter(|r| !r.is_success()).count(),
            "dashboard loaded"
        );
        DashboardResponse { resources }
    }

    /// Fetch every resource for `user_id`.
    pub async fn load(&self, user_id: &str) -> DashboardResponse {
        let all: Vec<Resource> = Resource::iter().collect();
        self.fetch_many(user_id, &all).await
    }

    async fn handles(&self, user_id: &str) -> Result<PlatformHandles> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.store.get_handles(user_id))
                .await
                .unwrap_or_else(|_| {
                    Err(StatsError::Timeout {
                        resource: "profile store".to_string(),
                    })
                }),
            None => self.store.get_handles(user_id).await,
        }
    }

    async fn resolve(&self, resource: Resource, handles: &Result<PlatformHandles>) -> ResourceResponse {
        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(resource, handles))
                .await
                .unwrap_or_else(|_| {
                    let e = StatsError::Timeout {
                        resource: resource.to_string(),
                    };
                    warn!(%resource, ?deadline, "resource timed out");
                    ResourceResponse::error(&e)
                }),
            None => self.run(resource, handles).await,
        }
    }

    async fn run(&self, resource: Resource, handles: &Result<PlatformHandles>) -> ResourceResponse {
        let client = &self.client;
        let none = PlatformHandles::default();
        let handles = match handles {
            Ok(h) => h,
            Err(e) if resource.is_user_scoped() => return ResourceResponse::error(e),
            Err(_) => &none,
        };
        let handle = resource.platform().map(|p| handles.get(p)).unwrap_or_default();

        match resource {
            Resource::Profile => ResourceResponse::ok(handles),
            Resource::Codeforces => respond(resource, handle, client.get_codeforces_user(handle).await),
            Resource::CodeforcesContests => {
                respond(resource, handle, client.get_codeforces_upcoming_contests().await)
            }
            Resource::CodeChef => respond(resource, handle, client.get_codechef_profile(handle).await),
            Resource::CodeChefContests => {
                respond(resource, handle, client.get_codechef_contests().await)
            }
            Resource::LeetCode => respond(resource, handle, client.get_leetcode_stats(handle).await),
            Resource::LeetCodePotd => respond(resource, handle, client.get_leetcode_potd().await),
            Resource::Gfg => respond(resource, handle, client.get_gfg_stats(handle).await),
            Resource::GfgPotd => respond(resource, handle, client.get_gfg_potd().await),
        }
    }
}

fn respond<T: Serialize>(resource: Resource, handle: &str, result: Result<T>) -> ResourceResponse {
    match result {
        Ok(data) => ResourceResponse::ok(&data),
        Err(e) => {
            warn!(%resource, handle, kind = %e.kind(), error = %e, "resource failed");
            ResourceResponse::error(&e)
        }
    }
}
