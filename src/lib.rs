//! Fetch and normalize competitive-programming statistics from Codeforces,
//! CodeChef, LeetCode and GeeksForGeeks.
//!
//! [`StatsClient`] exposes one async method per upstream operation.
//! [`Dashboard`] resolves a user's handles through a [`ProfileStore`] and
//! fetches every resource concurrently, reporting each one independently.

pub use client::StatsClient;
pub use config::{ClientConfig, ConfigError, Endpoints, RetryConfig};
pub use dashboard::{Dashboard, DashboardResponse, Resource, ResourceResponse};
pub use error::{FailureKind, Result, StatsError};
pub use profile::{InMemoryProfileStore, PlatformHandles, ProfileStore};
pub use retry::RetryTransport;
pub use scraper::codeforces::upcoming_contests;
pub use transport::{ReqwestTransport, Transport};

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod profile;
pub mod retry;
pub(crate) mod scraper;
pub mod transport;
