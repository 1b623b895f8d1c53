use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::models::{health::DbCheckResponse, users::UserResponse};

/// Everything the dashboard shows: the connectivity check plus the user list.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub connection: DbCheckResponse,
    pub users: Vec<UserResponse>,
}

/// A trait for fetching the dashboard data.
/// In practise this goes over http to a running server, see `FetchDashboardReqwest`.
#[async_trait]
pub trait FetchDashboard {
    async fn fetch(&self) -> anyhow::Result<DashboardSnapshot>;
}

/// The concrete implementation of `FetchDashboard`.
pub struct FetchDashboardReqwest {
    client: Client,
    base_url: Url,
}

impl FetchDashboardReqwest {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: Url, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            base_url: ensure_slash(&base_url),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = self.base_url.join(path)?;
        debug!("Fetching {}", url);

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{url} returned {status}: {body}"));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Makes sure a url has a trailing slash.
///
/// `Url::join` replaces the last path segment unless the base ends in '/', so a base of
/// `http://host/roster` would otherwise lose `roster`.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

#[async_trait]
impl FetchDashboard for FetchDashboardReqwest {
    async fn fetch(&self) -> anyhow::Result<DashboardSnapshot> {
        let connection = self.get_json::<DbCheckResponse>("api/test-db").await?;
        let users = self.get_json::<Vec<UserResponse>>("api/users").await?;

        Ok(DashboardSnapshot { connection, users })
    }
}
