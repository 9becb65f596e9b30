//! HTTP client for the cache service REST API.
//!
//! One read method per resource, each a pure request-to-snapshot mapper, plus
//! the two mutating operations (flush, delete) which run through the
//! resilient call layer in [`retry`].

pub mod error;
pub mod retry;
pub mod types;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use error::ApiError;
use retry::RetryPolicy;
use types::{
    CacheItemDetail, CacheStatsSnapshot, FlushOutcome, KeyEntry, KeyListBody, MissUrlEntry,
    MissUrlListBody, MutationBody, ServiceStatus,
};

const STATS_PATH: &str = "/api/cache/stats";
const KEYS_PATH: &str = "/api/cache/keys";
const MISS_URLS_PATH: &str = "/api/cache/miss_urls";
const ITEM_PATH: &str = "/api/cache/item";
const FLUSH_PATH: &str = "/api/cache/flush";
const STATUS_PATH: &str = "/api/cache/status";

#[derive(Serialize)]
struct FlushRequest<'a> {
    prefix: &'a str,
}

/// Client for the cache service, bound to one base URL.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(base_url: Url, retry: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            retry,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn item_endpoint(&self, key: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(ITEM_PATH)?;
        url.query_pairs_mut().append_pair("key", key);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
    ) -> Result<T, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(endpoint, status.as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::decode(endpoint, err.to_string()))
    }

    /// Fetch the current stats snapshot.
    pub async fn fetch_stats(&self) -> Result<CacheStatsSnapshot, ApiError> {
        let url = self.endpoint(STATS_PATH)?;
        self.get_json(STATS_PATH, url).await
    }

    /// Fetch the full key list.
    pub async fn fetch_keys(&self) -> Result<Vec<KeyEntry>, ApiError> {
        let url = self.endpoint(KEYS_PATH)?;
        let body: KeyListBody = self.get_json(KEYS_PATH, url).await?;
        Ok(body.keys)
    }

    /// Fetch the recently-missed URL list.
    pub async fn fetch_miss_urls(&self) -> Result<Vec<MissUrlEntry>, ApiError> {
        let url = self.endpoint(MISS_URLS_PATH)?;
        let body: MissUrlListBody = self.get_json(MISS_URLS_PATH, url).await?;
        Ok(body.urls)
    }

    /// Fetch metadata and value for one cached entry.
    ///
    /// A 404 is a distinct outcome here: the key vanished between listing and
    /// inspection, which callers surface as a notice rather than a log line.
    pub async fn fetch_item(&self, key: &str) -> Result<CacheItemDetail, ApiError> {
        let url = self.item_endpoint(key)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::status(ITEM_PATH, status.as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::decode(ITEM_PATH, err.to_string()))
    }

    /// Check service connectivity, including the Redis tier.
    pub async fn fetch_status(&self) -> Result<ServiceStatus, ApiError> {
        let url = self.endpoint(STATUS_PATH)?;
        self.get_json(STATUS_PATH, url).await
    }

    /// Flush every entry whose key starts with `prefix`; an empty prefix
    /// flushes the entire cache. Retries transient failures per the policy.
    pub async fn flush(&self, prefix: &str) -> Result<FlushOutcome, ApiError> {
        let url = self.endpoint(FLUSH_PATH)?;

        let body = retry::call_with_retry(&self.retry, || {
            let http = self.http.clone();
            let url = url.clone();
            async move {
                let response = http.post(url).json(&FlushRequest { prefix }).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ApiError::status(FLUSH_PATH, status.as_u16()));
                }
                let bytes = response.bytes().await?;
                serde_json::from_slice::<MutationBody>(&bytes)
                    .map_err(|err| ApiError::decode(FLUSH_PATH, err.to_string()))
            }
        })
        .await?;

        if body.success {
            Ok(FlushOutcome { count: body.count })
        } else {
            Err(ApiError::rejected(body.error.unwrap_or_else(|| {
                "flush rejected by the cache service".to_string()
            })))
        }
    }

    /// Delete one cached entry by key. Retries transient failures per the
    /// policy.
    pub async fn delete_item(&self, key: &str) -> Result<(), ApiError> {
        let url = self.item_endpoint(key)?;

        let body = retry::call_with_retry(&self.retry, || {
            let http = self.http.clone();
            let url = url.clone();
            async move {
                let response = http.delete(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ApiError::status(ITEM_PATH, status.as_u16()));
                }
                let bytes = response.bytes().await?;
                serde_json::from_slice::<MutationBody>(&bytes)
                    .map_err(|err| ApiError::decode(ITEM_PATH, err.to_string()))
            }
        })
        .await?;

        if body.success {
            Ok(())
        } else {
            Err(ApiError::rejected(body.error.unwrap_or_else(|| {
                "delete rejected by the cache service".to_string()
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let base = Url::parse("http://cache.internal:8080").expect("base url parses");
        ApiClient::new(base, RetryPolicy::default())
    }

    #[test]
    fn item_endpoint_url_encodes_the_key() {
        let url = client()
            .item_endpoint("user:alice/profile?v=1")
            .expect("item url builds");

        assert_eq!(url.path(), "/api/cache/item");
        assert_eq!(
            url.query(),
            Some("key=user%3Aalice%2Fprofile%3Fv%3D1")
        );
    }

    #[test]
    fn endpoints_join_against_the_base_url() {
        let url = client().endpoint(STATS_PATH).expect("stats url builds");
        assert_eq!(url.as_str(), "http://cache.internal:8080/api/cache/stats");
    }
}
