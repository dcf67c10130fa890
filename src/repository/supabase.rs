//! Supabase-backed remote store
//!
//! Talks PostgREST for the tote collection and the storage API for photos.
//! One client is built at startup and shared for the process lifetime; it
//! keeps no state between calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;

use super::error::RemoteError;
use super::traits::{ChangeToken, ObjectStore, RemoteStore};
use crate::config::StoreConfig;
use crate::domain::{Tote, ToteId};

/// Characters escaped when an object name becomes a URL path segment
const OBJECT_NAME: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// REST client for the remote structured and object stores
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    collection: String,
    bucket: String,
}

impl SupabaseClient {
    pub fn new(config: &StoreConfig) -> Result<SupabaseClient, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(SupabaseClient {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
            bucket: config.bucket.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.collection)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    /// Map non-2xx responses into errors, keeping the body for the log line
    async fn ok(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RemoteError::Status { status, body })
        }
    }

    /// Total row count out of a `Content-Range` header like `0-24/26`
    fn total_from_headers(headers: &HeaderMap) -> u64 {
        headers
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.rsplit('/').next())
            .and_then(|total| total.parse().ok())
            .unwrap_or(0)
    }
}

/// Single-column row used by the change watermark query
#[derive(Deserialize)]
struct UpdatedAtRow {
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl RemoteStore for SupabaseClient {
    async fn count(&self) -> Result<u64, RemoteError> {
        let response = self
            .request(Method::HEAD, &self.collection_url())
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::ok(response).await?;
        Ok(Self::total_from_headers(response.headers()))
    }

    async fn fetch_all(&self) -> Result<Vec<Tote>, RemoteError> {
        let response = self
            .request(Method::GET, &self.collection_url())
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .send()
            .await?;
        Ok(Self::ok(response).await?.json().await?)
    }

    async fn insert(&self, tote: &Tote) -> Result<Tote, RemoteError> {
        // The store assigns the durable id, so the pending one never leaves
        // the process.
        let mut body = serde_json::to_value(tote)?;
        if let Some(map) = body.as_object_mut() {
            map.remove("id");
        }
        let response = self
            .request(Method::POST, &self.collection_url())
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let rows: Vec<Tote> = Self::ok(response).await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::MissingRow(format!("insert of \"{}\"", tote.name)))
    }

    async fn upsert(&self, tote: &Tote) -> Result<Tote, RemoteError> {
        let response = self
            .request(Method::POST, &self.collection_url())
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(tote)
            .send()
            .await?;
        let rows: Vec<Tote> = Self::ok(response).await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::MissingRow(format!("upsert of {}", tote.id)))
    }

    async fn delete(&self, id: &ToteId) -> Result<(), RemoteError> {
        let response = self
            .request(Method::DELETE, &self.collection_url())
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        Self::ok(response).await?;
        Ok(())
    }

    async fn change_token(&self) -> Result<ChangeToken, RemoteError> {
        let response = self
            .request(Method::GET, &self.collection_url())
            .query(&[
                ("select", "updated_at"),
                ("order", "updated_at.desc"),
                ("limit", "1"),
            ])
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::ok(response).await?;
        let count = Self::total_from_headers(response.headers());
        let rows: Vec<UpdatedAtRow> = response.json().await?;
        Ok(ChangeToken {
            count,
            latest: rows.into_iter().next().map(|row| row.updated_at),
        })
    }
}

#[async_trait]
impl ObjectStore for SupabaseClient {
    async fn upload(
        &self,
        name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, RemoteError> {
        let encoded = utf8_percent_encode(name, OBJECT_NAME).to_string();
        let response = self
            .request(
                Method::POST,
                &format!(
                    "{}/storage/v1/object/{}/{}",
                    self.base_url, self.bucket, encoded
                ),
            )
            .header(CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;
        Self::ok(response).await?;
        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, encoded
        ))
    }
}
