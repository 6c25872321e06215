use anyhow::{Context, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::{DriveError, Result};
use crate::store::{FOLDER_MIME_TYPE, MetadataStore, ObjectMetadata, SortOrder};

pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com";
const USER_AGENT: &str = concat!("drivepath/", env!("CARGO_PKG_VERSION"));
const GET_FIELDS: &str = "id,name,md5Checksum,mimeType,size,createdTime,parents";
const LIST_FIELDS: &str =
    "nextPageToken,files(id,name,md5Checksum,mimeType,size,createdTime,parents)";
const PAGE_SIZE: &str = "1000";

/// Token written by the login tool. Only read here; refreshing is not our job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expires_at_unix: i64,
}

impl SessionToken {
    pub fn is_expired(&self, now_unix: i64) -> bool {
        now_unix >= self.expires_at_unix
    }

    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read session {}", path.display()))?;
        let token: SessionToken =
            serde_json::from_str(&raw).context("failed to parse session json")?;
        Ok(Some(token))
    }
}

pub struct DriveConfig {
    pub drive_base_url: String,
    pub access_token: String,
}

/// Blocking client for the `drive/v3/files` endpoints.
pub struct DriveClient {
    http: reqwest::blocking::Client,
    drive_base_url: String,
    access_token: String,
}

impl DriveClient {
    pub fn from_config(cfg: DriveConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .context("failed to build http client")?,
            drive_base_url: cfg.drive_base_url,
            access_token: cfg.access_token,
        })
    }

    fn files_url(&self) -> String {
        format!(
            "{}/drive/v3/files",
            self.drive_base_url.trim_end_matches('/')
        )
    }

    /// `files/{id}` with the id percent-encoded as a single path segment.
    fn file_url(&self, id: &str) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.files_url())
            .with_context(|| format!("invalid drive base url {}", self.drive_base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("drive base url {} cannot take a path", self.drive_base_url))?
            .push(id);
        Ok(url)
    }

    /// Sends the request and decodes the body. `Ok(None)` means 404.
    fn fetch<T: DeserializeOwned>(
        &self,
        rb: reqwest::blocking::RequestBuilder,
        op: &str,
    ) -> anyhow::Result<Option<T>> {
        let response = rb
            .bearer_auth(&self.access_token)
            .send()
            .with_context(|| format!("{op} request failed"))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("{} failed ({}): {}", op, status, sanitize(&body)));
        }
        let value = response
            .json()
            .with_context(|| format!("invalid {op} json"))?;
        Ok(Some(value))
    }

    fn list_all(&self, query: &str, order_by: Option<&str>) -> Result<Vec<ObjectMetadata>> {
        let url = self.files_url();
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![
                ("q", query),
                ("fields", LIST_FIELDS),
                ("pageSize", PAGE_SIZE),
            ];
            if let Some(order_by) = order_by {
                params.push(("orderBy", order_by));
            }
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let rb = self.http.get(&url).query(&params);
            let page: FileListResponse = self
                .fetch(rb, "list")
                .and_then(|p| p.ok_or_else(|| anyhow!("list failed: files endpoint not found")))
                .map_err(DriveError::StoreUnavailable)?;
            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(query, count = files.len(), "listed files");
        Ok(files)
    }

    /// Creates a folder under each of `parents` (the root when empty).
    pub fn create_directory(
        &self,
        name: &str,
        description: Option<&str>,
        parents: &[String],
    ) -> Result<ObjectMetadata> {
        let mut payload = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
        });
        if let Some(description) = description {
            payload["description"] = serde_json::Value::from(description);
        }
        if !parents.is_empty() {
            payload["parents"] = serde_json::Value::from(parents.to_vec());
        }

        let rb = self
            .http
            .post(self.files_url())
            .query(&[("fields", GET_FIELDS)])
            .json(&payload);
        self.fetch(rb, "mkdir")
            .and_then(|f| f.ok_or_else(|| anyhow!("mkdir failed: parent not found")))
            .map_err(DriveError::StoreUnavailable)
    }
}

impl MetadataStore for DriveClient {
    fn get_object(&self, id: &str) -> Result<ObjectMetadata> {
        debug!(id, "GET file");
        let url = self.file_url(id).map_err(DriveError::StoreUnavailable)?;
        let rb = self.http.get(url).query(&[("fields", GET_FIELDS)]);
        self.fetch(rb, "get")
            .map_err(DriveError::StoreUnavailable)?
            .ok_or_else(|| DriveError::NotFound(id.to_string()))
    }

    fn query_by_name(&self, name: &str, parent_id: &str) -> Result<Vec<ObjectMetadata>> {
        let query = format!(
            "trashed = false and name = '{}' and '{}' in parents",
            escape_query(name),
            escape_query(parent_id)
        );
        self.list_all(&query, None)
    }

    fn list_children(&self, parent_id: &str, order: SortOrder) -> Result<Vec<ObjectMetadata>> {
        let query = format!(
            "trashed = false and 'me' in owners and '{}' in parents",
            escape_query(parent_id)
        );
        self.list_all(&query, order.order_by())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListResponse {
    #[serde(default)]
    files: Vec<ObjectMetadata>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Quote a value for the files.list query language.
fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn sanitize(s: &str) -> String {
    if s.len() > 240 {
        let cut = (0..=240).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &s[..cut])
    } else {
        s.to_string()
    }
}
