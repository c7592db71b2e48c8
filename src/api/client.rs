use super::{Collection, Endpoint, Record, plain_filename};
use crate::error::CliError;
use crate::input::Filter;
use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use url::Url;

/// HTTP implementation of [`Endpoint`] with bearer-token auth
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let invalid = || CliError::InvalidBaseUrl {
            url: base_url.to_string(),
        };
        let base_url = Url::parse(base_url).map_err(|_| invalid())?;
        if base_url.cannot_be_a_base() {
            return Err(invalid().into());
        }
        let http = Client::builder()
            .user_agent(concat!("nexcess-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    /// Collection URL with `rest` appended as percent-encoded path segments
    fn url(&self, collection: &Collection, rest: &[&str]) -> Result<Url, CliError> {
        let path = collection.path();
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CliError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(path.split('/'))
            .extend(rest);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(method = %method, url = %url, authorization = "[REDACTED]", "→ request");

        let mut builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !self.token.is_empty() {
            builder = builder.bearer_auth(&self.token);
        }
        builder
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, CliError> {
        let started = Instant::now();
        let response = builder.send()?;
        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "← response"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        tracing::trace!(%body, "Error response body");
        Err(CliError::Api {
            status: status.as_u16(),
            message: error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
        })
    }

    fn send_json(&self, builder: RequestBuilder) -> Result<Value, CliError> {
        let response = self.send(builder)?;
        let text = response.text()?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| CliError::Api {
            status: 200,
            message: format!("Unreadable response body: {}", e),
        })
    }
}

/// Pull a human message out of an error body
fn error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return ["message", "error", "detail"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_string);
    }

    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Records from a list response, bare array or wrapped in `data`
fn into_records(value: Value) -> Vec<Record> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        _ => Record::new(),
    }
}

impl Endpoint for ApiClient {
    fn list(&self, collection: &Collection, filter: &Filter) -> Result<Vec<Record>, CliError> {
        let builder = self
            .request(Method::GET, self.url(collection, &[])?)
            .query(filter);
        let records = into_records(self.send_json(builder)?);
        tracing::debug!(%collection, count = records.len(), "Listed records");
        Ok(records)
    }

    fn retrieve(&self, collection: &Collection, id: &str) -> Result<Record, CliError> {
        let url = self.url(collection, &[id])?;
        Ok(into_record(self.send_json(self.request(Method::GET, url))?))
    }

    fn create(&self, collection: &Collection, body: &Value) -> Result<Record, CliError> {
        let builder = self
            .request(Method::POST, self.url(collection, &[])?)
            .json(body);
        Ok(into_record(self.send_json(builder)?))
    }

    fn delete(&self, collection: &Collection, id: &str) -> Result<(), CliError> {
        let url = self.url(collection, &[id])?;
        self.send(self.request(Method::DELETE, url))?;
        Ok(())
    }

    fn download(
        &self,
        collection: &Collection,
        id: &str,
        dir: &Path,
    ) -> Result<PathBuf, CliError> {
        let target = dir.join(plain_filename(id)?);
        let exists = || CliError::FileExists {
            path: target.display().to_string(),
        };
        if target.exists() {
            return Err(exists());
        }

        let url = self.url(collection, &[id, "download"])?;
        let mut response = self.send(self.request(Method::GET, url))?;

        // Written next to the target and renamed, so a failed transfer leaves nothing behind
        std::fs::create_dir_all(dir)?;
        let mut partial = NamedTempFile::new_in(dir)?;
        let written = response.copy_to(&mut partial)?;
        partial.persist_noclobber(&target).map_err(|e| match e.error.kind() {
            ErrorKind::AlreadyExists => exists(),
            _ => CliError::Io(e.error),
        })?;
        tracing::debug!(path = %target.display(), bytes = written, "Download written");

        Ok(target)
    }
}
