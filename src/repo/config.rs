use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;
use url::Url;

use super::VersionedContent;
use crate::domain::mapping::RawConfig;
use crate::error::{Error, Result};

/// Only absolute `http`/`https` URLs with a host select the URL loader.
pub fn is_valid_url(location: &str) -> bool {
    match Url::parse(location) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

pub fn parse_headers(raw: Option<&str>) -> Result<HashMap<String, String>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("{}");
    serde_json::from_str(raw).map_err(|e| {
        Error::InvalidInput(format!(
            "config request headers must be a JSON object of strings: {e}"
        ))
    })
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidInput(format!("invalid header name `{name}`: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidInput(format!("invalid value for header `{name}`: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

pub async fn load_from_url(
    http: &reqwest::Client,
    url: &str,
    revision: &str,
    headers: &HashMap<String, String>,
) -> Result<RawConfig> {
    debug!(%url, headers = headers.len(), "retrieving config from url");
    let load_err = |reason: String| Error::ConfigLoad {
        revision: revision.to_string(),
        reason,
    };

    let resp = http
        .get(url)
        .headers(header_map(headers)?)
        .send()
        .await
        .map_err(|e| load_err(format!("request to {url} failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(load_err(format!(
            "Response status ({}) from {url}",
            status.as_u16()
        )));
    }

    let body = resp
        .bytes()
        .await
        .map_err(|e| load_err(format!("failed to read response body from {url}: {e}")))?;
    let value = serde_json::from_slice(&body).map_err(|e| Error::ConfigParse {
        revision: revision.to_string(),
        reason: format!("invalid json response body at {url}: {e}"),
    })?;
    Ok(RawConfig(value))
}

pub async fn load_from_versioned_store(
    store: &dyn VersionedContent,
    revision: &str,
    path: &str,
) -> Result<RawConfig> {
    debug!(%path, %revision, "retrieving config from repository");
    let load_err = |reason: String| Error::ConfigLoad {
        revision: revision.to_string(),
        reason,
    };

    let bytes = store
        .file_at_revision(path, revision)
        .await
        .map_err(|e| load_err(format!("failed to read {path}: {e:#}")))?
        .ok_or_else(|| load_err(format!("{path} not found")))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| load_err(format!("{path} is not valid UTF-8: {e}")))?;
    let value = serde_yaml::from_str(&text)
        .map_err(|e| load_err(format!("invalid yaml in {path}: {e}")))?;
    Ok(RawConfig(value))
}
