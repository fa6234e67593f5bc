use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub url: String,
    pub labels: Vec<String>,
    pub reviewers: Vec<String>,
    pub base_sha: String,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
    repository: Option<RepositoryPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    labels: Vec<LabelPayload>,
    #[serde(default)]
    requested_reviewers: Vec<ReviewerPayload>,
    base: BasePayload,
}

#[derive(Debug, Deserialize)]
struct LabelPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ReviewerPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct BasePayload {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: OwnerPayload,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

impl RequestContext {
    pub fn from_event_file(path: &Path, fallback_repository: Option<&str>) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::NoContext(format!("cannot read event payload {}: {e}", path.display()))
        })?;
        Self::from_event_json(&json, fallback_repository)
    }

    pub fn from_event_json(json: &str, fallback_repository: Option<&str>) -> Result<Self> {
        let payload: EventPayload = serde_json::from_str(json)
            .map_err(|e| Error::NoContext(format!("unreadable event payload: {e}")))?;
        let pr = payload
            .pull_request
            .ok_or_else(|| Error::NoContext("event has no pull request".into()))?;

        let (owner, repo) = match payload.repository {
            Some(r) => (r.owner.login, r.name),
            None => split_repository(fallback_repository.unwrap_or_default())?,
        };
        let url = pr
            .html_url
            .unwrap_or_else(|| format!("https://github.com/{owner}/{repo}/pull/{}", pr.number));

        Ok(Self {
            owner,
            repo,
            number: pr.number,
            url,
            labels: pr.labels.into_iter().map(|l| l.name).collect(),
            reviewers: pr.requested_reviewers.into_iter().map(|r| r.login).collect(),
            base_sha: pr.base.sha,
        })
    }
}

fn split_repository(full: &str) -> Result<(String, String)> {
    match full.trim().split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(Error::InvalidInput(format!(
            "repository must look like `owner/name`, got `{full}`"
        ))),
    }
}
