pub mod auth;
pub mod model;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use model::{PullRequestRef, ReviewersBody};
use octocrab::Octocrab;
use tracing::{debug, info};

use super::{ReviewerExecutor, VersionedContent};
use crate::domain::context::RequestContext;
use crate::domain::result::ReviewAction;

pub struct GithubClient {
    octo: Octocrab,
    owner: String,
    repo: String,
}

impl GithubClient {
    pub fn new(token: String, api_base: Option<&str>, owner: &str, repo: &str) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token);
        if let Some(api) = api_base {
            builder = builder
                .base_uri(api)
                .map_err(|e| anyhow!("invalid GITHUB_API_URL: {e}"))?;
        }
        let octo = builder
            .build()
            .map_err(|e| anyhow!("failed to init GitHub client: {e}"))?;
        Ok(Self {
            octo,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    match err {
        octocrab::Error::GitHub { source, .. } => source.status_code.as_u16() == 404,
        _ => false,
    }
}

fn describe(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            format!("{} ({})", source.message, source.status_code)
        }
        other => other.to_string(),
    }
}

#[async_trait]
impl VersionedContent for GithubClient {
    async fn file_at_revision(&self, path: &str, revision: &str) -> Result<Option<Vec<u8>>> {
        let resp = self
            .octo
            .repos(&self.owner, &self.repo)
            .get_content()
            .path(path)
            .r#ref(revision)
            .send()
            .await;
        let items = match resp {
            Ok(items) => items,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(anyhow!("GitHub contents request failed: {}", describe(&e))),
        };
        let Some(file) = items.items.into_iter().next() else {
            return Ok(None);
        };
        let text = file
            .decoded_content()
            .with_context(|| format!("{path} has no decodable content (is it a directory?)"))?;
        debug!(%path, %revision, bytes = text.len(), "fetched file content");
        Ok(Some(text.into_bytes()))
    }
}

#[async_trait]
impl ReviewerExecutor for GithubClient {
    async fn mutate(
        &self,
        reviewers: &[String],
        action: ReviewAction,
        ctx: &RequestContext,
    ) -> Result<String> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/requested_reviewers",
            ctx.owner, ctx.repo, ctx.number
        );
        let body = ReviewersBody { reviewers };
        let pr: PullRequestRef = match action {
            ReviewAction::Assign => self.octo.post(&route, Some(&body)).await,
            ReviewAction::Unassign => self.octo.delete(&route, Some(&body)).await,
        }
        .map_err(|e| anyhow!("GitHub {action} reviewers request failed: {}", describe(&e)))?;

        let now_requested: Vec<&str> = pr
            .requested_reviewers
            .iter()
            .map(|r| r.login.as_str())
            .collect();
        info!(
            %action,
            pr = ctx.number,
            requested = ?reviewers,
            ?now_requested,
            "updated requested reviewers"
        );
        Ok(pr.html_url.unwrap_or_else(|| ctx.url.clone()))
    }
}
