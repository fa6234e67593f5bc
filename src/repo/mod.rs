use anyhow::Result;
use async_trait::async_trait;

use crate::domain::context::RequestContext;
use crate::domain::result::ReviewAction;

pub mod config;
pub mod github;

#[async_trait]
pub trait VersionedContent: Send + Sync {
    /// File bytes at `path` as of `revision`, or `None` if it does not exist there.
    async fn file_at_revision(&self, path: &str, revision: &str) -> Result<Option<Vec<u8>>>;
}

#[async_trait]
pub trait ReviewerExecutor: Send + Sync {
    async fn mutate(
        &self,
        reviewers: &[String],
        action: ReviewAction,
        ctx: &RequestContext,
    ) -> Result<String>;
}
