use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::domain::context::RequestContext;
use crate::domain::mapping::{self, ReviewerMapping};
use crate::domain::result::{ReconciliationResult, ReviewAction};
use crate::error::{Error, Result};
use crate::repo::config::{is_valid_url, load_from_url, load_from_versioned_store};
use crate::repo::{ReviewerExecutor, VersionedContent};
use crate::usecase::reconcile::{
    LabelSet, ReconcileMode, ReviewerState, compute_assignments, compute_unassignments,
};

#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub config_location: String,
    pub headers: HashMap<String, String>,
    pub unassign_if_label_removed: bool,
    pub input_labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub assigned: ReconciliationResult,
    /// `None` when the assign pass failed and the run stopped there.
    pub unassigned: Option<ReconciliationResult>,
}

pub struct App<C> {
    client: C,
    http: reqwest::Client,
}

impl<C: VersionedContent + ReviewerExecutor> App<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            http: reqwest::Client::new(),
        }
    }

    pub async fn load_mapping(
        &self,
        ctx: &RequestContext,
        inv: &Invocation,
    ) -> Result<ReviewerMapping> {
        let raw = if is_valid_url(&inv.config_location) {
            load_from_url(&self.http, &inv.config_location, &ctx.base_sha, &inv.headers).await?
        } else {
            load_from_versioned_store(&self.client, &ctx.base_sha, &inv.config_location).await?
        };
        debug!(config = %raw.0, "using config");
        let mapping = mapping::normalize(&raw)?;
        if mapping.is_empty() {
            warn!("config maps no labels to reviewers");
        }
        debug!(labels = mapping.len(), "validated reviewer mapping");
        Ok(mapping)
    }

    /// Assign, then (optionally) unassign.
    ///
    /// Config failures abort the whole run. A failed assign pass is reported
    /// and the unassign pass is not attempted.
    pub async fn run(&self, ctx: &RequestContext, inv: &Invocation) -> Result<Outcome> {
        let mapping = self.load_mapping(ctx, inv).await?;

        let active: LabelSet = match &inv.input_labels {
            Some(labels) => labels.iter().cloned().collect(),
            None => ctx.labels.iter().cloned().collect(),
        };
        debug!(?active, "active labels");
        let mut state: ReviewerState = ctx.reviewers.iter().cloned().collect();

        let to_add = compute_assignments(&mapping, &active, &state);
        let assigned = if to_add.is_empty() {
            ReconciliationResult::no_op("No matching reviewers")
        } else {
            self.execute(to_add, ReviewAction::Assign, ctx).await
        };
        if assigned.is_failure() {
            return Ok(Outcome {
                assigned,
                unassigned: None,
            });
        }

        if !inv.unassign_if_label_removed {
            return Ok(Outcome {
                assigned,
                unassigned: Some(ReconciliationResult::no_op("Skip unassigning reviewers")),
            });
        }

        state.extend(assigned.reviewers().iter().cloned());
        let mode = ReconcileMode::for_active(&active);
        let to_remove = compute_unassignments(&mapping, &active, &state, mode);
        let unassigned = if to_remove.is_empty() {
            ReconciliationResult::no_op("No reviewers to unassign")
        } else {
            self.execute(to_remove, ReviewAction::Unassign, ctx).await
        };

        Ok(Outcome {
            assigned,
            unassigned: Some(unassigned),
        })
    }

    async fn execute(
        &self,
        reviewers: Vec<String>,
        action: ReviewAction,
        ctx: &RequestContext,
    ) -> ReconciliationResult {
        info!(%action, ?reviewers, pr = ctx.number, "updating reviewers");
        match self.client.mutate(&reviewers, action, ctx).await {
            Ok(url) => ReconciliationResult::Success { url, reviewers },
            Err(e) => {
                let err = Error::Mutation {
                    action,
                    reason: format!("{e:#}"),
                };
                warn!(%err, "reviewer update failed");
                ReconciliationResult::Failure {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CONFIG_PATH: &str = ".github/reviewers.yml";

    #[derive(Default)]
    struct FakeGithub {
        config: Option<&'static str>,
        fail_on: Option<ReviewAction>,
        calls: Mutex<Vec<(ReviewAction, Vec<String>)>>,
    }

    impl FakeGithub {
        fn with_config(config: &'static str) -> Self {
            Self {
                config: Some(config),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(ReviewAction, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VersionedContent for FakeGithub {
        async fn file_at_revision(
            &self,
            path: &str,
            revision: &str,
        ) -> anyhow::Result<Option<Vec<u8>>> {
            assert_eq!(path, CONFIG_PATH);
            assert_eq!(revision, "base-sha");
            Ok(self.config.map(|c| c.as_bytes().to_vec()))
        }
    }

    #[async_trait]
    impl ReviewerExecutor for FakeGithub {
        async fn mutate(
            &self,
            reviewers: &[String],
            action: ReviewAction,
            ctx: &RequestContext,
        ) -> anyhow::Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((action, reviewers.to_vec()));
            if self.fail_on == Some(action) {
                return Err(anyhow!("Reviews may only be requested from collaborators"));
            }
            Ok(ctx.url.clone())
        }
    }

    fn ctx(labels: &[&str], reviewers: &[&str]) -> RequestContext {
        RequestContext {
            owner: "acme".into(),
            repo: "widgets".into(),
            number: 12,
            url: "https://github.com/acme/widgets/pull/12".into(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            reviewers: reviewers.iter().map(|s| s.to_string()).collect(),
            base_sha: "base-sha".into(),
        }
    }

    fn inv(unassign: bool, input_labels: Option<&[&str]>) -> Invocation {
        Invocation {
            config_location: CONFIG_PATH.into(),
            headers: HashMap::new(),
            unassign_if_label_removed: unassign,
            input_labels: input_labels.map(|ls| ls.iter().map(|s| s.to_string()).collect()),
        }
    }

    const CONFIG: &str = "assign:\n  bug: [r1, r2]\n  docs: [r3]\n";

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn assigns_then_unassigns_with_folded_state() {
        let app = App::new(FakeGithub::with_config(CONFIG));
        let out = app
            .run(&ctx(&["bug"], &["r1", "r3"]), &inv(true, None))
            .await
            .unwrap();

        assert_eq!(
            out.assigned,
            ReconciliationResult::Success {
                url: "https://github.com/acme/widgets/pull/12".into(),
                reviewers: names(&["r2"]),
            }
        );
        assert_eq!(out.unassigned.as_ref().unwrap().reviewers(), names(&["r3"]));
        assert_eq!(
            app.client.calls(),
            vec![
                (ReviewAction::Assign, names(&["r2"])),
                (ReviewAction::Unassign, names(&["r3"])),
            ]
        );
    }

    #[tokio::test]
    async fn nothing_to_assign_is_info_and_does_not_stop_unassign() {
        let app = App::new(FakeGithub::with_config(CONFIG));
        let out = app
            .run(&ctx(&["bug"], &["r1", "r2"]), &inv(true, None))
            .await
            .unwrap();

        assert_eq!(out.assigned, ReconciliationResult::no_op("No matching reviewers"));
        assert_eq!(out.unassigned.unwrap().reviewers(), names(&["r3"]));
        assert_eq!(app.client.calls().len(), 1);
    }

    #[tokio::test]
    async fn every_mapped_label_active_leaves_nothing_to_unassign() {
        let app = App::new(FakeGithub::with_config(CONFIG));
        let out = app
            .run(&ctx(&["bug", "docs"], &["r1"]), &inv(true, None))
            .await
            .unwrap();

        assert_eq!(out.assigned.reviewers(), names(&["r2", "r3"]));
        assert_eq!(
            out.unassigned,
            Some(ReconciliationResult::no_op("No reviewers to unassign"))
        );
        assert_eq!(app.client.calls(), vec![(ReviewAction::Assign, names(&["r2", "r3"]))]);
    }

    #[tokio::test]
    async fn unassign_disabled_is_skipped() {
        let app = App::new(FakeGithub::with_config(CONFIG));
        let out = app.run(&ctx(&[], &[]), &inv(false, None)).await.unwrap();

        assert_eq!(out.assigned, ReconciliationResult::no_op("No matching reviewers"));
        assert_eq!(
            out.unassigned,
            Some(ReconciliationResult::no_op("Skip unassigning reviewers"))
        );
        assert!(app.client.calls().is_empty());
    }

    #[tokio::test]
    async fn no_labels_unassigns_everyone_mapped() {
        let app = App::new(FakeGithub::with_config(CONFIG));
        let out = app.run(&ctx(&[], &["r1"]), &inv(true, None)).await.unwrap();

        assert_eq!(
            out.unassigned.unwrap().reviewers(),
            names(&["r1", "r2", "r3"])
        );
    }

    #[tokio::test]
    async fn input_labels_override_request_labels() {
        let app = App::new(FakeGithub::with_config(CONFIG));
        let out = app
            .run(&ctx(&["bug"], &[]), &inv(true, Some(&["docs"])))
            .await
            .unwrap();

        assert_eq!(out.assigned.reviewers(), names(&["r3"]));
        assert_eq!(out.unassigned.unwrap().reviewers(), names(&["r1", "r2"]));
    }

    #[tokio::test]
    async fn failed_assign_halts_unassign() {
        let app = App::new(FakeGithub {
            fail_on: Some(ReviewAction::Assign),
            ..FakeGithub::with_config(CONFIG)
        });
        let out = app.run(&ctx(&["bug"], &[]), &inv(true, None)).await.unwrap();

        let ReconciliationResult::Failure { message } = &out.assigned else {
            panic!("expected failure, got {:?}", out.assigned);
        };
        assert!(message.starts_with("Failed to assign reviewers"));
        assert!(out.unassigned.is_none());
        assert_eq!(app.client.calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_unassign_is_reported_after_successful_assign() {
        let app = App::new(FakeGithub {
            fail_on: Some(ReviewAction::Unassign),
            ..FakeGithub::with_config(CONFIG)
        });
        let out = app.run(&ctx(&["bug"], &["r3"]), &inv(true, None)).await.unwrap();

        assert_eq!(out.assigned.reviewers(), names(&["r1", "r2"]));
        assert!(out.unassigned.unwrap().is_failure());
    }

    #[tokio::test]
    async fn config_errors_abort_the_run() {
        let err = App::new(FakeGithub::default())
            .run(&ctx(&["bug"], &[]), &inv(true, None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConfigLoad { .. }));

        let app = App::new(FakeGithub::with_config("assign:\n  bug: []\n"));
        let err = app
            .run(&ctx(&["bug"], &[]), &inv(true, None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(app.client.calls().is_empty());
    }

    #[tokio::test]
    async fn url_config_is_fetched_with_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer cfg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "assign": { "ui": ["designer"] } })),
            )
            .mount(&server)
            .await;

        let app = App::new(FakeGithub::default());
        let invocation = Invocation {
            config_location: format!("{}/reviewers.json", server.uri()),
            headers: HashMap::from([("authorization".to_string(), "Bearer cfg".to_string())]),
            ..inv(false, None)
        };
        let out = app.run(&ctx(&["ui"], &[]), &invocation).await.unwrap();
        assert_eq!(out.assigned.reviewers(), names(&["designer"]));
    }
}
