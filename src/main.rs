mod app;
mod domain;
mod error;
mod repo;
mod report;
mod usecase;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use app::{App, Invocation};
use domain::context::RequestContext;
use domain::labels::parse_input_labels;
use repo::config::parse_headers;
use repo::github::GithubClient;
use repo::github::auth::resolve_token;

#[derive(Parser, Debug)]
#[command(author, version, about = "Request or remove pull request reviewers based on labels", long_about = None)]
struct Args {
    /// GitHub token (falls back to GITHUB_TOKEN, then `gh auth token`)
    #[arg(long, env = "INPUT_REPO-TOKEN", hide_env_values = true)]
    repo_token: Option<String>,

    /// Config location: an http(s) URL or a path in the repository
    #[arg(long, env = "INPUT_CONFIG-FILE")]
    config_file: String,

    #[arg(long, env = "INPUT_UNASSIGN-IF-LABEL-REMOVED")]
    unassign_if_label_removed: Option<String>,

    /// JSON object of headers sent when the config is a URL
    #[arg(long, env = "INPUT_CONFIG-REQUEST-HEADERS")]
    config_request_headers: Option<String>,

    /// Labels to use instead of the pull request's labels, e.g. `["bug","ui"]`
    #[arg(long, env = "INPUT_INPUT-LABELS")]
    input_labels: Option<String>,

    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// `owner/name`, used when the payload has no repository
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_API_URL")]
    api_base: Option<String>,

    /// File receiving step outputs (stdout when unset)
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,
}

fn flag_enabled(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") => false,
        Some(v) => !(v.eq_ignore_ascii_case("false") || v == "0"),
    }
}

fn init_tracing() {
    let default_level = if std::env::var("RUNNER_DEBUG").as_deref() == Ok("1") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            println!("::error::{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let ctx = RequestContext::from_event_file(&args.event_path, args.repository.as_deref())?;
    debug!(pr = ctx.number, labels = ?ctx.labels, reviewers = ?ctx.reviewers, "pull request context");

    let invocation = Invocation {
        config_location: args.config_file.trim().to_string(),
        headers: parse_headers(args.config_request_headers.as_deref())?,
        unassign_if_label_removed: flag_enabled(args.unassign_if_label_removed.as_deref()),
        input_labels: parse_input_labels(args.input_labels.as_deref()),
    };
    if invocation.config_location.is_empty() {
        return Err(anyhow!("config-file input is required"));
    }

    let token = resolve_token(args.repo_token.as_deref())?;
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("failed to build tokio runtime: {e}"))?;

    let outcome = rt.block_on(async {
        let client = GithubClient::new(token, args.api_base.as_deref(), &ctx.owner, &ctx.repo)?;
        let outcome = App::new(client).run(&ctx, &invocation).await?;
        anyhow::Ok(outcome)
    })?;

    report::report_outcome(args.output_file.as_deref(), &outcome)
}
