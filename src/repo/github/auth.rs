use std::process::Command;

use anyhow::{Result, anyhow};

fn non_empty_token(raw: &str, source: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("GitHub token from {source} is empty after trimming"));
    }
    Ok(trimmed.to_string())
}

fn token_from_env_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(raw) => non_empty_token(&raw, &format!("env {name}")).map(Some),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(anyhow!("failed to read env {name}: {e}")),
    }
}

fn token_from_gh_auth_token() -> Result<String> {
    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);

    if let Ok(host) = std::env::var("GH_HOST") {
        let host = host.trim();
        if !host.is_empty() {
            cmd.args(["--hostname", host]);
        }
    }

    let output = cmd
        .output()
        .map_err(|e| anyhow!("failed to execute `gh auth token`: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "`gh auth token` failed (exit {}): {}",
            output.status,
            stderr.trim()
        ));
    }

    non_empty_token(&String::from_utf8_lossy(&output.stdout), "`gh auth token`")
}

/// Resolve the GitHub token.
///
/// Priority:
/// 1) the `repo-token` input
/// 2) `GITHUB_TOKEN`
/// 3) `gh auth token` (optionally with `GH_HOST`)
pub fn resolve_token(explicit: Option<&str>) -> Result<String> {
    if let Some(raw) = explicit {
        return non_empty_token(raw, "repo-token input");
    }
    if let Some(token) = token_from_env_var("GITHUB_TOKEN")? {
        return Ok(token);
    }
    token_from_gh_auth_token()
}
