use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ReviewersBody<'a> {
    pub reviewers: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct PullRequestRef {
    pub html_url: Option<String>,
    #[serde(default)]
    pub requested_reviewers: Vec<Login>,
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub login: String,
}
