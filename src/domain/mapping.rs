use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RawConfig(pub Value);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerMapping {
    labels: BTreeMap<String, Vec<String>>,
}

impl ReviewerMapping {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.labels
            .iter()
            .map(|(label, reviewers)| (label.as_str(), reviewers.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<L, R> FromIterator<(L, Vec<R>)> for ReviewerMapping
where
    L: Into<String>,
    R: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, Vec<R>)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(l, rs)| (l.into(), rs.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

/// Validate `{ "assign": { "<label>": ["<reviewer>", ...] } }` into a mapping.
///
/// Names are trimmed; an empty label, reviewer, or reviewer list is rejected.
/// Top-level keys other than `assign` are ignored.
pub fn normalize(raw: &RawConfig) -> Result<ReviewerMapping> {
    let root = raw
        .0
        .as_object()
        .ok_or_else(|| Error::InvalidConfig("top level must be an object".into()))?;
    let assign = root
        .get("assign")
        .ok_or_else(|| Error::InvalidConfig("missing required key `assign`".into()))?
        .as_object()
        .ok_or_else(|| Error::InvalidConfig("`assign` must map labels to reviewer lists".into()))?;

    let mut labels = BTreeMap::new();
    for (label, reviewers) in assign {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::InvalidConfig("label names must not be empty".into()));
        }
        let list = reviewers.as_array().ok_or_else(|| {
            Error::InvalidConfig(format!("reviewers for label `{label}` must be a list"))
        })?;
        if list.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "label `{label}` has no reviewers"
            )));
        }
        let mut out = Vec::with_capacity(list.len());
        for reviewer in list {
            let Some(name) = reviewer.as_str() else {
                return Err(Error::InvalidConfig(format!(
                    "reviewer under label `{label}` must be a string, got {reviewer}"
                )));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "empty reviewer under label `{label}`"
                )));
            }
            out.push(name.to_string());
        }
        labels
            .entry(label.to_string())
            .or_insert_with(Vec::new)
            .extend(out);
    }

    Ok(ReviewerMapping { labels })
}
