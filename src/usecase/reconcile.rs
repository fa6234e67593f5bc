use std::collections::HashSet;

use tracing::debug;

use crate::domain::mapping::ReviewerMapping;

pub type LabelSet = HashSet<String>;
pub type ReviewerState = HashSet<String>;

/// How the unassign pass treats labels that are still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Recompute from scratch: no label protects its reviewers.
    Default,
    /// React to the given labels only: active labels keep their reviewers.
    Override,
}

impl ReconcileMode {
    pub fn for_active(active: &LabelSet) -> Self {
        if active.is_empty() {
            ReconcileMode::Default
        } else {
            ReconcileMode::Override
        }
    }
}

/// Reviewers from every label for which `keep(label)` holds, first-seen order, deduplicated.
fn reviewers_where(mapping: &ReviewerMapping, keep: impl Fn(&str) -> bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (label, reviewers) in mapping.iter() {
        if !keep(label) {
            continue;
        }
        for r in reviewers {
            if seen.insert(r.as_str()) {
                out.push(r.clone());
            }
        }
    }
    out
}

pub fn compute_assignments(
    mapping: &ReviewerMapping,
    active: &LabelSet,
    already_requested: &ReviewerState,
) -> Vec<String> {
    let matched = reviewers_where(mapping, |label| active.contains(label));
    let to_add: Vec<String> = matched
        .into_iter()
        .filter(|r| !already_requested.contains(r))
        .collect();
    debug!(count = to_add.len(), reviewers = ?to_add, "computed assignments");
    to_add
}

/// Reviewers to un-request. An empty result means there is nothing to do.
///
/// The result is not filtered against `current`: removing a reviewer that
/// is not requested is harmless on the platform side.
pub fn compute_unassignments(
    mapping: &ReviewerMapping,
    active: &LabelSet,
    current: &ReviewerState,
    mode: ReconcileMode,
) -> Vec<String> {
    let candidates_for_removal = reviewers_where(mapping, |label| !active.contains(label));
    let still_justified = reviewers_where(mapping, |label| active.contains(label));

    if candidates_for_removal.is_empty() {
        debug!("no label missing, nothing newly disqualified");
        return Vec::new();
    }

    let to_remove = match mode {
        ReconcileMode::Default => {
            let mut all = candidates_for_removal;
            for r in still_justified {
                if !all.contains(&r) {
                    all.push(r);
                }
            }
            all
        }
        ReconcileMode::Override => candidates_for_removal
            .into_iter()
            .filter(|r| !still_justified.contains(r))
            .collect(),
    };

    debug!(
        ?mode,
        current = current.len(),
        reviewers = ?to_remove,
        "computed unassignments"
    );
    to_remove
}
