use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Assign,
    Unassign,
}

impl ReviewAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Assign => "assign",
            ReviewAction::Unassign => "unassign",
        }
    }

    pub fn pass_name(self) -> &'static str {
        match self {
            ReviewAction::Assign => "assigned",
            ReviewAction::Unassign => "unassigned",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerStatus {
    Success,
    Error,
    Info,
}

impl ReviewerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewerStatus::Success => "success",
            ReviewerStatus::Error => "error",
            ReviewerStatus::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationResult {
    NoOp { reason: String },
    Success { url: String, reviewers: Vec<String> },
    Failure { message: String },
}

impl ReconciliationResult {
    pub fn no_op(reason: impl Into<String>) -> Self {
        Self::NoOp {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> ReviewerStatus {
        match self {
            Self::NoOp { .. } => ReviewerStatus::Info,
            Self::Success { .. } => ReviewerStatus::Success,
            Self::Failure { .. } => ReviewerStatus::Error,
        }
    }

    pub fn message(&self, action: ReviewAction) -> String {
        match self {
            Self::NoOp { reason } => reason.clone(),
            Self::Success { .. } => format!("Reviewers have been {}", action.pass_name()),
            Self::Failure { message } => message.clone(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Success { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn reviewers(&self) -> &[String] {
        match self {
            Self::Success { reviewers, .. } => reviewers,
            _ => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}
