//! The immutable step value produced by extraction.

/// One unit of an operational procedure.
///
/// Steps are derived fresh from a [`crate::Runbook`] definition on every
/// run; only their name and the operator's response are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Canonical identifier, used as the resume-matching key.
    pub name: String,

    /// Free text shown to the operator; may be empty.
    pub description: String,

    /// Overrides `name` for display only; never used for resume matching.
    pub display_name: Option<String>,

    /// A negative answer is accepted without requiring a reason.
    pub skippable: bool,

    /// Re-presented on resume even if already recorded as completed.
    pub repeatable: bool,

    /// Cannot be declined; negative answers are rejected and re-prompted.
    pub critical: bool,
}

impl Step {
    /// The name to show the operator: the display override if set,
    /// otherwise the canonical name.
    #[must_use]
    pub fn preferred_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}
