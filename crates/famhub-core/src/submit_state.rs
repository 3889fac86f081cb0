//! Form submission state (idle/submitting).
//!
//! Ensures only one submit per form runs at a time. Used by the new-post form.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
}

impl SubmitState {
    /// True if a new submit can be started.
    pub fn can_submit(self) -> bool {
        matches!(self, SubmitState::Idle)
    }

    /// State after the submit button is pressed.
    pub fn on_submit(self) -> Self {
        SubmitState::Submitting
    }

    /// State after the request finished, successfully or not.
    pub fn on_done(self) -> Self {
        SubmitState::Idle
    }

    /// Label for the submit button.
    pub fn button_label(self) -> &'static str {
        match self {
            SubmitState::Idle => "Post",
            SubmitState::Submitting => "Saving...",
        }
    }
}
