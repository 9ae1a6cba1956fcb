use secrecy::SecretString;

use crate::error::AppResult;

/// Answer to a confirmation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Abort,
}

impl Decision {
    pub fn proceeds(&self) -> bool {
        matches!(self, Decision::Proceed)
    }
}

/// Interactive questions asked before destructive or free-text steps.
pub trait Prompter: Send + Sync {
    fn confirm(&self, question: &str) -> AppResult<Decision>;
    /// Free-text answer; `None` when the user enters nothing.
    fn ask(&self, label: &str) -> AppResult<Option<String>>;
    /// Like `ask`, without echoing the answer.
    fn ask_secret(&self, label: &str) -> AppResult<SecretString>;
}
