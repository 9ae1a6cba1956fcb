use std::io;

use dialoguer::{Confirm, Input, Password};
use secrecy::SecretString;

use crate::error::{AppError, AppResult};
use crate::services::{Decision, Prompter};

/// Asks on the terminal. With `assume_yes` every confirmation proceeds
/// without asking.
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> AppResult<Decision> {
        if self.assume_yes {
            return Ok(Decision::Proceed);
        }
        let confirmed = Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(prompt_error)?;
        Ok(decision(confirmed))
    }

    fn ask(&self, label: &str) -> AppResult<Option<String>> {
        let answer: String = Input::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        Ok(non_blank(answer))
    }

    fn ask_secret(&self, label: &str) -> AppResult<SecretString> {
        let password = Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(prompt_error)?;
        Ok(SecretString::from(password))
    }
}

pub(crate) fn prompt_error(err: dialoguer::Error) -> AppError {
    AppError::Io(io::Error::other(err))
}

fn decision(confirmed: bool) -> Decision {
    if confirmed {
        Decision::Proceed
    } else {
        Decision::Abort
    }
}

fn non_blank(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
