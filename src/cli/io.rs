//! Thin dialoguer wrappers shared by the wizard and the dashboard.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::errors::IntakeError;

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, IntakeError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(IntakeError::from)
}

/// Prompt the user for free-form text input.
pub fn prompt_text(theme: &ColorfulTheme, prompt: &str) -> Result<String, IntakeError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .interact_text()
        .map_err(IntakeError::from)
}

/// Like [`prompt_text`] but an empty answer is accepted.
pub fn prompt_optional_text(theme: &ColorfulTheme, prompt: &str) -> Result<String, IntakeError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(IntakeError::from)
}

/// Single-choice menu; returns the selected index.
pub fn select(theme: &ColorfulTheme, prompt: &str, items: &[String]) -> Result<usize, IntakeError> {
    Select::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(IntakeError::from)
}
