use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

use crate::error::{Error, Result};

/// One entry of a selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

/// Asks the user questions.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Shows `choices` and returns the value of the one picked.
    async fn select(&self, prompt: &str, choices: Vec<Choice>) -> Result<String>;

    /// Asks a yes/no question.
    async fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// [`Prompter`] drawing on the controlling terminal with `dialoguer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn select(&self, prompt: &str, mut choices: Vec<Choice>) -> Result<String> {
        let prompt = prompt.to_string();
        let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();

        let index = tokio::task::spawn_blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .items(&labels)
                .default(0)
                .interact()
        })
        .await
        .map_err(|_| Error::PromptInterrupted)??;

        if index >= choices.len() {
            return Err(Error::PromptInterrupted);
        }
        Ok(choices.swap_remove(index).value)
    }

    async fn confirm(&self, prompt: &str) -> Result<bool> {
        let prompt = prompt.to_string();

        let answer = tokio::task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await
        .map_err(|_| Error::PromptInterrupted)??;

        Ok(answer)
    }
}
