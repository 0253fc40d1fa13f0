use a11yfix_core::select::{Chooser, SelectionError};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

/// Interactive list prompt on the controlling terminal.
///
/// `Esc`/`q` map to `Ok(None)`; a broken terminal surfaces as
/// [`SelectionError::Cancelled`] so an interrupted run still exits
/// cleanly.
pub struct TerminalChooser;

impl Chooser for TerminalChooser {
    fn choose(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>, SelectionError> {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(|_| SelectionError::Cancelled)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, SelectionError> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact_opt()
            .map(|answer| answer.unwrap_or(false))
            .map_err(|_| SelectionError::Cancelled)
    }
}
