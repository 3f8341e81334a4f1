//! Interactive prompt seam
//!
//! The wizard, the provisioner and the orchestrator only talk to the terminal
//! through [`Prompter`], so each stage can be driven by a scripted double.

mod menu;
mod terminal;

pub use menu::{YesNo, parse_menu_choice, render_menu};
pub use terminal::{DialoguerPrompter, clear_input_buffer};

use crate::error::Result;

/// Line-oriented terminal interaction
pub trait Prompter {
    /// Read one line of visible input. Empty input is allowed.
    fn line(&mut self, prompt: &str) -> Result<String>;

    /// Read one line without echoing it
    fn secret(&mut self, prompt: &str) -> Result<String>;

    /// Show informational text
    fn say(&mut self, message: &str);
}

/// Ask a yes/no question until the answer parses
pub fn ask_yes_no(prompter: &mut dyn Prompter, question: &str) -> Result<bool> {
    loop {
        let answer = prompter.line(&format!("{question} (y/n)"))?;
        match YesNo::parse(&answer) {
            Some(choice) => return Ok(choice.into()),
            None => prompter.say("❌ Please answer y or n."),
        }
    }
}

/// Show a numbered menu and return the zero-based index of the chosen option.
///
/// Anything other than one of the listed numbers re-asks the same question.
pub fn ask_menu(prompter: &mut dyn Prompter, title: &str, options: &[&str]) -> Result<usize> {
    loop {
        prompter.say(&render_menu(title, options));
        let answer = prompter.line(&format!("Choose an option [1-{}]", options.len()))?;
        match parse_menu_choice(&answer, options.len()) {
            Some(index) => return Ok(index),
            None => prompter.say(&format!(
                "❌ Invalid choice '{}'. Enter a number between 1 and {}.",
                answer.trim(),
                options.len()
            )),
        }
    }
}

/// Ask for a required visible value.
///
/// A non-empty `default` is shown in brackets and kept on empty input. Without
/// one, empty input re-asks. `validate` may reject the value with a message.
pub fn ask_required(
    prompter: &mut dyn Prompter,
    label: &str,
    default: &str,
    validate: impl Fn(&str) -> std::result::Result<(), String>,
) -> Result<String> {
    let prompt = if default.is_empty() {
        label.to_string()
    } else {
        format!("{label} [{default}]")
    };

    loop {
        let input = prompter.line(&prompt)?;
        let value = match input.trim() {
            "" if default.is_empty() => {
                prompter.say("❌ A value is required.");
                continue;
            }
            "" => default.to_string(),
            entered => entered.to_string(),
        };

        match validate(&value) {
            Ok(()) => return Ok(value),
            Err(reason) => prompter.say(&format!("❌ {reason}")),
        }
    }
}

/// Ask for a required secret. A non-empty `default` is kept on empty input
/// and is never shown.
pub fn ask_required_secret(prompter: &mut dyn Prompter, label: &str, default: &str) -> Result<String> {
    let prompt = if default.is_empty() {
        label.to_string()
    } else {
        format!("{label} (leave blank to keep the current one)")
    };

    loop {
        let input = prompter.secret(&prompt)?;
        if !input.is_empty() {
            return Ok(input);
        }
        if !default.is_empty() {
            return Ok(default.to_string());
        }
        prompter.say("❌ A value is required.");
    }
}
