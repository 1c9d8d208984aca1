//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;
use console::style;

use crate::domain::VersionBump;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_manual_push_instruction,
    display_proposed_tag, display_status, display_success,
};

fn read_answer(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase())
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive). Default is "no" if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    let response = read_answer(&format!("\n{} (y/N): ", prompt))?;
    Ok(response == "y" || response == "yes")
}

/// Prompts user to confirm pushing a locally created tag to a remote.
///
/// Default is not to push (user must enter "y" or "yes" to confirm).
pub fn confirm_push_tag(tag: &str, remote: &str) -> Result<bool> {
    confirm_action(&format!(
        "Tag '{}' created locally. Push to remote '{}'?",
        tag, remote
    ))
}

/// Interpret an answer to [select_bump].
///
/// # Returns
/// * `Ok(Some(bump))` - `major`/`minor`/`patch` or their first letter
/// * `Ok(None)` - Empty input, `n` or `no`
/// * `Err` - Anything else
pub fn parse_bump_answer(answer: &str) -> Result<Option<VersionBump>> {
    match answer.trim().to_lowercase().as_str() {
        "" | "n" | "no" => Ok(None),
        "major" | "ma" => Ok(Some(VersionBump::Major)),
        "minor" | "mi" => Ok(Some(VersionBump::Minor)),
        "patch" | "p" => Ok(Some(VersionBump::Patch)),
        other => Err(anyhow::anyhow!("Invalid selection '{}'", other)),
    }
}

/// Asks whether to increment a project, and by how much.
///
/// Default is to skip the project if user presses Enter.
pub fn select_bump(project: &str) -> Result<Option<VersionBump>> {
    let answer = read_answer(&format!(
        "\nIncrement {}? [{}/{}/{}/N]: ",
        style(project).cyan().bold(),
        "major(ma)",
        "minor(mi)",
        "patch(p)"
    ))?;
    parse_bump_answer(&answer)
}
