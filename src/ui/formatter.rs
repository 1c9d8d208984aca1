//! Pure formatting functions for UI output.
//!
//! The `format_*` functions build styled strings and are unit tested with the
//! ANSI codes stripped. The `display_*` functions print them.

use chrono::{Local, TimeZone};
use console::{style, Color, StyledObject};

use crate::boundary::BoundaryWarning;
use crate::domain::{ChangeKind, ChangeRecord, ProjectInfo, Tag};
use crate::git::CommitInfo;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the proposed tag change (or initial tag).
pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    match old_tag {
        Some(old) => {
            println!("\n{}", style("Proposed Tag Change:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(new_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Tag:").bold());
            println!("  New tag: {}", style(new_tag).green());
        }
    }
}

/// Display manual push instruction for a tag.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}

pub fn project_name(name: &str) -> StyledObject<&str> {
    style(name).cyan().bold()
}

pub fn git_name(name: &str) -> StyledObject<&str> {
    style(name).magenta()
}

/// `#idx Name`, index right aligned.
pub fn format_project_label(project: &ProjectInfo) -> String {
    format!("{:>3} {}", project.label(), project_name(&project.name))
}

/// Local date and time of a commit timestamp.
pub fn format_date(seconds: i64) -> String {
    Local
        .timestamp_opt(seconds, 0)
        .single()
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

/// `{author} {date}` for a commit header line.
pub fn format_commit_meta(commit: &CommitInfo) -> String {
    format!(
        "{} {}",
        style(&commit.author).blue(),
        style(format_date(commit.time)).dim()
    )
}

/// One line per commit: short hash, summary, author and date.
pub fn format_commit_line(commit: &CommitInfo) -> String {
    format!(
        "{} {} {}",
        style(commit.short_id()).yellow(),
        commit.summary,
        format_commit_meta(commit)
    )
}

/// Colour used for a change kind.
pub fn change_color(kind: ChangeKind) -> Color {
    match kind {
        ChangeKind::Added | ChangeKind::Copied => Color::Green,
        ChangeKind::Deleted => Color::Red,
        _ => Color::Yellow,
    }
}

/// `{kind:>11} : {path}` coloured by kind.
pub fn format_change(change: &ChangeRecord) -> String {
    let line = format!("{:>11} : {}", change.kind, change.display_path());
    style(line).fg(change_color(change.kind)).to_string()
}

/// A tag of a chain with the commit it points at.
pub fn format_tag_line(tag: &Tag, commit: Option<&CommitInfo>) -> String {
    let name = if tag.is_prerelease() {
        style(tag.display_name()).dim()
    } else {
        style(tag.display_name()).green()
    };

    match commit {
        Some(commit) => format!(
            "{} {} {}",
            name,
            style(commit.short_id()).yellow(),
            style(format_date(commit.time)).dim()
        ),
        None => name.to_string(),
    }
}
