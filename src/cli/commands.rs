use std::io::Write;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use super::{IncrementArgs, StatusArgs, TagsArgs};
use crate::boundary::BoundaryWarning;
use crate::domain::{format_tag_name, Tag};
use crate::git::Repository;
use crate::remote_url::RepoUrl;
use crate::repo::{ProjectStatus, Repo, StatusOptions};
use crate::ui::{self, formatter};

/// `#idx name` for every project.
pub fn run_list<R: Repository>(repo: &Repo<R>, out: &mut dyn Write) -> Result<()> {
    for project in repo.projects() {
        writeln!(out, "{}", formatter::format_project_label(project.info()))?;
    }
    Ok(())
}

/// Tag chains of the selected projects, newest first.
pub fn run_tags<R: Repository>(repo: &Repo<R>, args: &TagsArgs, out: &mut dyn Write) -> Result<()> {
    let query = args.query();

    for project in repo.select(args.projects.as_slice()) {
        writeln!(out, "{}", formatter::format_project_label(project.info()))?;

        let entries = project.tags().query(&query);
        if entries.is_empty() {
            writeln!(out, "    {}", style("no tags").yellow())?;
            continue;
        }

        for entry in entries {
            let commit = repo.backend().commit_info(entry.target)?;
            writeln!(out, "    {}", formatter::format_tag_line(entry.tag(), Some(&commit)))?;
        }
    }
    Ok(())
}

/// Changes of the selected projects since their latest tag.
pub fn run_status<R: Repository>(
    repo: &mut Repo<R>,
    args: &StatusArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let options = StatusOptions {
        include_prerelease: args.include_prerelease,
        with_commits: args.show_commits,
        ..Default::default()
    };

    let statuses = repo
        .select(args.projects.as_slice())
        .iter()
        .map(|project| project.status(&options))
        .collect::<crate::error::Result<Vec<_>>>()?;

    let repo_url = repo.repo_url()?;
    if !args.summary_only {
        if let Some(RepoUrl { https_url: None, .. }) = repo_url {
            ui::display_boundary_warning(&BoundaryWarning::NoWebUrl {
                remote: repo.config().git.remote.clone(),
            });
        }
    }

    for status in &statuses {
        write_status(out, status, repo_url.as_ref(), args)?;

        if args.interactive && status.latest.is_some() && !status.summary().is_empty() {
            out.flush()?;
            if let Some(bump) = ui::select_bump(&status.project.name)? {
                let tag = repo.increment(&status.project.name, bump)?;
                ui::display_success(&format!("Created tag: {}", tag));
                publish(repo, &tag, false, true)?;
            }
        }
    }
    Ok(())
}

fn write_status(
    out: &mut dyn Write,
    status: &ProjectStatus,
    repo_url: Option<&RepoUrl>,
    args: &StatusArgs,
) -> Result<()> {
    let label = formatter::format_project_label(&status.project);

    let (tag, tagged) = match (&status.latest, &status.tagged_commit) {
        (Some(tag), Some(tagged)) => (tag, tagged),
        _ => {
            writeln!(out, "{}: {}", label, style("no tag").yellow())?;
            return Ok(());
        }
    };

    writeln!(out, "{}: {}", label, status.summary())?;
    if args.summary_only {
        return Ok(());
    }

    writeln!(
        out,
        "  branch: {} {}",
        formatter::git_name(&status.branch),
        formatter::format_commit_meta(&status.head)
    )?;
    writeln!(out, "          {}", status.head.summary)?;
    writeln!(
        out,
        "  tag   : {} {}",
        formatter::git_name(&tag.reference),
        formatter::format_commit_meta(tagged)
    )?;
    writeln!(out, "          {}", tagged.summary)?;

    let scope = if status.project.directory.is_empty() {
        "."
    } else {
        status.project.directory.as_str()
    };
    let log = format!("git log --oneline {}..{} -- {}", tag.reference, status.branch, scope);
    writeln!(out, "     log: {}", style(log).cyan())?;

    if let Some(link) = repo_url.and_then(|url| url.compare_url(&tag.reference, &status.branch)) {
        writeln!(out, " compare: {}", style(link).cyan())?;
    }

    if args.show_commits && !status.commits.is_empty() {
        writeln!(out, " commits:")?;
        for scanned in &status.commits {
            writeln!(out, "    {}", formatter::format_commit_line(&scanned.commit))?;
            if args.show_files {
                for change in &scanned.changes {
                    writeln!(out, "      {}", formatter::format_change(change))?;
                }
            }
        }
    }

    if args.show_files && !status.changes.is_empty() {
        writeln!(out, " changes:")?;
        for change in &status.changes {
            writeln!(out, "    {}", formatter::format_change(change))?;
        }
    }
    Ok(())
}

/// Tag the branch tip with the next version of one project.
///
/// # Returns
/// * `Ok(Some(tag))` - The created tag
/// * `Ok(None)` - The user declined
pub fn run_increment<R: Repository>(repo: &mut Repo<R>, args: &IncrementArgs) -> Result<Option<Tag>> {
    let (current, proposed, status) = {
        let project = repo.project(&args.project)?;
        let options = StatusOptions {
            include_prerelease: true,
            ..Default::default()
        };
        (
            project.tags().head().map(|head| head.display_name()),
            format_tag_name(project.name(), &project.next_version(args.bump)?),
            project.status(&options)?,
        )
    };

    match &status.latest {
        None => ui::display_boundary_warning(&BoundaryWarning::NoTag {
            project: status.project.name.clone(),
        }),
        Some(latest) if status.summary().is_empty() => {
            ui::display_boundary_warning(&BoundaryWarning::NoChangesSinceTag {
                tag: latest.reference.clone(),
                current_commit_hash: status.head.id.to_string(),
            })
        }
        Some(_) => debug!(changes = %status.summary(), "changes since latest tag"),
    }

    ui::display_proposed_tag(current.as_deref(), &proposed);

    if !args.yes && !ui::confirm_action(&format!("Create tag {}?", proposed))? {
        println!("Tag creation cancelled by user.");
        return Ok(None);
    }

    let tag = repo
        .increment(&args.project, args.bump)
        .with_context(|| format!("Failed to create tag '{}'", proposed))?;
    ui::display_success(&format!("Created tag: {}", tag));

    publish(repo, &tag, args.push, !args.yes)?;
    Ok(Some(tag))
}

/// Push a created tag when requested or confirmed; otherwise explain how to.
fn publish<R: Repository>(repo: &Repo<R>, tag: &Tag, push: bool, ask: bool) -> Result<()> {
    let remote = repo.config().git.remote.clone();
    let should_push = push || (ask && ui::confirm_push_tag(&tag.reference, &remote)?);

    if should_push {
        ui::display_status(&format!("Pushing tag: {} to {}", tag, remote));
        repo.push_tag(tag)
            .with_context(|| format!("Failed to push tag '{}'", tag))?;
        ui::display_success(&format!("Pushed tag: {} to {}", tag, remote));
    } else {
        ui::display_boundary_warning(&BoundaryWarning::TagNotPushed {
            tag: tag.reference.clone(),
            remote: remote.clone(),
        });
        ui::display_manual_push_instruction(&tag.reference, &remote);
    }
    Ok(())
}
