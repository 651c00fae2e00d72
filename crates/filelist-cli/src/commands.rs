//! Command implementations shared by the subcommands and the REPL
//!
//! Each function collects parameters, calls the engine, and renders the
//! result. No reconciliation logic lives here.

use std::path::PathBuf;

use colored::Colorize;

use filelist_core::{Manifest, ReconciliationResult, engine, settings::SETTING_FIELDS};

use crate::context::Context;
use crate::error::Result;

/// Copy the named lists from source to destination.
///
/// Each list is processed independently; with `validate` set, the source
/// is checked against each list after its copy pass.
pub fn run_copy_lists(
    ctx: &Context,
    lists: &[String],
    validate: bool,
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
) -> Result<()> {
    let source = ctx.source(source)?;
    let destination = ctx.destination(destination)?;

    for name in lists {
        let path = ctx.settings.resolve_list_path(name);
        println!("{} Copying list {}...", "=>".blue().bold(), name.cyan());
        let manifest = Manifest::load(&path)?;
        let result = engine::copy(&manifest, &source, &destination)?;
        render_result(&result);

        if validate {
            let missing = engine::validate_source(&manifest, &source)?;
            render_missing(&missing, &format!("missing in source for {name}"));
        }
    }
    Ok(())
}

/// Mirror every regular file from source to destination.
pub fn run_copy_all(
    ctx: &Context,
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
) -> Result<()> {
    let source = ctx.source(source)?;
    let destination = ctx.destination(destination)?;

    let copied = engine::copy_all_from_folder(&source, &destination)?;
    println!(
        "{} {} files copied from {} to {}",
        "OK".green().bold(),
        copied,
        source.display().to_string().cyan(),
        destination.display().to_string().cyan()
    );
    Ok(())
}

/// Generate a manifest from the source folder's files.
///
/// The manifest lands in the configured lists folder when one is set,
/// otherwise in the destination folder.
pub fn run_list(
    ctx: &Context,
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
    name: &str,
) -> Result<()> {
    let source = ctx.source(source)?;
    let manifest = Manifest::generate_from_folder(&source)?;

    let out_path = match &ctx.settings.lists_folder {
        Some(folder) => folder.join(name),
        None => ctx.destination(destination)?.join(name),
    };
    manifest.write(&out_path)?;
    println!(
        "{} {} files listed, saved to {}",
        "OK".green().bold(),
        manifest.len(),
        out_path.display().to_string().cyan()
    );
    Ok(())
}

/// Validate one list against the source folder.
pub fn run_validate_list(ctx: &Context, list: &str) -> Result<()> {
    let source = ctx.source(None)?;
    let path = ctx.settings.resolve_list_path(list);
    let manifest = Manifest::load(&path)?;

    let missing = engine::validate_source(&manifest, &source)?;
    if missing.is_empty() {
        println!(
            "{} All files listed in {} are present in the source folder.",
            "OK".green().bold(),
            list.cyan()
        );
    } else {
        render_missing(&missing, "missing in source");
    }
    Ok(())
}

/// Validate that every source file exists in the destination.
pub fn run_validate_all(
    ctx: &Context,
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
) -> Result<()> {
    let source = ctx.source(source)?;
    let destination = ctx.destination(destination)?;

    let manifest = Manifest::generate_from_folder(&source)?;
    let missing = engine::validate_destination(&manifest, &destination)?;
    if missing.is_empty() {
        println!(
            "{} All source files are present in the destination folder.",
            "OK".green().bold()
        );
    } else {
        render_missing(&missing, "missing in destination");
    }
    Ok(())
}

/// Report destination files the list does not account for.
pub fn run_extra(ctx: &Context, list: &str, destination: Option<PathBuf>) -> Result<()> {
    let destination = ctx.destination(destination)?;
    let path = ctx.settings.resolve_list_path(list);
    let manifest = Manifest::load(&path)?;

    let extra = engine::extra_in_destination(&manifest, &destination)?;
    if extra.is_empty() {
        println!(
            "{} No unexpected files in the destination folder.",
            "OK".green().bold()
        );
    } else {
        println!(
            "{} Files not accounted for by {}:",
            "DRIFT".yellow().bold(),
            list.cyan()
        );
        for name in &extra {
            println!("   {} {}", "+".yellow(), name);
        }
    }
    Ok(())
}

/// Update one configured folder and persist.
pub fn run_set(ctx: &mut Context, field: &str, value: &str) -> Result<()> {
    ctx.store.set(&mut ctx.settings, field, value)?;
    println!("{} {} set to {}", "OK".green().bold(), field, value.cyan());
    Ok(())
}

/// Print the current settings.
pub fn run_settings(ctx: &Context) -> Result<()> {
    println!("Current settings:");
    for field in SETTING_FIELDS {
        let value = ctx
            .settings
            .get(field)
            .expect("SETTING_FIELDS names are always recognized");
        match value {
            Some(path) => println!("  {}: {}", field.dimmed(), path.display().to_string().cyan()),
            None => println!("  {}: {}", field.dimmed(), "Not set".dimmed()),
        }
    }
    Ok(())
}

fn render_result(result: &ReconciliationResult) {
    println!(
        "{} {} files copied.",
        "OK".green().bold(),
        result.copied
    );
    if !result.missing_in_source.is_empty() {
        render_missing(&result.missing_in_source, "not found in source");
    }
    if !result.missing_in_destination.is_empty() {
        render_missing(&result.missing_in_destination, "missing in destination");
    }
    if !result.extra_in_destination.is_empty() {
        println!(
            "{} {} unlisted files in destination (run 'extra' for details)",
            "DRIFT".yellow().bold(),
            result.extra_in_destination.len()
        );
    }
}

fn render_missing(missing: &std::collections::BTreeSet<String>, label: &str) {
    println!("{} {}:", "MISSING".yellow().bold(), label);
    for name in missing {
        println!("   {} {}", "-".yellow(), name);
    }
}
