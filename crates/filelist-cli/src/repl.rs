//! Interactive command loop
//!
//! A synchronous read-eval loop: one dialoguer prompt, a dispatch table
//! keyed on the first token, fixed argument arities. Tab completes list
//! names for the list-taking commands and filesystem paths elsewhere;
//! unrecognized commands print an error and change nothing.

use std::path::PathBuf;

use colored::Colorize;
use dialoguer::{BasicHistory, Completion, Input};

use crate::commands;
use crate::context::Context;
use crate::error::Result;

const COMMANDS: &[&str] = &[
    "set",
    "copy",
    "copy_all",
    "list",
    "list_all",
    "validate",
    "validate_all",
    "settings",
    "menu",
    "exit",
    "quit",
];

/// Commands whose first argument is a list name
const LIST_COMMANDS: &[&str] = &["copy", "validate"];

/// Run the interactive loop until `exit` or `quit`.
pub fn run(ctx: &mut Context) -> Result<()> {
    print_menu();

    let mut history = BasicHistory::new().max_entries(32).no_duplicates(true);
    loop {
        let completer = ReplCompleter {
            lists_folder: ctx.settings.lists_folder.clone(),
        };
        let line: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .history_with(&mut history)
            .completion_with(&completer)
            .interact_text()?;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed.to_lowercase().as_str(), "exit" | "quit") {
            println!("Exiting File List Manager. Goodbye!");
            return Ok(());
        }

        // Command failures are rendered and the loop continues
        if let Err(e) = dispatch(ctx, trimmed) {
            eprintln!("{}: {}", "error".red().bold(), e);
        }
    }
}

/// Dispatch one command line.
///
/// Overloaded commands are resolved by arity alone, never by probing the
/// filesystem: `copy` with no arguments mirrors the configured folders,
/// with arguments it copies lists; `validate` with exactly one argument
/// validates a list, otherwise it compares folders.
fn dispatch(ctx: &mut Context, line: &str) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let (cmd, args) = parts.split_first().expect("line is non-empty");

    match (*cmd, args.len()) {
        ("set", 2) => commands::run_set(ctx, args[0], args[1]),
        ("set", _) => usage("set <source_folder|destination_folder|lists_folder> <path>"),

        ("copy_all", 0) => commands::run_copy_all(ctx, None, None),
        ("copy_all", 2) => {
            commands::run_copy_all(ctx, Some(args[0].into()), Some(args[1].into()))
        }
        ("copy_all", _) => usage("copy_all [source_folder destination_folder]"),

        ("copy", 0) => commands::run_copy_all(ctx, None, None),
        ("copy", _) => {
            let (lists, validate) = match args.split_last() {
                Some((last, rest)) if *last == "validate" && !rest.is_empty() => (rest, true),
                _ => (args, false),
            };
            let lists: Vec<String> = lists.iter().map(|s| s.to_string()).collect();
            commands::run_copy_lists(ctx, &lists, validate, None, None)
        }

        ("list" | "list_all", n) if n <= 3 => {
            let source = args.first().map(PathBuf::from);
            let destination = args.get(1).map(PathBuf::from);
            let name = args.get(2).copied().unwrap_or("file_list.json");
            commands::run_list(ctx, source, destination, name)
        }
        ("list" | "list_all", _) => {
            usage("list [source_folder destination_folder [json_filename]]")
        }

        ("validate", 1) => commands::run_validate_list(ctx, args[0]),
        ("validate" | "validate_all", 0) => commands::run_validate_all(ctx, None, None),
        ("validate" | "validate_all", 2) => {
            commands::run_validate_all(ctx, Some(args[0].into()), Some(args[1].into()))
        }
        ("validate" | "validate_all", _) => {
            usage("validate <list> | validate [source_folder destination_folder]")
        }

        ("settings", _) => commands::run_settings(ctx),
        ("menu", _) => {
            print_menu();
            Ok(())
        }

        _ => {
            println!(
                "{} Invalid command {:?}. Type {} for help.",
                "error".red().bold(),
                cmd,
                "menu".cyan()
            );
            Ok(())
        }
    }
}

fn usage(text: &str) -> Result<()> {
    println!("Usage: {text}");
    Ok(())
}

fn print_menu() {
    println!(
        "
Welcome to {}. Available commands:

  {} set <field> <path>          Configure source_folder, destination_folder, or lists_folder
  {} copy <list>... [validate]   Copy manifest-declared files (settings folders)
  {} copy_all [src] [dst]        Copy every file from source to destination
  {} list [src] [dst] [name]     Save a folder's file list as a manifest
  {} validate <list>             Check a list against the source folder
  {} validate_all [src] [dst]    Check that all source files reached the destination
  {} settings                    Print the current settings
  {} menu                        Print this menu again
  {} exit | quit                 Leave the loop
",
        "File List Manager".bold(),
        "1.".dimmed(),
        "2.".dimmed(),
        "3.".dimmed(),
        "4.".dimmed(),
        "5.".dimmed(),
        "6.".dimmed(),
        "7.".dimmed(),
        "8.".dimmed(),
        "9.".dimmed(),
    );
}

/// Tab completion for the prompt.
///
/// Completes command names for the first token, list names from the
/// configured lists folder for the list-taking commands, and filesystem
/// paths for everything else.
struct ReplCompleter {
    lists_folder: Option<PathBuf>,
}

impl Completion for ReplCompleter {
    fn get(&self, input: &str) -> Option<String> {
        if input.ends_with(char::is_whitespace) {
            return None;
        }
        let mut tokens: Vec<&str> = input.split_whitespace().collect();
        let current = tokens.pop()?;

        let candidates = if tokens.is_empty() {
            command_candidates(current)
        } else if LIST_COMMANDS.contains(&tokens[0]) {
            self.list_candidates(current)
        } else {
            path_candidates(current)
        };

        let completed = pick(current, &candidates)?;
        let mut line = tokens.join(" ");
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&completed);
        Some(line)
    }
}

impl ReplCompleter {
    fn list_candidates(&self, prefix: &str) -> Vec<String> {
        let Some(folder) = &self.lists_folder else {
            return path_candidates(prefix);
        };
        filelist_fs::io::list_file_names(folder)
            .unwrap_or_default()
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect()
    }
}

fn command_candidates(prefix: &str) -> Vec<String> {
    COMMANDS
        .iter()
        .filter(|cmd| cmd.starts_with(prefix))
        .map(|cmd| cmd.to_string())
        .collect()
}

fn path_candidates(prefix: &str) -> Vec<String> {
    let path = PathBuf::from(prefix);
    let (dir, stem) = if prefix.ends_with('/') {
        (path.clone(), String::new())
    } else {
        let stem = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = path.parent().map(PathBuf::from).unwrap_or_default();
        (dir, stem)
    };
    let listing_dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.clone()
    };

    let Ok(entries) = std::fs::read_dir(&listing_dir) else {
        return Vec::new();
    };
    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(&stem) {
            continue;
        }
        let mut full = dir.join(&name).to_string_lossy().into_owned();
        if entry.path().is_dir() {
            full.push('/');
        }
        candidates.push(full);
    }
    candidates.sort();
    candidates
}

/// Complete to the sole candidate, or extend to the longest common
/// prefix when that makes progress.
fn pick(current: &str, candidates: &[String]) -> Option<String> {
    match candidates {
        [] => None,
        [only] => Some(only.clone()),
        _ => {
            let mut prefix = candidates[0].clone();
            for candidate in &candidates[1..] {
                let shared = prefix
                    .chars()
                    .zip(candidate.chars())
                    .take_while(|(a, b)| a == b)
                    .count();
                prefix.truncate(
                    prefix
                        .char_indices()
                        .nth(shared)
                        .map_or(prefix.len(), |(i, _)| i),
                );
            }
            (prefix.len() > current.len()).then_some(prefix)
        }
    }
}
