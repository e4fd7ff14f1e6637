//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskpad_core` linkage.
//! - Optionally dump the tasks stored in a SQLite file.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use taskpad_core::{parse_filter, render, Filter, SqliteKeyValueStore, TaskListView, TaskStore};

/// Taskpad core probe: prints linkage info and optionally lists stored tasks.
#[derive(Parser, Debug)]
#[command(name = "taskpad_cli", version, about)]
struct Cli {
    /// SQLite file to read tasks from.
    db_path: Option<PathBuf>,

    /// Which tasks to list: all, active or completed.
    #[arg(value_parser = parse_filter, default_value = "all")]
    filter: Filter,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("taskpad_core ping={}", taskpad_core::ping());
    println!("taskpad_core version={}", taskpad_core::core_version());

    let Some(db_path) = cli.db_path else {
        return ExitCode::SUCCESS;
    };
    let kv = match SqliteKeyValueStore::open(&db_path) {
        Ok(kv) => kv,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let tasks = TaskStore::new(kv).load();

    println!("filter={} total={}", cli.filter.as_str(), tasks.len());
    match render(&tasks, cli.filter) {
        TaskListView::Placeholder { message } => println!("{message}"),
        TaskListView::Items(items) => {
            for item in items {
                let mark = if item.checked { "x" } else { " " };
                println!("[{mark}] {} {}", item.id, item.text);
            }
        }
    }
    ExitCode::SUCCESS
}
