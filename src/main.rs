//! tasksheet
//!
//! A sheet-backed task tracker: tasks live as rows in a tabular store,
//! with cached listing and aggregate analytics.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tasksheet::analytics::analyze;
use tasksheet::cli::{AddArgs, Cli, Command, ListArgs};
use tasksheet::config::{TrackerConfig, load_config};
use tasksheet::error::TrackerError;
use tasksheet::format::{OutputFormat, format_report, format_task_list};
use tasksheet::ops::TaskOps;
use tasksheet::store::{FileGrid, TaskStore};
use tasksheet::types::{TaskDraft, TaskStatus};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(store_path) = cli.store {
        config.store_path = store_path;
    }

    let grid = FileGrid::open(&config.store_path)?;
    let store = TaskStore::new(grid, &config);
    let ops = TaskOps::new(store, &config);

    match cli.command {
        Command::Init { force } => init(&ops, &config, force),
        Command::Add(args) => add(&ops, args),
        Command::Batch { file } => batch(&ops, &file),
        Command::Done { id } => {
            if ops.complete_task(id)? {
                println!("Completed task #{id}");
            } else {
                println!("No task with id {id}");
            }
            Ok(())
        }
        Command::Rm { id } => {
            if ops.delete_task(id)? {
                println!("Deleted task #{id}");
            } else {
                println!("No task with id {id}");
            }
            Ok(())
        }
        Command::List(args) => list(&ops, args),
        Command::Stats { format } => stats(&ops, &format),
    }
}

fn init(ops: &TaskOps, config: &TrackerConfig, force: bool) -> Result<()> {
    if ops.is_initialized() && !force {
        anyhow::bail!(
            "store already initialized at {}; pass --force to reset it (destructive)",
            config.store_path.display()
        );
    }
    ops.init_store()?;
    println!("Initialized task store at {}", config.store_path.display());
    Ok(())
}

fn add(ops: &TaskOps, args: AddArgs) -> Result<()> {
    let draft = TaskDraft {
        title: args.title,
        priority: args.priority,
        due_date: args.due,
        notes: args.notes,
        tags: args.tags,
        assignee: args.assignee,
    };
    let id = ops.add_task(draft)?;
    println!("Added task #{id}");
    Ok(())
}

fn batch(ops: &TaskOps, file: &std::path::Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|err| TrackerError::validation(format!("cannot read batch file: {err}")))?;
    let drafts: Vec<TaskDraft> = serde_json::from_str(&text).map_err(|err| {
        TrackerError::validation(format!("batch file must be a JSON array of drafts: {err}"))
    })?;

    let requested = drafts.len();
    let added = ops.add_tasks_batch(drafts)?;
    if added < requested {
        println!("Added {added} of {requested} tasks (some chunks failed, see log)");
    } else {
        println!("Added {added} tasks");
    }
    Ok(())
}

fn list(ops: &TaskOps, args: ListArgs) -> Result<()> {
    let status = match args.status.as_deref() {
        Some(s) => Some(TaskStatus::from_str(s).ok_or_else(|| {
            TrackerError::validation(format!(
                "unknown status '{s}' (expected pending, in_progress, completed, or blocked)"
            ))
        })?),
        None => None,
    };
    let tasks = ops.list_tasks(status, !args.no_cache)?;
    print!("{}", format_task_list(&tasks));
    Ok(())
}

fn stats(ops: &TaskOps, format: &str) -> Result<()> {
    let format = OutputFormat::from_str(format).ok_or_else(|| {
        TrackerError::validation(format!("unknown format '{format}' (expected text or json)"))
    })?;
    let tasks = ops.list_tasks(None, true)?;
    let report = analyze(&tasks, Utc::now());
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", format_report(&report)),
    }
    Ok(())
}
