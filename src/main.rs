//! taskling CLI: natural-language task commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use uuid::Uuid;

use taskling::classify::FallbackModels;
use taskling::command::CommandParser;
use taskling::paths::TasklingPaths;
use taskling::store::{DoneFilter, TaskSort, TaskStore};
use taskling::task::Task;

#[derive(Parser)]
#[command(name = "taskling", version, about = "Natural-language task commands")]
struct Cli {
    /// Data directory for the task database (defaults to the XDG data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory scanned for classifier model artifacts.
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a command and print the structured result without storing it.
    Parse {
        /// Raw command text, e.g. "remind me to buy milk by tomorrow".
        text: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse a command and store the resulting task.
    Add {
        /// Raw command text.
        text: String,
    },

    /// List stored tasks.
    List {
        /// Filter by done state: "true" or "false".
        #[arg(long)]
        done: Option<String>,

        /// Sort order: created, priority, due, or category.
        #[arg(long, default_value = "created")]
        sort: String,
    },

    /// Mark a task as done by name.
    Done {
        /// Task name, matched case-insensitively.
        name: String,
    },

    /// Delete a task by name.
    Rm {
        /// Task name, matched case-insensitively.
        name: String,
    },

    /// Flip a task's done state by id.
    Toggle {
        /// Task id.
        id: Uuid,
    },

    /// Delete tasks in bulk.
    Clear {
        /// Only delete completed tasks.
        #[arg(long)]
        completed: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let paths = TasklingPaths::resolve()?;
    let db_dir = cli.data_dir.clone().unwrap_or_else(|| paths.db_dir());
    let models_dir = cli.models_dir.clone().unwrap_or_else(|| paths.models_dir());
    if cli.data_dir.is_none() || cli.models_dir.is_none() {
        paths.ensure_dirs()?;
    }

    match cli.command {
        Commands::Parse { text, json } => {
            let models = FallbackModels::load(&models_dir);
            let parser = CommandParser::with_models(&models);
            let parsed = parser.parse(&text);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&parsed).into_diagnostic()?
                );
            } else {
                println!("name:     {}", parsed.name);
                println!("priority: {}", parsed.priority);
                println!("category: {}", parsed.category);
                match parsed.due_date {
                    Some(due) => println!("due:      {}", due.format("%Y-%m-%d %H:%M")),
                    None => println!("due:      -"),
                }
            }
        }

        Commands::Add { text } => {
            let models = FallbackModels::load(&models_dir);
            let parser = CommandParser::with_models(&models);
            let parsed = parser.parse(&text);

            if parsed.name.is_empty() {
                miette::bail!("empty task name after parsing");
            }

            let store = TaskStore::open(&db_dir)?;
            let task = Task::new(parsed.name, parsed.priority, parsed.category, parsed.due_date);
            store.insert(&task)?;
            println!("{}", task.confirmation_message());
        }

        Commands::List { done, sort } => {
            let store = TaskStore::open(&db_dir)?;
            let filter = DoneFilter::from_query(done.as_deref());
            let sort = TaskSort::from_query(Some(sort.as_str()));
            let tasks = store.list(filter, sort)?;

            if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in &tasks {
                    let mark = if task.done { "x" } else { " " };
                    let due = match task.due_date {
                        Some(d) => format!(", due {}", d.format("%b %d, %Y")),
                        None => String::new(),
                    };
                    println!(
                        "[{}] {} — {} priority, {}{}  ({})",
                        mark, task.name, task.priority, task.category, due, task.id
                    );
                }
            }
        }

        Commands::Done { name } => {
            let store = TaskStore::open(&db_dir)?;
            let task = store.set_done_by_name(&name)?;
            println!("Marked {} as done", task.name);
        }

        Commands::Rm { name } => {
            let store = TaskStore::open(&db_dir)?;
            let task = store.remove_by_name(&name)?;
            println!("Deleted {}", task.name);
        }

        Commands::Toggle { id } => {
            let store = TaskStore::open(&db_dir)?;
            let task = store.toggle(id)?;
            if task.done {
                println!("Marked {} as done", task.name);
            } else {
                println!("Marked {} as undone", task.name);
            }
        }

        Commands::Clear { completed } => {
            let store = TaskStore::open(&db_dir)?;
            let removed = if completed {
                store.clear_completed()?
            } else {
                store.clear_all()?
            };
            println!("Cleared {removed} task(s)");
        }
    }

    Ok(())
}
