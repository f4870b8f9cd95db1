use crate::config::DEFAULT_ADDR;
use crate::db::DEFAULT_DB_PATH;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Study task tracker")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Path to the store file
    #[arg(long, global = true, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Task fields shared by `add` and `edit`
#[derive(Args, Debug, Clone)]
pub struct TaskArgs {
    /// Subject the task belongs to
    #[arg(long)]
    pub subject: Option<String>,
    /// Status text, e.g. "Not Started", "In Progress", "Completed"
    #[arg(long)]
    pub status: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Priority text, e.g. High, Medium, Low
    #[arg(long)]
    pub priority: Option<String>,
    /// Estimated hours needed
    #[arg(long)]
    pub hours: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the store and its default settings
    Init,

    /// Run the web server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },

    /// Add a new task
    Add {
        /// Task title
        title: String,
        #[command(flatten)]
        fields: TaskArgs,
    },

    /// Replace every field of a task (omitted fields are cleared)
    Edit {
        /// Task ID
        id: i64,
        /// New title
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: TaskArgs,
    },

    /// Show one task
    Show {
        /// Task ID
        id: i64,
    },

    /// Tasks due today
    Today,

    /// All tasks
    List,

    /// Unfinished tasks with the study window
    Schedule,

    /// Delete a task
    Rm {
        /// Task ID
        id: i64,
    },

    /// Show settings, or overwrite them when any flag is given
    Settings {
        /// Study start time (HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// Study end time (HH:MM)
        #[arg(long)]
        end: Option<String>,
        /// Days to keep free, e.g. "Saturday,Sunday"
        #[arg(long)]
        excluded: Option<String>,
    },
}
