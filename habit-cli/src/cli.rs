use clap::{Parser, Subcommand, ValueEnum};
use habit_core::{session::Route, FilterMode, HabitId};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "habits")]
#[command(about = "Track daily habits against a habit API")]
pub struct Cli {
    /// Use local in-memory data instead of the API
    #[arg(long, global = true)]
    pub dev: bool,

    /// Directory for session and cursor state (defaults to the config directory)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store a user id as the current session
    Login { user_id: String },
    /// Remove the local session
    Logout,
    /// Show habits for the selected day
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Create a habit
    Add {
        name: String,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Rename a habit
    Rename { id: HabitId, name: String },
    /// Delete a habit
    Delete { id: HabitId },
    /// Mark or unmark a habit as done on the selected day
    Toggle { id: HabitId },
    /// Move the selected day
    Day {
        #[arg(value_enum)]
        step: DayStep,
    },
    /// Move the selected day by a week
    Week {
        #[arg(value_enum)]
        step: WeekStep,
    },
    /// Completion heatmap ending at the selected day
    Heatmap {
        #[arg(long, default_value_t = 28)]
        days: u16,
    },
    /// Streak and weekly completion summary
    Stats,
    /// Print config path and create default file if missing
    ConfigPath,
}

impl Commands {
    /// Route a command navigates to. `None` for local housekeeping.
    pub fn route(&self) -> Option<Route> {
        match self {
            Commands::Login { .. } => Some(Route::Login),
            Commands::List { .. }
            | Commands::Add { .. }
            | Commands::Rename { .. }
            | Commands::Delete { .. }
            | Commands::Toggle { .. }
            | Commands::Day { .. }
            | Commands::Week { .. } => Some(Route::Habits),
            Commands::Heatmap { .. } => Some(Route::Heatmap),
            Commands::Stats => Some(Route::Stats),
            Commands::Logout | Commands::ConfigPath => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Open,
    Done,
}

impl From<FilterArg> for FilterMode {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => FilterMode::All,
            FilterArg::Open => FilterMode::Open,
            FilterArg::Done => FilterMode::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DayStep {
    Next,
    Prev,
    Today,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeekStep {
    Next,
    Prev,
}
