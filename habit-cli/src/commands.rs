use anyhow::{bail, Context, Result};
use habit_core::api::{DevBackend, HabitApi, HttpHabitApi};
use habit_core::session::{
    NavigationDecision, Route, SessionGate, SessionProvider, StaticSession, StoredSession,
};
use habit_core::storage::{FileStore, KeyValueStore, SELECTED_DAY_KEY, USER_ID_KEY};
use habit_core::{stats, time_utils, HabitController, ViewState};
use std::path::Path;
use time::{Date, Duration};

use crate::cli::{Cli, Commands, DayStep, WeekStep};
use crate::config::HabitConfig;
use crate::output;

pub async fn run(cli: Cli) -> Result<()> {
    if let Commands::ConfigPath = cli.command {
        return print_config_path();
    }

    let config = HabitConfig::load()?;
    let store = open_store(cli.data_dir.as_deref())?;
    let gate = SessionGate::new(&config.login_path);
    let today = time_utils::local_today();

    if cli.dev {
        check_route(&gate, &cli.command, &StaticSession(true))?;
        execute(cli.command, DevBackend::new(today), &store, today).await
    } else {
        check_route(&gate, &cli.command, &StoredSession::new(store.clone()))?;
        let api = HttpHabitApi::new(&config.api_url)
            .with_context(|| format!("Invalid api_url in config: {}", config.api_url))?;
        execute(cli.command, api, &store, today).await
    }
}

fn open_store(data_dir: Option<&Path>) -> Result<FileStore> {
    match data_dir {
        Some(dir) => Ok(FileStore::new(dir)),
        None => Ok(FileStore::new(
            FileStore::default_root().context("Cannot determine config directory")?,
        )),
    }
}

fn print_config_path() -> Result<()> {
    let path = HabitConfig::config_path()?;
    if !path.exists() {
        HabitConfig::default().save_to(&path)?;
    }
    println!("{}", path.display());
    Ok(())
}

/// Run the command's route through the gate before anything touches the API.
fn check_route(
    gate: &SessionGate,
    command: &Commands,
    session: &dyn SessionProvider,
) -> Result<()> {
    let Some(route) = command.route() else {
        return Ok(());
    };

    // the login command follows a configured login path
    let path = match route {
        Route::Login => gate.login_path(),
        other => other.path(),
    };

    match gate.decide(path, session) {
        NavigationDecision::Allow => Ok(()),
        NavigationDecision::Redirect(target) => {
            tracing::info!("{} requires a session, redirected to {}", path, target);
            bail!("Not logged in. Run `habits login <user-id>` first.")
        }
    }
}

pub async fn execute<A: HabitApi, S: KeyValueStore>(
    command: Commands,
    api: A,
    store: &S,
    today: Date,
) -> Result<()> {
    let view = ViewState::restore(store.get(SELECTED_DAY_KEY).as_deref(), today);
    let mut controller = HabitController::new(api, view);

    match command {
        Commands::Login { user_id } => {
            let user_id = user_id.trim();
            if user_id.is_empty() {
                bail!("User id must not be empty");
            }
            store
                .set(USER_ID_KEY, user_id)
                .context("Failed to save session")?;
            println!("Logged in as {}.", user_id);
            return Ok(());
        }
        Commands::Logout => {
            store.remove(USER_ID_KEY).context("Failed to remove session")?;
            println!("Logged out.");
            return Ok(());
        }
        Commands::ConfigPath => return print_config_path(),
        Commands::List { filter } => {
            controller.view_mut().set_filter(filter.into());
            controller.load().await;
        }
        Commands::Add { name, icon } => {
            controller.load().await;
            controller.view_mut().set_new_habit_input(&name);
            let id = controller.create_with_icon(icon.as_deref()).await?;
            println!("Added habit #{}.", id);
        }
        Commands::Rename { id, name } => {
            controller.load().await;
            controller.start_edit(id)?;
            controller.set_edit_name(&name)?;
            controller.save_edit().await?;
            println!("Renamed habit #{}.", id);
        }
        Commands::Delete { id } => {
            controller.load().await;
            controller.delete(id).await?;
            println!("Deleted habit #{}.", id);
            return Ok(());
        }
        Commands::Toggle { id } => {
            controller.load().await;
            controller.toggle_completion(id).await?;
        }
        Commands::Day { step } => {
            let view = controller.view_mut();
            match step {
                DayStep::Next => view.next_day(),
                DayStep::Prev => view.previous_day(),
                DayStep::Today => view.go_to_today(),
            }
            save_selected_day(store, controller.view());
            controller.load().await;
        }
        Commands::Week { step } => {
            let view = controller.view_mut();
            match step {
                WeekStep::Next => view.next_week(),
                WeekStep::Prev => view.previous_week(),
            }
            save_selected_day(store, controller.view());
            controller.load().await;
        }
        Commands::Heatmap { days } => {
            controller.load().await;
            report_load_error(controller.view());
            let to = controller.view().selected_day;
            let span = i64::from(days.max(1)) - 1;
            let from = to.checked_sub(Duration::days(span)).unwrap_or(Date::MIN);
            let days = stats::heatmap(controller.habits(), from, to);
            print!("{}", output::render_heatmap(&days));
            return Ok(());
        }
        Commands::Stats => {
            controller.load().await;
            report_load_error(controller.view());
            let summary = stats::summarize(controller.habits(), &controller.view().week_days());
            print!("{}", output::render_stats(&summary));
            return Ok(());
        }
    }

    report_load_error(controller.view());
    print!(
        "{}",
        output::render_habit_list(controller.view(), &controller.visible_habits())
    );
    Ok(())
}

fn save_selected_day<S: KeyValueStore>(store: &S, view: &ViewState) {
    if let Err(e) = store.set(SELECTED_DAY_KEY, &view.selected_day_value()) {
        tracing::warn!("Failed to save selected day: {}", e);
    }
}

fn report_load_error(view: &ViewState) {
    if let Some(error) = &view.last_error {
        eprintln!("Warning: {}", error);
    }
}
