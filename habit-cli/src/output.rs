use habit_core::stats::{HabitStats, HeatmapDay};
use habit_core::{time_utils, Habit, ViewState};
use std::fmt::Write;

const HEAT_LEVELS: [char; 5] = ['·', '░', '▒', '▓', '█'];

pub fn render_habit_list(view: &ViewState, habits: &[&Habit]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} · {} · filter: {}",
        view.week_label(),
        time_utils::format_date(view.selected_day),
        view.filter
    );

    if habits.is_empty() {
        out.push_str("No habits yet. Add one with `habits add <name>`.\n");
        return out;
    }

    for habit in habits {
        let mark = if habit.is_completed_on(view.selected_day) {
            "[x]"
        } else {
            "[ ]"
        };
        let icon = habit
            .icon
            .as_deref()
            .map(|icon| format!("{} ", icon))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{} #{:<4} {}{}  (Streak: {})",
            mark, habit.id, icon, habit.name, habit.streak_count
        );
    }
    out
}

pub fn render_heatmap(days: &[HeatmapDay]) -> String {
    let mut out = String::new();
    for week in days.chunks(7) {
        let Some(first) = week.first() else {
            continue;
        };
        let cells: String = week
            .iter()
            .map(|day| HEAT_LEVELS[day.level() as usize])
            .collect();
        let done: usize = week.iter().map(|day| day.completed).sum();
        let _ = writeln!(
            out,
            "{}  {}  {} done",
            time_utils::format_date(first.date),
            cells,
            done
        );
    }
    out
}

pub fn render_stats(stats: &HabitStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Habits:          {}", stats.total_habits);
    match &stats.longest_streak {
        Some((name, streak)) => {
            let _ = writeln!(out, "Longest streak:  {} ({} days)", name, streak);
        }
        None => out.push_str("Longest streak:  -\n"),
    }
    let _ = writeln!(
        out,
        "This week:       {}/{} ({:.0}%)",
        stats.completions_this_week,
        stats.possible_this_week,
        stats.completion_rate * 100.0
    );
    out
}
