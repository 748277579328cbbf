//! Read-only projections behind the heatmap and stats screens.

use serde::Serialize;
use time::Date;

use crate::Habit;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapDay {
    #[serde(with = "crate::time_utils::iso_date")]
    pub date: Date,
    pub completed: usize,
    pub total: usize,
}

impl HeatmapDay {
    /// 0..=4 intensity bucket, 0 meaning nothing done.
    pub fn level(&self) -> u8 {
        if self.total == 0 || self.completed == 0 {
            return 0;
        }
        let ratio = self.completed as f64 / self.total as f64;
        match ratio {
            r if r >= 1.0 => 4,
            r if r >= 0.66 => 3,
            r if r >= 0.33 => 2,
            _ => 1,
        }
    }
}

/// One entry per day in `from..=to`; empty when the range is inverted.
pub fn heatmap(habits: &[Habit], from: Date, to: Date) -> Vec<HeatmapDay> {
    let mut days = Vec::new();
    let mut cursor = Some(from);

    while let Some(date) = cursor.filter(|date| *date <= to) {
        days.push(HeatmapDay {
            date,
            completed: habits.iter().filter(|h| h.is_completed_on(date)).count(),
            total: habits.len(),
        });
        cursor = date.next_day();
    }

    days
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub total_habits: usize,
    /// Name and streak of the habit with the longest streak, first one wins ties.
    pub longest_streak: Option<(String, u32)>,
    pub completions_this_week: usize,
    pub possible_this_week: usize,
    pub completion_rate: f64,
}

pub fn summarize(habits: &[Habit], week: &[Date]) -> HabitStats {
    let longest_streak = habits
        .iter()
        .filter(|h| h.streak_count > 0)
        .fold(None::<&Habit>, |best, h| match best {
            Some(b) if b.streak_count >= h.streak_count => Some(b),
            _ => Some(h),
        })
        .map(|h| (h.name.clone(), h.streak_count));

    let completions_this_week = habits
        .iter()
        .map(|h| week.iter().filter(|day| h.is_completed_on(**day)).count())
        .sum();
    let possible_this_week = habits.len() * week.len();
    let completion_rate = if possible_this_week == 0 {
        0.0
    } else {
        completions_this_week as f64 / possible_this_week as f64
    };

    HabitStats {
        total_habits: habits.len(),
        longest_streak,
        completions_this_week,
        possible_this_week,
        completion_rate,
    }
}
