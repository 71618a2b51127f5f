use colored::Colorize;
use std::fmt::Write;

use super::stats::{GameResult, Stats};
use super::ui::{format_date, result_label};

/// Text report of the stats for the `stats` subcommand.
pub fn stats_report(stats: &Stats, bar_cells: u32) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Statistics".bold());
    let _ = writeln!(
        out,
        "Played {}  Win % {}  Current streak {}  Max streak {}",
        stats.games_played,
        stats.win_percentage(),
        stats.current_streak,
        stats.max_streak
    );

    let _ = writeln!(out, "\n{}", "Guess distribution".bold());
    for row in stats.distribution_rows() {
        let cells = (row.width * bar_cells / 100).max(1) as usize;
        let bar = format!("{:>w$}", row.count, w = cells);
        let bar = if row.count > 0 {
            bar.on_green().bold()
        } else {
            bar.on_bright_black()
        };
        let _ = writeln!(out, "{} {}", row.guesses, bar);
    }

    let _ = writeln!(out, "\n{}", "History".bold());
    if stats.history.is_empty() {
        let _ = writeln!(out, "No games played yet");
    }
    for entry in stats.recent_history() {
        let result = match entry.result {
            GameResult::Won => result_label(entry.result).green(),
            GameResult::Lost => result_label(entry.result).red(),
        };
        let _ = writeln!(
            out,
            "{:<12}{:<9}{:<6}{}",
            format_date(entry.timestamp),
            entry.word,
            result,
            entry.attempts
        );
    }
    out
}
