//! Terminal colorization for simulation verdicts
//!
//! Applies ANSI escape codes using crossterm.

use crossterm::style::{Color, Stylize};

pub const ACCEPTED: &str = "ACCEPTED";
pub const REJECTED: &str = "REJECTED";

/// The verdict word, green and bold when accepted, red otherwise
pub fn paint_verdict(accepted: bool, colorize: bool) -> String {
    let text = if accepted { ACCEPTED } else { REJECTED };
    if !colorize {
        return text.to_string();
    }
    if accepted {
        format!("{}", text.with(Color::Green).bold())
    } else {
        format!("{}", text.with(Color::Red).bold())
    }
}

/// Dim secondary detail such as the state a run ended in
pub fn paint_detail(detail: &str, colorize: bool) -> String {
    if colorize {
        format!("{}", detail.with(Color::DarkGrey))
    } else {
        detail.to_string()
    }
}
