//! Output formatting utilities for the CLI.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use console::{style, StyledObject};
use serde::Serialize;

use crate::domain::models::RunState;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Borderless table with upper-case headers.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

pub fn colorize_state(state: RunState) -> StyledObject<&'static str> {
    let name = state.as_str();
    match state {
        RunState::TerminalSuccess => style(name).green().bold(),
        RunState::Running => style(name).yellow(),
        RunState::TerminalHopLimit | RunState::TerminalTimeout => style(name).yellow().bold(),
        RunState::TerminalCancelled => style(name).dim(),
        RunState::TerminalError => style(name).red().bold(),
    }
}

pub fn colorize_verdict(passed: bool) -> StyledObject<&'static str> {
    if passed {
        style("passed").green().bold()
    } else {
        style("failed").red().bold()
    }
}
