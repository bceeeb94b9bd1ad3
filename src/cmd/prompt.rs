use std::io::{self, Write};

use crate::error::AppResult;

pub enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

/// Asks for one value on stdin. Enter keeps the current value, `-` clears it.
pub fn prompt(field: &str, current: Option<&str>) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match current.filter(|value| !value.is_empty()) {
        Some(value) => write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(parse_answer(&input))
}

fn parse_answer(input: &str) -> PromptAction {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        PromptAction::Keep
    } else if trimmed == "-" {
        PromptAction::Clear
    } else {
        PromptAction::Set(trimmed.to_string())
    }
}
