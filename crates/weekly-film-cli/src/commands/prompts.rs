use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Prompt for a secret (hidden input); empty input is allowed so callers can keep an existing value
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| eyre!("Failed to read password: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Parse a positive whole number of seconds; blank input selects `default`.
fn parse_seconds(input: &str, default: u64) -> Option<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(default);
    }
    trimmed.parse::<u64>().ok().filter(|value| *value >= 1)
}

/// Prompt until a number of seconds (>= 1) is entered
pub fn prompt_seconds(prompt: &str, default: u64, output: &Output) -> Result<u64> {
    loop {
        let input = Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
            .map_err(|e| eyre!("Failed to read input: {}", e))?;

        match parse_seconds(&input, default) {
            Some(value) => return Ok(value),
            None => output.error("Invalid input. Please enter a whole number of seconds (at least 1)."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("", 60), Some(60));
        assert_eq!(parse_seconds("  30 ", 60), Some(30));
        assert_eq!(parse_seconds("0", 60), None);
        assert_eq!(parse_seconds("-5", 60), None);
        assert_eq!(parse_seconds("abc", 60), None);
    }
}
