use anyhow::{Context, Result};
use std::{fs, path::Path};

pub fn read_input(path: &str) -> Result<String> {
    let path = Path::new(path);
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Non-blank lines of puzzle input. `str::lines` already strips a trailing
/// `\r`, so CRLF input works as-is.
pub fn input_lines(input: &str) -> impl Iterator<Item = &str> {
    input.lines().filter(|line| !line.trim().is_empty())
}
