//! Sequential numbering for cycles and tasks.
//!
//! Cycle directories are named `NN-slug` and task documents `NNN-slug.md`.
//! The next number is one past the highest number already in use, so gaps
//! left by deleted entries are never refilled.

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits in a cycle number.
pub const CYCLE_WIDTH: usize = 2;

/// Digits in a task number.
pub const TASK_WIDTH: usize = 3;

static CYCLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})-").expect("valid cycle name pattern"));
static TASK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{3})-.*\.md$").expect("valid task name pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid pattern"));

/// Next cycle number given the entries of `docs/cycles/`.
pub fn next_cycle_number<S: AsRef<str>>(names: &[S]) -> String {
    next_number(names, &CYCLE_NAME, CYCLE_WIDTH)
}

/// Next task number given the entries of a cycle directory.
pub fn next_task_number<S: AsRef<str>>(names: &[S]) -> String {
    next_number(names, &TASK_NAME, TASK_WIDTH)
}

/// Whether `name` looks like a task document (`NNN-anything.md`).
pub fn is_task_file(name: &str) -> bool {
    TASK_NAME.is_match(name)
}

/// Whether `name` is the directory of cycle `cycle_number`.
pub fn is_cycle_dir(name: &str, cycle_number: &str) -> bool {
    CYCLE_NAME.captures(name).is_some_and(|c| &c[1] == cycle_number)
}

fn next_number<S: AsRef<str>>(names: &[S], pattern: &Regex, width: usize) -> String {
    let max = names
        .iter()
        .filter_map(|name| pattern.captures(name.as_ref()))
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("{:0width$}", max + 1)
}

/// Normalize a number argument to `width` digits ("1" -> "01").
pub fn pad_number(number: &str, width: usize) -> String {
    let trimmed = number.trim();
    match trimmed.parse::<u32>() {
        Ok(n) => format!("{n:0width$}"),
        Err(_) => trimmed.to_string(),
    }
}

/// Turn a name into a file-name slug.
///
/// Lowercases, replaces runs of whitespace with `-` and drops every character
/// outside `[a-z0-9-]`.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    WHITESPACE
        .replace_all(&lowered, "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}
