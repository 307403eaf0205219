//! Progress recalculation.
//!
//! Progress is derived purely from checklist markers (`- [x]` done, `- [ ]`
//! pending). Recomputing from the same markers always produces the same
//! text, so rewriting a document twice is a no-op the second time.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Width of the progress bar in glyphs.
pub const BAR_WIDTH: usize = 20;

/// Filled bar glyph.
pub const FILLED: char = '█';

/// Empty bar glyph.
pub const EMPTY: char = '░';

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"- \[([x ])\]").expect("valid marker pattern"));
static SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Completed\*\*: \d+/\d+ tasks \(\d+%\)").expect("valid summary pattern")
});
static BAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[█░]*\] \d+%").expect("valid bar pattern"));

/// Completed and total marker counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
}

impl ProgressState {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// Count the checklist markers in `text`.
    pub fn from_markers(text: &str) -> Self {
        let mut state = Self::default();
        for caps in MARKER.captures_iter(text) {
            state.total += 1;
            if &caps[1] == "x" {
                state.completed += 1;
            }
        }
        state
    }

    /// Completion percentage, rounded half up. Zero when there are no tasks.
    pub fn percentage(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (200 * self.completed + self.total) / (2 * self.total)
    }

    /// Number of filled glyphs in the bar.
    ///
    /// Only whole twentieths are drawn, so the bar never shows more progress
    /// than has been made. One task in three draws six glyphs, not seven.
    pub fn filled(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (BAR_WIDTH * self.completed.min(self.total)) / self.total
    }

    /// The glyph bar without brackets.
    pub fn bar(&self) -> String {
        let filled = self.filled();
        let mut bar = String::with_capacity(BAR_WIDTH * FILLED.len_utf8());
        bar.extend(std::iter::repeat(FILLED).take(filled));
        bar.extend(std::iter::repeat(EMPTY).take(BAR_WIDTH - filled));
        bar
    }

    /// `**Completed**: c/t tasks (p%)`
    pub fn summary_line(&self) -> String {
        format!("**Completed**: {}/{} tasks ({}%)", self.completed, self.total, self.percentage())
    }

    /// `[bar] p%`
    pub fn bar_line(&self) -> String {
        format!("[{}] {}%", self.bar(), self.percentage())
    }

    /// Rewrite the summary and bar anchors in `text`.
    ///
    /// Only the first occurrence of each anchor is replaced; a missing anchor
    /// is left alone.
    pub fn apply(&self, text: &str) -> String {
        let summary = self.summary_line();
        let bar = self.bar_line();
        let text = SUMMARY.replace(text, regex::NoExpand(&summary));
        BAR.replace(&text, regex::NoExpand(&bar)).into_owned()
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.completed, self.total, self.percentage())
    }
}

/// Pending task-list entry for `number`: `- [ ] **[NNN]`.
pub fn pending_entry(number: &str) -> String {
    format!("- [ ] **[{number}]")
}

/// Pending dependency-block entry for `number`: `- [ ] [NNN](`.
pub fn pending_link(number: &str) -> String {
    format!("- [ ] [{number}](")
}

/// Check off every pending marker of task `number` in `text`.
///
/// Returns `None` when there is no pending task-list entry for the task.
pub fn mark_complete(text: &str, number: &str) -> Option<String> {
    let pending = pending_entry(number);
    if !text.contains(&pending) {
        return None;
    }

    let updated = text.replace(&pending, &format!("- [x] **[{number}]"));
    Some(mark_link_complete(&updated, number))
}

/// Check off the dependency-block entry of task `number`, if any.
pub fn mark_link_complete(text: &str, number: &str) -> String {
    text.replace(&pending_link(number), &format!("- [x] [{number}]("))
}
