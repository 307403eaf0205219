//! Embedded document templates.
//!
//! Templates are compiled into the binary and rendered by substituting
//! `{{KEY}}` placeholders. Placeholders without a value are left as-is.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder pattern"));

/// The documents this server knows how to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// `WORKFLOW.md` guide
    Workflow,
    /// `docs/cycles.md` tracker
    Cycles,
    /// Per-cycle `README.md`
    CycleReadme,
    /// Task document
    Task,
    /// Pull request body
    PullRequest,
}

impl TemplateKind {
    pub const ALL: [Self; 5] =
        [Self::Workflow, Self::Cycles, Self::CycleReadme, Self::Task, Self::PullRequest];

    /// Raw template text.
    pub fn source(self) -> &'static str {
        match self {
            Self::Workflow => include_str!("templates/workflow.md"),
            Self::Cycles => include_str!("templates/cycles.md"),
            Self::CycleReadme => include_str!("templates/cycle-readme.md"),
            Self::Task => include_str!("templates/task.md"),
            Self::PullRequest => include_str!("templates/pr.md"),
        }
    }

    /// Short identifier, also the resource URI suffix.
    pub fn id(self) -> &'static str {
        match self {
            Self::Workflow => "workflow",
            Self::Cycles => "cycles",
            Self::CycleReadme => "cycle-readme",
            Self::Task => "task",
            Self::PullRequest => "pr",
        }
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Workflow => "Workflow Guide",
            Self::Cycles => "Cycles Tracker",
            Self::CycleReadme => "Cycle README",
            Self::Task => "Task Document",
            Self::PullRequest => "Pull Request Template",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Render this template with `vars`.
    pub fn render(self, vars: &TemplateVars) -> String {
        render(self.source(), vars)
    }
}

/// Placeholder values keyed by name.
pub type TemplateVars = HashMap<&'static str, String>;

/// Substitute every `{{KEY}}` in `template` that has a value in `vars`.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            vars.get(&caps[1]).cloned().unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Today's date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_every_occurrence() {
        let vars = TemplateVars::from([("NAME", "Auth".to_string())]);
        assert_eq!(render("{{NAME}} and {{NAME}}", &vars), "Auth and Auth");
    }

    #[test]
    fn test_unknown_placeholders_left_verbatim() {
        let vars = TemplateVars::from([("KNOWN", "x".to_string())]);
        assert_eq!(render("{{KNOWN}} {{UNKNOWN}} { {{ }}", &vars), "x {{UNKNOWN}} { {{ }}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = TemplateVars::from([("A", "{{B}}".to_string()), ("B", "b".to_string())]);
        assert_eq!(render("{{A}}", &vars), "{{B}}");
    }

    #[test]
    fn test_embedded_templates() {
        for kind in TemplateKind::ALL {
            assert!(!kind.source().is_empty());
            assert_eq!(TemplateKind::from_id(kind.id()), Some(kind));
        }

        let readme = TemplateKind::CycleReadme.source();
        let deps = readme.find("## Task Dependencies").unwrap();
        assert!(readme.find("## Tasks (").unwrap() < deps);
        assert!(deps < readme.find("## Progress Tracker").unwrap());

        assert!(TemplateKind::Task.source().contains("**Must complete first:** {{DEPENDENCIES}}"));
        assert_eq!(TemplateKind::from_id("missing"), None);
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
    }
}
