//! Rendering of evaluation results into user-facing reply text.
//!
//! The marker characters of the lightweight emphasis convention live in
//! [`MarkupStyle`]; the renderer itself only decides *what* is a label,
//! a payload value, or a code sample.

use crate::pattern::EvaluationResult;

/// Marker characters for the lightweight emphasis convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupStyle {
    /// `_label_`, `*value*`, `` `code` ``.
    #[default]
    Markdown,
    /// No markers at all.
    Plain,
}

impl MarkupStyle {
    fn emphasize(&self, text: &str) -> String {
        match self {
            MarkupStyle::Markdown => format!("_{}_", text),
            MarkupStyle::Plain => text.to_string(),
        }
    }

    fn strong(&self, text: &str) -> String {
        match self {
            MarkupStyle::Markdown => format!("*{}*", text),
            MarkupStyle::Plain => text.to_string(),
        }
    }

    fn code(&self, text: &str) -> String {
        match self {
            MarkupStyle::Markdown => format!("`{}`", text),
            MarkupStyle::Plain => text.to_string(),
        }
    }
}

pub struct ResponseFormatter {
    style: MarkupStyle,
}

impl ResponseFormatter {
    pub fn new(style: MarkupStyle) -> Self {
        Self { style }
    }

    /// Renders an evaluation result as a reply. An invalid pattern gets a
    /// short notice followed by the usage examples.
    pub fn render(&self, result: &EvaluationResult) -> String {
        match result {
            EvaluationResult::Range { min, max, value } => format!(
                "{}\n{}",
                self.style
                    .emphasize(&format!("Random number between {} and {}:", min, max)),
                self.style.strong(&value.to_string()),
            ),
            EvaluationResult::Choice { value } => format!(
                "{}\n{}",
                self.style.emphasize("Random item:"),
                self.style.strong(value),
            ),
            EvaluationResult::Invalid => format!("Invalid pattern\n{}", self.usage()),
        }
    }

    /// The fixed usage block shown for `/help`, `/start` and after an
    /// invalid pattern.
    pub fn usage(&self) -> String {
        format!(
            "Usage examples:\n/random {} or {}",
            self.style.code("1-10"),
            self.style.code("apple|pear|lemon"),
        )
    }

    /// Prompt sent when `/random` arrives without a pattern.
    pub fn prompt(&self) -> &'static str {
        "Enter the pattern:"
    }
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(MarkupStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_range() {
        let formatter = ResponseFormatter::default();
        let rendered = formatter.render(&EvaluationResult::Range {
            min: 1,
            max: 10,
            value: 7,
        });
        assert_eq!(rendered, "_Random number between 1 and 10:_\n*7*");
    }

    #[test]
    fn test_render_choice() {
        let formatter = ResponseFormatter::default();
        let rendered = formatter.render(&EvaluationResult::Choice {
            value: "pear".to_string(),
        });
        assert_eq!(rendered, "_Random item:_\n*pear*");
    }

    #[test]
    fn test_render_invalid_includes_usage() {
        let formatter = ResponseFormatter::default();
        let rendered = formatter.render(&EvaluationResult::Invalid);
        assert!(rendered.starts_with("Invalid pattern\n"));
        assert!(rendered.contains("Usage examples:"));
        assert!(rendered.contains("`1-10`"));
        assert!(rendered.contains("`apple|pear|lemon`"));
    }

    #[test]
    fn test_plain_style_has_no_markers() {
        let formatter = ResponseFormatter::new(MarkupStyle::Plain);
        let rendered = formatter.render(&EvaluationResult::Range {
            min: 0,
            max: 2,
            value: 1,
        });
        assert_eq!(rendered, "Random number between 0 and 2:\n1");
        assert_eq!(
            formatter.usage(),
            "Usage examples:\n/random 1-10 or apple|pear|lemon"
        );
    }
}
