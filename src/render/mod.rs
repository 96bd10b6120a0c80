//! Result panel rendering.
//!
//! [`ResultPanel`] is the UI surface of one analysis: a URL label, a loading
//! indicator, an error region, and four named list regions (one per
//! category). The renderer never fails: a malformed detection payload is
//! replaced with the all-placeholder result before rendering, and non-string
//! entries are coerced to their string form on the way in.

use std::io::{self, Write};

use colored::Colorize;

use crate::config::NONE_DETECTED_PLACEHOLDER;
use crate::detection::{Category, DetectionResult};

fn region_index(category: Category) -> usize {
    match category {
        Category::Frontend => 0,
        Category::Backend => 1,
        Category::Analytics => 2,
        Category::Cms => 3,
    }
}

/// The popup surface: four list regions plus loading/error state.
#[derive(Debug, Default)]
pub struct ResultPanel {
    url_label: Option<String>,
    loading: bool,
    error: Option<String>,
    results_visible: bool,
    regions: [Vec<String>; 4],
}

impl ResultPanel {
    /// Creates an empty, hidden panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the "Analyzing: …" label.
    pub fn set_url_label(&mut self, url: &str) {
        self.url_label = Some(url.to_string());
    }

    /// Shows or hides the loading indicator.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// True while the loading indicator is shown.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once results have been rendered (and no error has replaced them).
    pub fn is_results_visible(&self) -> bool {
        self.results_visible
    }

    /// The error region's current text, if shown.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rendered rows of one region.
    pub fn rows(&self, category: Category) -> &[String] {
        &self.regions[region_index(category)]
    }

    /// Renders a well-formed detection result into the four regions.
    ///
    /// Each region is cleared, then repopulated: one placeholder row for an
    /// empty sequence, otherwise one row per name in sequence order.
    pub fn render_result(&mut self, result: &DetectionResult) {
        for category in Category::ALL {
            let region = &mut self.regions[region_index(category)];
            region.clear();

            let names = result.category(category);
            if names.is_empty() {
                region.push(NONE_DETECTED_PLACEHOLDER.to_string());
            } else {
                region.extend(names.iter().cloned());
            }
        }
        self.error = None;
        self.results_visible = true;
    }

    /// Renders an untrusted detection payload.
    ///
    /// The value goes through shape validation and coercion first; a payload
    /// that is not a detection result at all renders as the all-placeholder
    /// result. This entry point never fails.
    pub fn render_value(&mut self, value: &serde_json::Value) {
        let result = DetectionResult::from_value(value);
        self.render_result(&result);
    }

    /// Shows plain-text `message` in the error region and hides the results.
    pub fn show_error(&mut self, message: &str) {
        let message = if message.is_empty() {
            "An unknown error occurred"
        } else {
            message
        };
        self.error = Some(message.to_string());
        self.results_visible = false;
    }

    /// Writes the panel to `writer`.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        if let Some(url) = &self.url_label {
            writeln!(writer, "{} {}", "Analyzing:".bold(), url)?;
        }
        if self.loading {
            writeln!(writer, "{}", "Analyzing website technologies...".dimmed())?;
        }
        if let Some(error) = &self.error {
            writeln!(writer, "{} {}", "Error:".red().bold(), error)?;
        }
        if self.results_visible {
            for category in Category::ALL {
                writeln!(writer)?;
                writeln!(writer, "{}", category.heading().cyan().bold())?;
                for row in self.rows(category) {
                    if row == NONE_DETECTED_PLACEHOLDER {
                        writeln!(writer, "  {}", row.dimmed())?;
                    } else {
                        writeln!(writer, "  {}", row)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_sequence_renders_exactly_one_placeholder_row() {
        let mut panel = ResultPanel::new();
        panel.render_result(&DetectionResult::new());

        for category in Category::ALL {
            assert_eq!(panel.rows(category), [NONE_DETECTED_PLACEHOLDER.to_string()]);
        }
    }

    #[test]
    fn test_n_names_render_as_n_rows_in_order() {
        let mut result = DetectionResult::new();
        for name in ["React", "jQuery", "Bootstrap"] {
            result.push_unique(Category::Frontend, name);
        }

        let mut panel = ResultPanel::new();
        panel.render_result(&result);

        assert_eq!(
            panel.rows(Category::Frontend),
            ["React", "jQuery", "Bootstrap"]
        );
        assert_eq!(panel.rows(Category::Backend), [NONE_DETECTED_PLACEHOLDER.to_string()]);
    }

    #[test]
    fn test_rerender_clears_previous_rows() {
        let mut first = DetectionResult::new();
        first.push_unique(Category::Cms, "Drupal");

        let mut panel = ResultPanel::new();
        panel.render_result(&first);
        assert_eq!(panel.rows(Category::Cms), ["Drupal"]);

        panel.render_result(&DetectionResult::new());
        assert_eq!(panel.rows(Category::Cms), [NONE_DETECTED_PLACEHOLDER.to_string()]);
    }

    #[test]
    fn test_malformed_payload_renders_all_placeholder_result() {
        let mut panel = ResultPanel::new();
        panel.render_value(&json!("definitely not a detection result"));

        assert_eq!(panel.rows(Category::Frontend), ["No data available"]);
        assert_eq!(panel.rows(Category::Backend), [NONE_DETECTED_PLACEHOLDER.to_string()]);
        assert!(panel.is_results_visible());
    }

    #[test]
    fn test_non_string_entries_are_coerced() {
        let mut panel = ResultPanel::new();
        panel.render_value(&json!({
            "frontend": ["React", 7],
            "backend": [],
            "analytics": [],
            "cms": []
        }));

        assert_eq!(panel.rows(Category::Frontend), ["React", "7"]);
    }

    #[test]
    fn test_error_hides_results() {
        let mut result = DetectionResult::new();
        result.push_unique(Category::Frontend, "React");

        let mut panel = ResultPanel::new();
        panel.render_result(&result);
        assert!(panel.is_results_visible());

        panel.show_error("something broke");
        assert!(!panel.is_results_visible());
        assert_eq!(panel.error(), Some("something broke"));
    }

    #[test]
    fn test_empty_error_message_gets_a_default() {
        let mut panel = ResultPanel::new();
        panel.show_error("");
        assert_eq!(panel.error(), Some("An unknown error occurred"));
    }

    #[test]
    fn test_write_to_produces_rows() {
        colored::control::set_override(false);
        let mut result = DetectionResult::new();
        result.push_unique(Category::Analytics, "Hotjar");

        let mut panel = ResultPanel::new();
        panel.set_url_label("https://example.com");
        panel.render_result(&result);

        let mut out = Vec::new();
        panel.write_to(&mut out).expect("Write should succeed");
        let text = String::from_utf8(out).expect("Output should be UTF-8");

        assert!(text.contains("Analyzing: https://example.com"));
        assert!(text.contains("Hotjar"));
        assert!(text.contains(NONE_DETECTED_PLACEHOLDER));
    }
}
