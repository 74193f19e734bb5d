//! Record formatting
//!
//! Renders a framed record into display lines:
//!
//! ```text
//! api                  | starting server on :8080
//! api                  | listening
//! worker-with-a-very-… | job queued
//! ```
//!
//! The identity label is truncated/padded to a fixed width so columns line
//! up across containers. A record whose message contains embedded newlines
//! (the framer collapses multi-line chunks into one record) is expanded
//! here: every output line gets the label prefix re-applied.

use logmux_protocol::LogRecord;
use owo_colors::OwoColorize;

use crate::color::{error_style, ColorAssigner};

/// Fixed width of the identity label field
pub const MAX_NAME_LENGTH: usize = 20;

/// Marker appended to labels longer than [`MAX_NAME_LENGTH`]
const TRUNCATION_MARKER: char = '…';

/// Renders records into labeled display lines
///
/// Owns the color table, so label colors stay stable for the formatter's
/// lifetime across every record it renders.
#[derive(Debug, Default)]
pub struct RecordFormatter {
    colors: ColorAssigner,
}

impl RecordFormatter {
    /// Create a formatter with an empty color table
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a record into one display string, possibly multi-line
    ///
    /// Every line of the message gets the label prefix. With colors enabled
    /// the label is wrapped in the identity's assigned color and error
    /// output is wrapped in the fixed error color; otherwise the text is
    /// emitted plain.
    pub fn format(&self, record: &LogRecord, color_enabled: bool) -> String {
        let label = padded_label(record.identity().short_name());

        let lines: Vec<String> = record
            .message()
            .split('\n')
            .map(|line| {
                if color_enabled {
                    let label_style = self.colors.color_for(record.identity()).style();
                    if record.is_error_output() {
                        format!(
                            "{} | {}",
                            label.style(label_style),
                            line.style(error_style())
                        )
                    } else {
                        format!("{} | {}", label.style(label_style), line)
                    }
                } else {
                    format!("{label} | {line}")
                }
            })
            .collect();

        lines.join("\n")
    }

    /// Access the underlying color assigner
    pub fn colors(&self) -> &ColorAssigner {
        &self.colors
    }
}

/// Truncate and pad a short name to exactly [`MAX_NAME_LENGTH`] characters
fn padded_label(name: &str) -> String {
    let mut label: String = if name.chars().count() > MAX_NAME_LENGTH {
        let mut truncated: String = name.chars().take(MAX_NAME_LENGTH - 1).collect();
        truncated.push(TRUNCATION_MARKER);
        truncated
    } else {
        name.to_owned()
    };

    let width = label.chars().count();
    for _ in width..MAX_NAME_LENGTH {
        label.push(' ');
    }
    label
}

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;
