//! Identity color assignment
//!
//! Each container identity gets a display color the first time it is seen,
//! cycling through a fixed palette in first-seen order. Assignments key on
//! the stable identity id and persist for the assigner's lifetime, so two
//! containers that happen to share a display name still render in distinct
//! colors.

use std::collections::HashMap;

use logmux_protocol::ContainerIdentity;
use owo_colors::Style;
use parking_lot::Mutex;

/// A color from the container palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerColor {
    Cyan,
    Yellow,
    Magenta,
    Green,
    Blue,
}

/// Palette cycled through in first-seen order
pub const PALETTE: [ContainerColor; 5] = [
    ContainerColor::Cyan,
    ContainerColor::Yellow,
    ContainerColor::Magenta,
    ContainerColor::Green,
    ContainerColor::Blue,
];

impl ContainerColor {
    /// Terminal style for this color
    pub fn style(self) -> Style {
        match self {
            Self::Cyan => Style::new().cyan(),
            Self::Yellow => Style::new().yellow(),
            Self::Magenta => Style::new().magenta(),
            Self::Green => Style::new().green(),
            Self::Blue => Style::new().blue(),
        }
    }
}

/// Fixed style for error-stream output, distinct from every palette entry
pub fn error_style() -> Style {
    Style::new().red()
}

/// Stable mapping from identity id to display color
///
/// Append-only: assignments are never removed or re-derived. Concurrent
/// first lookups for the same id resolve to a single winning entry behind
/// the mutex.
#[derive(Debug, Default)]
pub struct ColorAssigner {
    table: Mutex<HashMap<String, ContainerColor>>,
}

impl ColorAssigner {
    /// Create an empty assigner
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the color for an identity, assigning one on first sight
    pub fn color_for(&self, identity: &ContainerIdentity) -> ContainerColor {
        let mut table = self.table.lock();
        let next = PALETTE[table.len() % PALETTE.len()];
        *table.entry(identity.id().to_owned()).or_insert(next)
    }

    /// Number of identities that have been assigned a color
    pub fn assigned_count(&self) -> usize {
        self.table.lock().len()
    }
}

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;
