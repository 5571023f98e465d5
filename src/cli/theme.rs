//! Terminal styling

use console::Style;

/// Styles used by every report
#[derive(Debug, Clone)]
pub struct Theme {
    /// Satisfied requirements and `Ok` labels (green)
    pub success: Style,
    /// Mismatched but acceptable versions (yellow bold)
    pub warning: Style,
    /// Broken requirements and `Error` labels (red bold)
    pub error: Style,
    /// Package names (blue bold)
    pub name: Style,
    /// Version strings (cyan)
    pub version: Style,
    /// Labels in key-value displays (blue)
    pub label: Style,
    /// Install paths (yellow)
    pub location: Style,
    /// Counters in summaries (bold)
    pub number: Style,
    /// Notices and summaries (cyan)
    pub notice: Style,
    /// Secondary text (dim)
    pub dim: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow().bold(),
            error: Style::new().red().bold(),
            name: Style::new().blue().bold(),
            version: Style::new().cyan(),
            label: Style::new().blue(),
            location: Style::new().yellow(),
            number: Style::new().bold(),
            notice: Style::new().cyan(),
            dim: Style::new().dim(),
        }
    }

    /// A theme without colors (for `--no-color`)
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            name: Style::new(),
            version: Style::new(),
            label: Style::new(),
            location: Style::new(),
            number: Style::new(),
            notice: Style::new(),
            dim: Style::new(),
        }
    }
}
