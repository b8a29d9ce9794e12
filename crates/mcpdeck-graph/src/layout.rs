use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Column/row grid the workflow graph is laid out on
///
/// Columns run left to right: llm, server, tool, then auth provider and api
/// endpoint. Tool rows are stacked symmetrically around `center_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub column_spacing: f64,
    pub row_spacing: f64,
    pub center_y: f64,
    pub origin_x: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_spacing: 300.0,
            row_spacing: 150.0,
            center_y: 300.0,
            origin_x: 50.0,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column_spacing(mut self, spacing: f64) -> Self {
        self.column_spacing = spacing;
        self
    }

    pub fn with_row_spacing(mut self, spacing: f64) -> Self {
        self.row_spacing = spacing;
        self
    }

    pub fn with_center_y(mut self, center_y: f64) -> Self {
        self.center_y = center_y;
        self
    }

    pub fn column_x(&self, column: usize) -> f64 {
        self.origin_x + column as f64 * self.column_spacing
    }

    /// Vertical offset of tool row `index` out of `count`, relative to `center_y`
    pub fn row_offset(&self, index: usize, count: usize) -> f64 {
        let first = -((count.saturating_sub(1)) as f64 * self.row_spacing) / 2.0;
        first + index as f64 * self.row_spacing
    }

    pub fn row_y(&self, index: usize, count: usize) -> f64 {
        self.center_y + self.row_offset(index, count)
    }

    pub fn position(&self, column: usize, y: f64) -> Position {
        Position::new(self.column_x(column), y)
    }
}
