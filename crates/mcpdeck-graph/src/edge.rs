use serde::{Deserialize, Serialize};

pub const SOURCE_HANDLE: &str = "source";
pub const TARGET_HANDLE: &str = "target";

pub const ACTIVE_STROKE: &str = "#10b981";
pub const INACTIVE_STROKE: &str = "#9ca3af";
pub const DEFAULT_STROKE: &str = "#64748b";
pub const AUTH_STROKE: &str = "#f59e0b";
const AUTH_DASHARRAY: &str = "5 5";

/// Stable edge id derived from both endpoints
pub fn edge_id(source: &str, target: &str) -> String {
    format!("e-{}-{}", source, target)
}

/// Custom edge renderers known to the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeType {
    ToolToApi,
    Deletable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<String>,
}

impl EdgeStyle {
    pub fn solid(stroke: &str) -> Self {
        Self {
            stroke: stroke.to_string(),
            stroke_width: 2.0,
            stroke_dasharray: None,
        }
    }

    pub fn dashed(stroke: &str) -> Self {
        Self {
            stroke_dasharray: Some(AUTH_DASHARRAY.to_string()),
            ..Self::solid(stroke)
        }
    }
}

/// Affordances for the `toolToApi` edge renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub show_add_button: bool,
    pub tool_id: String,
    /// Action the renderer dispatches when the add button is pressed
    pub on_add_auth: String,
}

impl EdgeData {
    pub fn add_auth(tool_id: &str) -> Self {
        Self {
            show_add_button: true,
            tool_id: tool_id.to_string(),
            on_add_auth: format!("add-auth:{}", tool_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<EdgeType>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub style: EdgeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
}

impl WorkflowEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target),
            source,
            target,
            source_handle: SOURCE_HANDLE.to_string(),
            target_handle: TARGET_HANDLE.to_string(),
            edge_type: None,
            animated: false,
            label: None,
            style: EdgeStyle::solid(DEFAULT_STROKE),
            data: None,
        }
    }

    pub fn with_type(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = Some(edge_type);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_data(mut self, data: EdgeData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Animated green when the target is active, static gray otherwise
    pub fn with_status(self, enabled: bool) -> Self {
        let mut edge = self;
        edge.set_status(enabled);
        edge
    }

    pub fn set_status(&mut self, enabled: bool) {
        self.animated = enabled;
        self.style.stroke = if enabled { ACTIVE_STROKE } else { INACTIVE_STROKE }.to_string();
    }
}
