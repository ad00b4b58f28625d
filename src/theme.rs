use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub node_fill: String,
    pub node_border: String,
    pub text_color: String,
    pub line_color: String,
    pub bridge_marker: String,
    pub unresolved_marker: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            node_fill: "#ECECFF".to_string(),
            node_border: "#9370DB".to_string(),
            text_color: "#333333".to_string(),
            line_color: "#333333".to_string(),
            bridge_marker: "#2E8B57".to_string(),
            unresolved_marker: "#D62828".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            node_fill: "#F8FAFF".to_string(),
            node_border: "#C7D2E5".to_string(),
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            bridge_marker: "#3BA676".to_string(),
            unresolved_marker: "#E5484D".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}
