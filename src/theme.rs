use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub label_fill: String,
    pub shadow_color: String,
    pub shadow_alpha: f32,
    /// Canvas fill behind the badge; `None` leaves it transparent.
    pub background: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            label_fill: "#FFFFFF".to_string(),
            shadow_color: "#000000".to_string(),
            shadow_alpha: 0.1,
            background: None,
        }
    }
}
