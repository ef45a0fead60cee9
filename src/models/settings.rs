use serde::{Deserialize, Serialize};

/// Which list the sidebar shows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SidebarContent {
    Collection,
    #[default]
    History,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    pub theme: String,
    pub paper: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        EditorSettings {
            theme: "graphiql".to_string(),
            paper: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub endpoint: Option<String>,
    pub editor: EditorSettings,
    pub sidebar: SidebarContent,
    pub history_limit: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            endpoint: None,
            editor: EditorSettings::default(),
            sidebar: SidebarContent::default(),
            history_limit: 500,
        }
    }
}

impl AppSettings {
    /// The endpoint if one is configured and not blank
    pub fn active_endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }
}
