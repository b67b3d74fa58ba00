//! Wire types for the theme-management API.

use serde::{Deserialize, Serialize};

/// One theme on the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub id: u64,
    pub name: String,
    /// At most one theme per store is active; activation happens outside
    /// this tool, so the flag is read-only here.
    #[serde(default)]
    pub active: bool,
}

/// Paginated envelope returned by the theme list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeList {
    #[serde(default)]
    pub results: Vec<Theme>,
}

/// One file-equivalent resource within a theme.
///
/// Exactly one of `content`/`file` is meaningful: a non-null `file` URL
/// marks a binary asset hosted separately; otherwise `content` holds the
/// inline text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Relative path, unique within the theme.
    pub name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
}

impl Template {
    /// Whether this template's payload is a binary asset at a separate URL.
    #[must_use]
    pub fn is_media(&self) -> bool {
        self.file.is_some()
    }
}

/// Upload payload for create-or-update.
///
/// Text is sent as a form `content` field; media as a multipart `file`
/// part with an empty `content` field. Mutually exclusive by construction.
#[derive(Debug, Clone)]
pub enum TemplatePayload {
    Text(String),
    Media(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_media_flag_follows_file_url() {
        let text: Template = serde_json::from_str(
            r#"{"name": "templates/index.html", "content": "<html></html>", "file": null}"#,
        )
        .unwrap();
        assert!(!text.is_media());
        assert_eq!(text.content.as_deref(), Some("<html></html>"));

        let media: Template = serde_json::from_str(
            r#"{"name": "assets/logo.png", "content": null, "file": "https://cdn.example/logo.png"}"#,
        )
        .unwrap();
        assert!(media.is_media());
    }

    #[test]
    fn theme_list_envelope_parses() {
        let list: ThemeList = serde_json::from_str(
            r#"{"count": 2, "results": [
                {"id": 1, "name": "Default", "active": true},
                {"id": 2, "name": "Holiday"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.results.len(), 2);
        assert!(list.results[0].active);
        assert!(!list.results[1].active);
    }
}
