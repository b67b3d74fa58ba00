//! File classification for sync decisions.
//!
//! Pure functions that decide, per path, whether a file is a media (binary)
//! asset or inline text content, whether it is eligible for sync at all, and
//! what its template name is on the remote theme.
//!
//! The allow-list is a fixed set of glob patterns scoped to the known theme
//! directories. Paths outside it are silently dropped by the reconciler;
//! the tool's own configuration files are always excluded so credentials are
//! never uploaded.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use glob::{MatchOptions, Pattern};

/// File name of the tool's own configuration file, never synced.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Directory holding Sass sources, compiled before upload.
pub const SASS_SOURCE: &str = "sass";

/// Directory Sass compiles into.
pub const SASS_DESTINATION: &str = "assets";

/// Extensions transported as multipart file payloads rather than inline text.
static MEDIA_FILE_EXTENSIONS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    [
        "woff2", "gif", "ico", "png", "jpg", "jpeg", "svg", "eot", "tff", "ttf", "woff", "webp",
        "mp4", "webm", "mp3", "pdf",
    ]
    .into_iter()
    .collect()
});

/// Allow-list of template paths eligible for sync.
static GLOB_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    let mut raw = vec![
        "assets/**/*.html".to_string(),
        "assets/**/*.json".to_string(),
        "assets/**/*.css".to_string(),
        "assets/**/*.scss".to_string(),
        "assets/**/*.js".to_string(),
    ];
    for ext in MEDIA_FILE_EXTENSIONS.iter() {
        raw.push(format!("assets/**/*.{ext}"));
    }
    raw.extend(
        [
            "checkout/**/*.html",
            "configs/**/*.json",
            "layouts/**/*.html",
            "partials/**/*.html",
            "templates/**/*.html",
            "locales/**/*.json",
            "sass/**/*.scss",
        ]
        .map(str::to_string),
    );

    raw.iter()
        .map(|p| Pattern::new(p).expect("allow-list patterns are static and valid"))
        .collect()
});

/// Glob options: `*` never crosses a `/`, only `**` does.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Normalize a local path into a template name.
///
/// Template names are POSIX-style relative paths: backslashes become `/`
/// and a leading `./` is stripped.
#[must_use]
pub fn template_name(path: &str) -> String {
    let mut name = path.replace('\\', "/");
    while let Some(stripped) = name.strip_prefix("./") {
        name = stripped.to_string();
    }
    name
}

/// Whether the path's extension marks it as a binary media asset.
#[must_use]
pub fn is_media(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| MEDIA_FILE_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
}

/// Whether the template name matches the sync allow-list.
#[must_use]
pub fn is_accepted(name: &str) -> bool {
    !is_ignored(name)
        && GLOB_PATTERNS
            .iter()
            .any(|p| p.matches_with(name, MATCH_OPTIONS))
}

/// Whether the path is always excluded from sync.
///
/// Covers the tool's own config file and any hidden component
/// (dotfiles, `.env` files, editor droppings under hidden dirs).
#[must_use]
pub fn is_ignored(name: &str) -> bool {
    if name == CONFIG_FILE_NAME {
        return true;
    }
    name.split('/').any(|part| part.starts_with('.'))
}

/// Whether the template name lives under the Sass source directory.
#[must_use]
pub fn is_sass_source(name: &str) -> bool {
    name.split('/').next() == Some(SASS_SOURCE)
}

/// Expand the allow-list over a local directory.
///
/// Returns the template names of every accepted file under `root`,
/// in sorted order. Used by `push` when no explicit files are given.
pub fn accepted_files_under(root: &Path) -> crate::error::Result<Vec<String>> {
    let mut names = Vec::new();
    // The root is a literal path; escape it so metacharacters in the
    // directory name ("[theme]", "v?2") do not leak into the glob.
    let prefix = Pattern::escape(&root.to_string_lossy());
    let prefix = prefix.trim_end_matches('/');
    for pattern in GLOB_PATTERNS.iter() {
        let full = format!("{prefix}/{}", pattern.as_str());
        for entry in glob::glob(&full).map_err(|e| crate::error::Error::Other(e.to_string()))? {
            let path = entry.map_err(|e| crate::error::Error::Other(e.to_string()))?;
            if !path.is_file() {
                continue;
            }
            if let Ok(rel) = path.strip_prefix(root) {
                let name = template_name(&rel.to_string_lossy());
                if !is_ignored(name.as_str()) {
                    names.push(name);
                }
            }
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn normalizes_template_names() {
        assert_eq!(template_name("./partials/alert.html"), "partials/alert.html");
        assert_eq!(template_name("assets\\img\\logo.png"), "assets/img/logo.png");
        assert_eq!(template_name("templates/index.html"), "templates/index.html");
    }

    #[test]
    fn media_detection_by_extension() {
        assert!(is_media("assets/logo.png"));
        assert!(is_media("assets/fonts/icons.woff2"));
        assert!(is_media("assets/manual.PDF"));
        assert!(!is_media("assets/base.css"));
        assert!(!is_media("templates/index.html"));
        assert!(!is_media("assets/noextension"));
    }

    #[test]
    fn accepts_known_theme_paths() {
        assert!(is_accepted("assets/base.css"));
        assert!(is_accepted("assets/img/logo.png"));
        assert!(is_accepted("templates/index.html"));
        assert!(is_accepted("layouts/base.html"));
        assert!(is_accepted("partials/nav/menu.html"));
        assert!(is_accepted("checkout/cart.html"));
        assert!(is_accepted("configs/settings.json"));
        assert!(is_accepted("locales/en.json"));
        assert!(is_accepted("sass/theme.scss"));
        assert!(is_accepted("sass/components/button.scss"));
    }

    #[test]
    fn drops_paths_outside_allow_list() {
        assert!(!is_accepted("README.md"));
        assert!(!is_accepted("templates/index.js"));
        assert!(!is_accepted("src/main.rs"));
        assert!(!is_accepted("sass/theme.css"));
        // `*` must not cross a separator outside of `**`
        assert!(!is_accepted("outside/assets/base.css"));
    }

    #[test]
    fn never_syncs_own_config_or_hidden_files() {
        assert!(is_ignored("config.yml"));
        assert!(is_ignored(".env"));
        assert!(is_ignored(".env.production"));
        assert!(is_ignored("assets/.hidden.css"));
        assert!(is_ignored(".git/config"));
        assert!(!is_ignored("assets/base.css"));

        // Ignored always wins over the allow-list.
        assert!(!is_accepted("assets/.hidden.css"));
    }

    #[test]
    fn sass_source_detection() {
        assert!(is_sass_source("sass/theme.scss"));
        assert!(is_sass_source("sass/components/button.scss"));
        assert!(!is_sass_source("assets/theme.css"));
        assert!(!is_sass_source("sassy/theme.scss"));
    }

    #[test]
    fn expands_accepted_files_under_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets/img")).unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("assets/base.css"), "body {}").unwrap();
        fs::write(dir.path().join("assets/img/logo.png"), [0u8; 4]).unwrap();
        fs::write(dir.path().join("templates/index.html"), "<html>").unwrap();
        fs::write(dir.path().join("config.yml"), "development: {}").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let names = accepted_files_under(dir.path()).unwrap();
        assert_eq!(
            names,
            vec![
                "assets/base.css".to_string(),
                "assets/img/logo.png".to_string(),
                "templates/index.html".to_string(),
            ]
        );
    }

    #[test]
    fn expands_roots_containing_glob_metacharacters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("[theme] v2");
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("assets/base.css"), "body {}").unwrap();

        let names = accepted_files_under(&root).unwrap();
        assert_eq!(names, vec!["assets/base.css".to_string()]);
    }
}
