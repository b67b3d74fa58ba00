//! External Sass compilation.
//!
//! Sass-to-CSS processing is an opaque external call: the `sass` executable
//! compiles the `sass/` source directory into `assets/`. Compile failures
//! are reported, never fatal to a sync batch.

use std::path::Path;
use std::process::Command;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::classify::{SASS_DESTINATION, SASS_SOURCE};
use crate::error::{Error, Result};

/// Sass output style, passed through to the compiler verbatim.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SassOutputStyle {
    #[default]
    Nested,
    Expanded,
    Compact,
    Compressed,
}

impl std::fmt::Display for SassOutputStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Nested => "nested",
            Self::Expanded => "expanded",
            Self::Compact => "compact",
            Self::Compressed => "compressed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SassOutputStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nested" => Ok(Self::Nested),
            "expanded" => Ok(Self::Expanded),
            "compact" => Ok(Self::Compact),
            "compressed" => Ok(Self::Compressed),
            other => Err(Error::Config(format!(
                "unsupported output_style \"{other}\"; choose one of \
                 nested, expanded, compact, and compressed"
            ))),
        }
    }
}

/// Seam for triggering a Sass compile pass.
///
/// The reconciler is written against this trait so tests can count
/// invocations without a Sass toolchain installed.
pub trait SassRunner: Send + Sync {
    /// Compile `<root>/sass` into `<root>/assets`.
    fn compile(&self, root: &Path, style: SassOutputStyle) -> Result<()>;
}

/// Runs the external `sass` executable.
pub struct SassCompiler;

impl SassRunner for SassCompiler {
    fn compile(&self, root: &Path, style: SassOutputStyle) -> Result<()> {
        let source = root.join(SASS_SOURCE);
        let dest = root.join(SASS_DESTINATION);
        if !source.is_dir() {
            return Err(Error::Sass(format!(
                "source directory {} does not exist",
                source.display()
            )));
        }

        let output = Command::new("sass")
            .arg("--no-source-map")
            .arg("--style")
            .arg(style.to_string())
            .arg(format!("{}:{}", source.display(), dest.display()))
            .output()
            .map_err(|e| Error::Sass(format!("could not run `sass`: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::Sass(stderr.trim().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_style_round_trips_through_strings() {
        for (text, style) in [
            ("nested", SassOutputStyle::Nested),
            ("expanded", SassOutputStyle::Expanded),
            ("compact", SassOutputStyle::Compact),
            ("compressed", SassOutputStyle::Compressed),
        ] {
            assert_eq!(text.parse::<SassOutputStyle>().unwrap(), style);
            assert_eq!(style.to_string(), text);
        }
    }

    #[test]
    fn unknown_output_style_is_rejected() {
        let err = "minified".parse::<SassOutputStyle>().unwrap_err();
        assert!(err.to_string().contains("unsupported output_style"));
    }

    #[test]
    fn output_style_serializes_lowercase() {
        assert_eq!(
            serde_yaml::to_string(&SassOutputStyle::Compressed).unwrap().trim(),
            "compressed"
        );
    }

    #[test]
    fn compile_fails_without_source_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = SassCompiler
            .compile(dir.path(), SassOutputStyle::Nested)
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
