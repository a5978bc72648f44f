//! Config file naming and source syntax detection.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

const PREFIX: &str = "worktree.";
const SUFFIX: &str = ".config";
const DEFAULT_STEM: &str = "worktree.config";

/// Extensions recognised as config files.
pub const CONFIG_EXTENSIONS: &[&str] = &["toml", "ts", "mts", "js", "mjs"];

/// The syntax a config document is written in.
///
/// Both variants produce the same [`crate::Config`] and are validated
/// identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// A declarative TOML document.
    Declarative,
    /// A TypeScript/JavaScript module whose default export is the config.
    ScriptModule,
}

impl ConfigSource {
    /// Pick the source syntax for a file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "toml" => Some(Self::Declarative),
            "ts" | "mts" | "js" | "mjs" => Some(Self::ScriptModule),
            _ => None,
        }
    }
}

/// A parsed config file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileName {
    /// Variant name, `None` for `worktree.config.<ext>`.
    pub variant: Option<String>,
    /// Syntax implied by the extension.
    pub source: ConfigSource,
}

/// Parse a file name of the form `worktree.config.<ext>` or
/// `worktree.<variant>.config.<ext>`.
///
/// Returns `None` for anything else, including an empty variant or the
/// reserved variant `config`, either of which would be ambiguous with the
/// default name.
#[must_use]
pub fn parse_config_file_name(file_name: &str) -> Option<ConfigFileName> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    let source = ConfigSource::from_extension(extension)?;

    if stem == DEFAULT_STEM {
        return Some(ConfigFileName {
            variant: None,
            source,
        });
    }

    let variant = stem.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    if variant.is_empty() || variant == "config" {
        return None;
    }

    Some(ConfigFileName {
        variant: Some(variant.to_string()),
        source,
    })
}

/// Glob patterns matching every config file anywhere below a root.
#[must_use]
pub fn config_file_patterns() -> Vec<String> {
    let extensions = CONFIG_EXTENSIONS.join(",");
    vec![
        format!("**/{DEFAULT_STEM}.{{{extensions}}}"),
        format!("**/{PREFIX}*{SUFFIX}.{{{extensions}}}"),
    ]
}
