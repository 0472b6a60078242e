//! Converter configuration
//!
//! A fully enumerated option set, consumed read-only by the core. Stored in
//! `~/.config/tickwrap/config.yaml`; missing or malformed files fall back to
//! defaults rather than failing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::quote::DelimiterPreference;

/// Preferred quote character when reverting from backticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteType {
    #[default]
    Double,
    Single,
}

impl QuoteType {
    pub fn ch(self) -> char {
        match self {
            QuoteType::Double => '"',
            QuoteType::Single => '\'',
        }
    }
}

/// All knobs the dispatcher and rewrite paths consult.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Master switch for automatic conversion
    pub enabled: bool,
    /// Quote character restored by reversion
    pub quote_type: QuoteType,
    /// Language ids the converter reacts to
    pub supported_languages: Vec<String>,
    /// Regex patterns; matching file names are ignored entirely
    pub excluded_file_patterns: Vec<String>,
    /// Prefer the outermost delimiter pair when quotes are nested
    pub convert_outermost_quotes: bool,
    /// Allow conversion checks while the cursor already sits inside backticks
    pub convert_within_template_string: bool,
    /// Revert backticks to quotes when the last interpolation is deleted
    pub auto_remove_template_string: bool,
    /// Wrap markup attribute values in braces instead of backticks
    pub add_brackets_to_props: bool,
    /// Whether the host auto-inserts closing braces (affects which trigger
    /// patterns need a follow-up brace insertion)
    pub auto_closing_brackets: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quote_type: QuoteType::default(),
            supported_languages: vec![
                "javascript".to_string(),
                "typescript".to_string(),
                "javascriptreact".to_string(),
                "typescriptreact".to_string(),
                "svelte".to_string(),
            ],
            excluded_file_patterns: Vec::new(),
            convert_outermost_quotes: true,
            convert_within_template_string: true,
            auto_remove_template_string: true,
            add_brackets_to_props: false,
            auto_closing_brackets: true,
        }
    }
}

impl ConverterConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from an explicit path, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn is_language_supported(&self, language_id: &str) -> bool {
        self.supported_languages.iter().any(|l| l == language_id)
    }

    /// Check if a file name matches any exclusion pattern.
    ///
    /// Patterns are regexes; ones that fail to compile are skipped with a
    /// warning rather than blocking the edit path.
    pub fn is_file_excluded(&self, file_name: &str) -> bool {
        self.excluded_file_patterns.iter().any(|pattern| {
            match regex::Regex::new(pattern) {
                Ok(re) => re.is_match(file_name),
                Err(e) => {
                    tracing::warn!("Invalid exclusion pattern {:?}: {}", pattern, e);
                    false
                }
            }
        })
    }

    /// Delimiter preference handed to the quote region finder. The finder
    /// always considers any quote kind; `quote_type` only decides what a
    /// reversion writes back.
    pub fn delimiter_preference(&self) -> DelimiterPreference {
        DelimiterPreference::AnyQuote
    }
}

fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tickwrap").join("config.yaml"))
}
