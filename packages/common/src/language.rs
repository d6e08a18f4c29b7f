#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Programming language a submission is written in.
///
/// The language decides the extension of the committed code file, so it is
/// part of the deterministic remote path. When the `sea-orm` feature is
/// enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "python"))]
    Python,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "java"))]
    Java,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "cpp"))]
    Cpp,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "c"))]
    C,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "kotlin"))]
    Kotlin,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "javascript"))]
    JavaScript,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "rust"))]
    Rust,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "go"))]
    Go,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "swift"))]
    Swift,
}

impl Language {
    /// All supported languages.
    pub const ALL: &'static [Language] = &[
        Self::Python,
        Self::Java,
        Self::Cpp,
        Self::C,
        Self::Kotlin,
        Self::JavaScript,
        Self::Rust,
        Self::Go,
        Self::Swift,
    ];

    /// Returns the lowercase tag used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Kotlin => "kotlin",
            Self::JavaScript => "javascript",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Swift => "swift",
        }
    }

    /// File extension (without the dot) of a source file in this language.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Kotlin => "kt",
            Self::JavaScript => "js",
            Self::Rust => "rs",
            Self::Go => "go",
            Self::Swift => "swift",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError {
    invalid: String,
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid language '{}'. Valid values: {}",
            self.invalid,
            Language::ALL
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ParseLanguageError {
                invalid: s.to_string(),
            })
    }
}
