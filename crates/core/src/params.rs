//! Generation parameters: format, length, style and optional sections.
//!
//! A [`ParameterSet`] is either loaded from a stored preset or built from
//! [`ParameterSet::default`]. Tone and writing style are stored as their
//! lowercase names; [`ContentTone::as_str`] / [`FromStr`] round-trip them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::budget::{LengthBucket, ResolvedLength};
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Format / length / options
// ---------------------------------------------------------------------------

/// Formatting instructions applied to body sections and the editor pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatFlags {
    pub subheadings: bool,
    #[serde(alias = "bulletPoints")]
    pub bullet_points: bool,
    #[serde(alias = "numberedList")]
    pub numbered_list: bool,
}

impl FormatFlags {
    /// Prompt fragment listing the enabled formatting instructions.
    ///
    /// Empty when no flag is set.
    pub fn instructions(&self) -> String {
        let mut out = String::new();
        if self.subheadings {
            out.push_str(" Include relevant subheadings.");
        }
        if self.bullet_points {
            out.push_str(" Use bullet points for listing items.");
        }
        if self.numbered_list {
            out.push_str(" Use numbered lists for sequential information.");
        }
        out
    }
}

/// Length bucket selection flags.
///
/// Exactly one flag is expected to be set, but stored presets can hold zero
/// or several. [`LengthFlags::bucket`] picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthFlags {
    pub short: bool,
    pub medium: bool,
    pub long: bool,
    #[serde(alias = "superLong")]
    pub super_long: bool,
}

impl Default for LengthFlags {
    fn default() -> Self {
        Self {
            short: false,
            medium: true,
            long: false,
            super_long: false,
        }
    }
}

impl LengthFlags {
    /// The bucket these flags select, by priority short, medium, long, super long.
    pub fn bucket(&self) -> ResolvedLength {
        LengthBucket::resolve(self)
    }
}

/// Optional trailing sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleOptions {
    #[serde(alias = "faqSections")]
    pub faq_sections: bool,
    pub summary: bool,
}

// ---------------------------------------------------------------------------
// Style enums
// ---------------------------------------------------------------------------

macro_rules! define_style_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $entity:literal, default = $default:ident {
            $( $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Canonical lowercase name (the stored value).
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $value ),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        $entity,
                        [$( $value ),+].join(", ")
                    ))),
                }
            }
        }
    };
}

define_style_enum! {
    /// Tone of voice requested from the model.
    ContentTone, "content tone", default = Casual {
        Casual => "casual",
        Formal => "formal",
        Technical => "technical",
        Creative => "creative",
        Educational => "educational",
        Journalistic => "journalistic",
    }
}

define_style_enum! {
    /// Writing style requested from the model.
    WritingStyle, "writing style", default = Narrative {
        Narrative => "narrative",
        Descriptive => "descriptive",
        Expository => "expository",
        Persuasive => "persuasive",
        Conversational => "conversational",
        Analytical => "analytical",
    }
}

/// Tone and writing style pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleParams {
    #[serde(alias = "contentTone")]
    pub content_tone: ContentTone,
    #[serde(alias = "writingStyle")]
    pub writing_style: WritingStyle,
}

// ---------------------------------------------------------------------------
// ParameterSet
// ---------------------------------------------------------------------------

/// The full set of generation parameters for one article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub format: FormatFlags,
    pub length: LengthFlags,
    pub style: StyleParams,
    pub options: ArticleOptions,
}
