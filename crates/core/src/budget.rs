//! Word-count budgets for generated articles.
//!
//! A length bucket maps to an inclusive word-count range. The total is drawn
//! uniformly from that range and split between introduction/conclusion and
//! the body sections.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;

use crate::error::CoreError;
use crate::params::LengthFlags;

/// Share of the total reserved for introduction and conclusion.
pub const INTRO_AND_CONCLUSION_SHARE: f64 = 0.2;

/// Target length handed to the editor when no longer bucket applies.
pub const EDITOR_DEFAULT_WORDS: u32 = 800;

/// One of the four named word-count ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
    SuperLong,
}

impl LengthBucket {
    /// Inclusive word-count range for this bucket.
    pub fn range(self) -> RangeInclusive<u32> {
        match self {
            LengthBucket::Short => 300..=500,
            LengthBucket::Medium => 800..=1200,
            LengthBucket::Long => 1500..=2000,
            LengthBucket::SuperLong => 2500..=3000,
        }
    }

    /// Human-readable name published to the status channel.
    pub fn label(self) -> &'static str {
        match self {
            LengthBucket::Short => "short",
            LengthBucket::Medium => "medium",
            LengthBucket::Long => "long",
            LengthBucket::SuperLong => "super long",
        }
    }

    /// Pick the bucket selected by `flags`.
    ///
    /// Flags are checked short, medium, long, super long; the first set flag
    /// wins. With no flag set the result is medium, marked as defaulted.
    pub fn resolve(flags: &LengthFlags) -> ResolvedLength {
        let selected = if flags.short {
            Some(LengthBucket::Short)
        } else if flags.medium {
            Some(LengthBucket::Medium)
        } else if flags.long {
            Some(LengthBucket::Long)
        } else if flags.super_long {
            Some(LengthBucket::SuperLong)
        } else {
            None
        };

        match selected {
            Some(bucket) => ResolvedLength {
                bucket,
                defaulted: false,
            },
            None => ResolvedLength {
                bucket: LengthBucket::Medium,
                defaulted: true,
            },
        }
    }
}

/// Result of [`LengthBucket::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLength {
    pub bucket: LengthBucket,
    /// `true` when no flag was set and medium was assumed.
    pub defaulted: bool,
}

impl ResolvedLength {
    pub fn label(&self) -> &'static str {
        if self.defaulted {
            "medium (default)"
        } else {
            self.bucket.label()
        }
    }
}

/// Word counts for one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordBudget {
    pub length: &'static str,
    pub total: u32,
    pub intro_and_conclusion: u32,
    pub remaining: u32,
    pub per_section: u32,
}

impl WordBudget {
    /// Draw a total from the selected bucket and split it across sections.
    ///
    /// `section_count` must be non-zero.
    pub fn compute<R: Rng + ?Sized>(
        length: &LengthFlags,
        section_count: usize,
        rng: &mut R,
    ) -> Result<Self, CoreError> {
        if section_count == 0 {
            return Err(CoreError::Validation(
                "At least one section is required to compute a word budget".to_string(),
            ));
        }

        let resolved = length.bucket();
        let total = rng.random_range(resolved.bucket.range());
        let intro_and_conclusion = (f64::from(total) * INTRO_AND_CONCLUSION_SHARE).floor() as u32;
        let remaining = total - intro_and_conclusion;
        let per_section = remaining / section_count as u32;

        Ok(Self {
            length: resolved.label(),
            total,
            intro_and_conclusion,
            remaining,
            per_section,
        })
    }
}

/// Approximate article length given to the editor pass.
///
/// Consults medium, long, super long in that order and falls back to
/// [`EDITOR_DEFAULT_WORDS`].
pub fn editor_target_words(length: &LengthFlags) -> u32 {
    if length.medium {
        1200
    } else if length.long {
        2000
    } else if length.super_long {
        3000
    } else {
        EDITOR_DEFAULT_WORDS
    }
}
