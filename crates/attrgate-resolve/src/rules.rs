//! Precedence tables for the deprecation-style annotations.
//!
//! Each table is an ordered list of guarded rules followed by an
//! unconditional fallback, so evaluation always terminates in a rule.

use attrgate_model::build::BuildMode;
use attrgate_model::caps::CapabilitySet;
use attrgate_model::toolchain::Platform;
use std::fmt;

/// Everything a rule predicate may look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleInput {
    pub caps: CapabilitySet,
    pub mode: BuildMode,
    pub platform: Platform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RuleId {
    // Deprecated / DeprecatedWithMessage
    DeprecationSuppressed,
    AppleUnavailable,
    AppleDeprecated,
    UnavailableWithMessage,
    DeprecatedFallback,
    // InternalWithMessage
    InternalLibrarySource,
    InternalUnavailable,
    InternalDeprecatedMessage,
    InternalUnsupported,
    InternalDeprecatedPlain,
}

impl RuleId {
    pub fn name(self) -> &'static str {
        match self {
            RuleId::DeprecationSuppressed => "deprecation-suppressed",
            RuleId::AppleUnavailable => "apple-unavailable",
            RuleId::AppleDeprecated => "apple-deprecated",
            RuleId::UnavailableWithMessage => "unavailable-with-message",
            RuleId::DeprecatedFallback => "deprecated-fallback",
            RuleId::InternalLibrarySource => "internal-library-source",
            RuleId::InternalUnavailable => "internal-unavailable",
            RuleId::InternalDeprecatedMessage => "internal-deprecated-message",
            RuleId::InternalUnsupported => "internal-unsupported",
            RuleId::InternalDeprecatedPlain => "internal-deprecated-plain",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a matching rule contributes before the `Public` expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Outcome {
    /// No restriction attribute.
    PublicOnly,
    /// `unavailable`, carrying the message if the annotation has one.
    Unavailable,
    /// `deprecated`, carrying the message if the annotation has one.
    Deprecated,
    /// `deprecated`, carrying the message only with `has_deprecated_with_message`.
    DeprecatedIfMessage,
    /// `deprecated` with any message dropped.
    DeprecatedPlain,
}

pub struct Rule {
    pub id: RuleId,
    pub applies: fn(&RuleInput) -> bool,
    pub outcome: Outcome,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Guarded rules in precedence order plus the rule taken when none match.
#[derive(Debug)]
pub struct RuleTable {
    pub rules: &'static [Rule],
    pub fallback_id: RuleId,
    pub fallback: Outcome,
}

impl RuleTable {
    /// First matching rule wins.
    pub fn evaluate(&self, input: &RuleInput) -> (RuleId, Outcome) {
        self.rules
            .iter()
            .find(|rule| (rule.applies)(input))
            .map(|rule| (rule.id, rule.outcome))
            .unwrap_or((self.fallback_id, self.fallback))
    }

    /// Every rule id in evaluation order, fallback last.
    pub fn ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules
            .iter()
            .map(|r| r.id)
            .chain(std::iter::once(self.fallback_id))
    }
}

// ---- Deprecated / DeprecatedWithMessage ----

/// Deprecation markers are skipped without compiler support, and inside the
/// library's own source unless it opted into excluding deprecated API.
fn deprecation_suppressed(i: &RuleInput) -> bool {
    !i.caps.has_deprecated || (i.mode.library_source && !i.mode.exclude_deprecated)
}

fn apple_excluding(i: &RuleInput) -> bool {
    i.platform.is_apple() && i.mode.exclude_deprecated
}

fn apple(i: &RuleInput) -> bool {
    i.platform.is_apple()
}

fn unavailable_excluding(i: &RuleInput) -> bool {
    i.caps.has_unavailable_with_message && i.mode.exclude_deprecated
}

pub static DEPRECATION_RULES: RuleTable = RuleTable {
    rules: &[
        Rule {
            id: RuleId::DeprecationSuppressed,
            applies: deprecation_suppressed,
            outcome: Outcome::PublicOnly,
        },
        Rule {
            id: RuleId::AppleUnavailable,
            applies: apple_excluding,
            outcome: Outcome::Unavailable,
        },
        Rule {
            id: RuleId::AppleDeprecated,
            applies: apple,
            outcome: Outcome::Deprecated,
        },
        Rule {
            id: RuleId::UnavailableWithMessage,
            applies: unavailable_excluding,
            outcome: Outcome::Unavailable,
        },
    ],
    fallback_id: RuleId::DeprecatedFallback,
    fallback: Outcome::DeprecatedIfMessage,
};

// ---- InternalWithMessage ----

fn library_source(i: &RuleInput) -> bool {
    i.mode.library_source
}

fn has_unavailable_with_message(i: &RuleInput) -> bool {
    i.caps.has_unavailable_with_message
}

fn has_deprecated_with_message(i: &RuleInput) -> bool {
    i.caps.has_deprecated_with_message
}

/// A compiler without the deprecated attribute gets no marker at all.
///
/// GCC before 3.0 lands here too, so it gets the `Public` expansion only
/// instead of a bare `deprecated`.
fn lacks_deprecated(i: &RuleInput) -> bool {
    !i.caps.has_deprecated
}

pub static INTERNAL_MSG_RULES: RuleTable = RuleTable {
    rules: &[
        Rule {
            id: RuleId::InternalLibrarySource,
            applies: library_source,
            outcome: Outcome::PublicOnly,
        },
        Rule {
            id: RuleId::InternalUnavailable,
            applies: has_unavailable_with_message,
            outcome: Outcome::Unavailable,
        },
        Rule {
            id: RuleId::InternalDeprecatedMessage,
            applies: has_deprecated_with_message,
            outcome: Outcome::Deprecated,
        },
        Rule {
            id: RuleId::InternalUnsupported,
            applies: lacks_deprecated,
            outcome: Outcome::PublicOnly,
        },
    ],
    fallback_id: RuleId::InternalDeprecatedPlain,
    fallback: Outcome::DeprecatedPlain,
};
