//! Annotation resolution: capabilities, build mode and platform to an expansion.
//!
//! Deprecation-style kinds go through the rule tables and always end with
//! the `Public` expansion; the rest are gated by a single capability.

use crate::rules::{Outcome, RuleId, RuleInput, DEPRECATION_RULES, INTERNAL_MSG_RULES};
use attrgate_model::annotation::{Annotation, Arg};
use attrgate_model::build::BuildMode;
use attrgate_model::caps::CapabilitySet;
use attrgate_model::expansion::{AttrToken, Expansion, Visibility};
use attrgate_model::toolchain::Platform;

/// The expansion chosen for one annotation and the rule that chose it.
///
/// `rule` is `None` for kinds gated by a single capability (visibility,
/// format, nonnull, noreturn).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub expansion: Expansion,
    pub rule: Option<RuleId>,
}

impl Resolution {
    fn gated(expansion: Expansion) -> Self {
        Self {
            expansion,
            rule: None,
        }
    }
}

/// Expansion of the `Public` kind, appended to every deprecation-style kind.
pub fn public_expansion(caps: &CapabilitySet) -> Expansion {
    if caps.has_visibility {
        Expansion::single(AttrToken::Visibility(Visibility::Default))
    } else {
        Expansion::empty()
    }
}

/// Resolve one annotation occurrence. Deterministic and total.
pub fn resolve(
    annotation: &Annotation,
    caps: &CapabilitySet,
    mode: BuildMode,
    platform: Platform,
) -> Resolution {
    let input = RuleInput {
        caps: *caps,
        mode,
        platform,
    };

    let resolution = match annotation {
        // visibility ignores the build mode entirely
        Annotation::Public | Annotation::Private => Resolution::gated(public_expansion(caps)),
        Annotation::Internal => Resolution::gated(if caps.has_visibility {
            Expansion::single(AttrToken::Visibility(Visibility::Hidden))
        } else {
            Expansion::empty()
        }),

        Annotation::Deprecated => {
            let (rule, outcome) = DEPRECATION_RULES.evaluate(&input);
            restricted(rule, outcome, None, caps)
        }
        Annotation::DeprecatedWithMessage(m) => {
            let (rule, outcome) = DEPRECATION_RULES.evaluate(&input);
            restricted(rule, outcome, Some(m), caps)
        }
        Annotation::InternalWithMessage(m) => {
            let (rule, outcome) = INTERNAL_MSG_RULES.evaluate(&input);
            restricted(rule, outcome, Some(m), caps)
        }

        Annotation::Format {
            format_index,
            first_arg,
        } => Resolution::gated(if caps.has_format {
            Expansion::single(AttrToken::Format {
                format_index: format_index.clone(),
                first_arg: first_arg.clone(),
            })
        } else {
            Expansion::empty()
        }),
        Annotation::NonNull(indices) => Resolution::gated(if caps.has_non_null {
            Expansion::single(AttrToken::NonNull(indices.clone()))
        } else {
            Expansion::empty()
        }),
        Annotation::NoReturn => Resolution::gated(if caps.has_no_return {
            Expansion::single(AttrToken::NoReturn)
        } else {
            Expansion::empty()
        }),
    };

    tracing::trace!(
        kind = %annotation.kind(),
        rule = ?resolution.rule,
        tokens = resolution.expansion.len(),
        "resolved annotation"
    );
    resolution
}

fn restricted(
    rule: RuleId,
    outcome: Outcome,
    message: Option<&Arg>,
    caps: &CapabilitySet,
) -> Resolution {
    let message = message.cloned();
    let marker = match outcome {
        Outcome::PublicOnly => None,
        Outcome::Unavailable => Some(AttrToken::Unavailable(message)),
        Outcome::Deprecated => Some(AttrToken::Deprecated(message)),
        Outcome::DeprecatedIfMessage => Some(AttrToken::Deprecated(
            message.filter(|_| caps.has_deprecated_with_message),
        )),
        Outcome::DeprecatedPlain => Some(AttrToken::Deprecated(None)),
    };

    let mut expansion = Expansion::empty();
    if let Some(token) = marker {
        expansion.push(token);
    }
    Resolution {
        expansion: expansion.then(public_expansion(caps)),
        rule: Some(rule),
    }
}
