//! Resolution precedence and composition over the whole input space.

use attrgate_model::annotation::{Annotation, Arg, ALL_KINDS};
use attrgate_model::build::BuildMode;
use attrgate_model::caps::CapabilitySet;
use attrgate_model::expansion::{AttrToken, Expansion, Visibility};
use attrgate_model::toolchain::{ExtensionProbes, Platform, ToolchainProfile};
use attrgate_resolve::{detect, public_expansion, resolve, RuleId};

const PLATFORMS: [Platform; 3] = [Platform::Apple, Platform::Windows, Platform::Other];

/// Every capability set, build mode and platform.
fn input_space() -> impl Iterator<Item = (CapabilitySet, BuildMode, Platform)> {
    (0u8..128).flat_map(|bits| {
        let caps = CapabilitySet::from_bits(bits);
        BuildMode::all()
            .into_iter()
            .flat_map(move |mode| PLATFORMS.into_iter().map(move |p| (caps, mode, p)))
    })
}

fn samples() -> Vec<Annotation> {
    let mut v: Vec<Annotation> = ALL_KINDS.iter().map(|k| Annotation::template(*k)).collect();
    v.push(Annotation::deprecated_msg("Use foo2 instead."));
    v.push(Annotation::internal_msg("Use the public API."));
    v.push(Annotation::format(2, 3));
    v.push(Annotation::non_null([1, 2]));
    v
}

fn default_vis() -> AttrToken {
    AttrToken::Visibility(Visibility::Default)
}

#[test]
fn resolution_is_total_and_deterministic() {
    let anns = samples();
    for (caps, mode, platform) in input_space() {
        for ann in &anns {
            let a = resolve(ann, &caps, mode, platform);
            let b = resolve(ann, &caps, mode, platform);
            assert_eq!(a, b);
            assert!(a.expansion.len() <= 2);
        }
    }
}

#[test]
fn deprecation_kinds_end_with_public() {
    let anns = samples();
    for (caps, mode, platform) in input_space() {
        let public = public_expansion(&caps);
        for ann in anns.iter().filter(|a| a.kind().implies_public()) {
            let r = resolve(ann, &caps, mode, platform);
            assert!(
                r.expansion.ends_with(&public),
                "{:?} {:?} {:?} {:?}",
                ann,
                caps,
                mode,
                platform
            );
            assert!(r.rule.is_some());
        }
    }
}

#[test]
fn visibility_ignores_build_mode() {
    for (caps, mode, platform) in input_space() {
        for ann in [Annotation::Public, Annotation::Private, Annotation::Internal] {
            assert_eq!(
                resolve(&ann, &caps, mode, platform),
                resolve(&ann, &caps, BuildMode::default(), Platform::Other)
            );
        }
    }
}

#[test]
fn public_and_private_match() {
    for (caps, mode, platform) in input_space() {
        assert_eq!(
            resolve(&Annotation::Public, &caps, mode, platform),
            resolve(&Annotation::Private, &caps, mode, platform)
        );
    }
}

#[test]
fn library_source_makes_internal_msg_public_only() {
    let ann = Annotation::internal_msg("internal");
    for (caps, mode, platform) in input_space() {
        if !mode.library_source {
            continue;
        }
        let r = resolve(&ann, &caps, mode, platform);
        assert_eq!(r.expansion, public_expansion(&caps));
        assert_eq!(r.rule, Some(RuleId::InternalLibrarySource));
    }
}

#[test]
fn apple_beats_generic_unavailable() {
    for (caps, mode, _) in input_space() {
        if !caps.has_unavailable_with_message || !caps.has_deprecated {
            continue;
        }
        if mode.library_source && !mode.exclude_deprecated {
            continue;
        }
        for ann in [Annotation::Deprecated, Annotation::deprecated_msg("x")] {
            let r = resolve(&ann, &caps, mode, Platform::Apple);
            let expected = if mode.exclude_deprecated {
                RuleId::AppleUnavailable
            } else {
                RuleId::AppleDeprecated
            };
            assert_eq!(r.rule, Some(expected));
        }
    }
}

#[test]
fn capability_gated_kinds() {
    for (caps, mode, platform) in input_space() {
        let f = resolve(&Annotation::format(1, 2), &caps, mode, platform);
        assert_eq!(f.expansion.is_empty(), !caps.has_format);
        let n = resolve(&Annotation::NoReturn, &caps, mode, platform);
        assert_eq!(n.expansion.is_empty(), !caps.has_no_return);
        let nn = resolve(&Annotation::non_null([1]), &caps, mode, platform);
        assert_eq!(nn.expansion.is_empty(), !caps.has_non_null);
    }
}

#[test]
fn unknown_vendor_emits_nothing() {
    let caps = detect(&ToolchainProfile::unknown());
    for mode in BuildMode::all() {
        for platform in PLATFORMS {
            for ann in samples() {
                let r = resolve(&ann, &caps, mode, platform);
                assert!(r.expansion.is_empty(), "{ann:?}");
            }
        }
    }
}

#[test]
fn clang_unavailable_probe_without_exclusion_uses_deprecated() {
    let profile = ToolchainProfile::clang().with_probes(ExtensionProbes {
        deprecated_with_message: false,
        unavailable_with_message: true,
    });
    let caps = detect(&profile);
    let r = resolve(&Annotation::Deprecated, &caps, BuildMode::default(), Platform::Other);
    assert_eq!(r.rule, Some(RuleId::DeprecatedFallback));
    assert_eq!(
        r.expansion,
        Expansion::from(vec![AttrToken::Deprecated(None), default_vis()])
    );
}

#[test]
fn clang_unavailable_probe_with_exclusion_uses_unavailable() {
    let caps = detect(&ToolchainProfile::clang().with_probes(ExtensionProbes::all()));
    let r = resolve(
        &Annotation::deprecated_msg("gone"),
        &caps,
        BuildMode::strict(),
        Platform::Other,
    );
    assert_eq!(r.rule, Some(RuleId::UnavailableWithMessage));
    assert_eq!(
        r.expansion,
        Expansion::from(vec![
            AttrToken::Unavailable(Some(Arg::Str("gone".into()))),
            default_vis()
        ])
    );
}

#[test]
fn gcc_exclusion_falls_back_to_deprecated() {
    // GCC never reports unavailable, so exclusion cannot make it an error
    let caps = detect(&ToolchainProfile::gcc(12, 0));
    let r = resolve(&Annotation::Deprecated, &caps, BuildMode::strict(), Platform::Other);
    assert_eq!(r.rule, Some(RuleId::DeprecatedFallback));
    assert_eq!(r.expansion.tokens()[0], AttrToken::Deprecated(None));
}

#[test]
fn library_source_suppresses_deprecation() {
    let caps = detect(&ToolchainProfile::apple_clang().with_probes(ExtensionProbes::all()));
    let r = resolve(&Annotation::Deprecated, &caps, BuildMode::library(), Platform::Apple);
    assert_eq!(r.rule, Some(RuleId::DeprecationSuppressed));
    assert_eq!(r.expansion, Expansion::from(vec![default_vis()]));
}

#[test]
fn internal_msg_fallbacks() {
    let ann = Annotation::internal_msg("use x");
    let msg = Some(Arg::Str("use x".into()));

    let clang = detect(&ToolchainProfile::clang().with_probes(ExtensionProbes::all()));
    let r = resolve(&ann, &clang, BuildMode::default(), Platform::Other);
    assert_eq!(r.expansion.tokens()[0], AttrToken::Unavailable(msg.clone()));

    let gcc45 = detect(&ToolchainProfile::gcc(4, 5));
    let r = resolve(&ann, &gcc45, BuildMode::default(), Platform::Other);
    assert_eq!(r.expansion.tokens()[0], AttrToken::Deprecated(msg));

    let gcc44 = detect(&ToolchainProfile::gcc(4, 4));
    let r = resolve(&ann, &gcc44, BuildMode::default(), Platform::Other);
    assert_eq!(r.rule, Some(RuleId::InternalDeprecatedPlain));
    assert_eq!(r.expansion.tokens()[0], AttrToken::Deprecated(None));

    // without the deprecated attribute nothing can be emitted
    let r = resolve(&ann, &CapabilitySet::none(), BuildMode::default(), Platform::Other);
    assert_eq!(r.rule, Some(RuleId::InternalUnsupported));
    assert!(r.expansion.is_empty());
}

#[test]
fn pre_3_gcc_internal_msg_is_public_only() {
    let gcc295 = detect(&ToolchainProfile::gcc(2, 95));
    let r = resolve(
        &Annotation::internal_msg("internal"),
        &gcc295,
        BuildMode::default(),
        Platform::Other,
    );
    assert_eq!(r.rule, Some(RuleId::InternalUnsupported));
    assert_eq!(r.expansion, public_expansion(&gcc295));
    assert!(r.expansion.is_empty());
}
