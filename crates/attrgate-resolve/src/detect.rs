//! Capability detection: toolchain facts to attribute capabilities.
//!
//! Vendors are checked in a fixed order and the first match decides. A
//! vendor we know nothing about yields the empty set, which only ever makes
//! resolution emit fewer attributes.

use attrgate_model::caps::CapabilitySet;
use attrgate_model::toolchain::{ExtensionProbes, ToolchainProfile, Vendor, Version};

/// Derive the capability set for a toolchain profile. Total and pure.
pub fn detect(profile: &ToolchainProfile) -> CapabilitySet {
    let caps = match profile.vendor {
        v if v.is_clang_like() => clang_like(profile.probes),
        // A GCC that reports no version is treated as 0.0.
        Vendor::Gcc => gcc_like(profile.version.unwrap_or_default()),
        // MSVC has no GNU attribute syntax at all; unknown vendors get nothing.
        _ => CapabilitySet::none(),
    };

    debug_assert!(
        caps.is_consistent(),
        "deprecated-with-message without deprecated for {}",
        profile
    );
    tracing::debug!(
        vendor = %profile.vendor,
        version = ?profile.version,
        platform = %profile.platform,
        ?caps,
        "detected capabilities"
    );
    caps
}

fn clang_like(probes: ExtensionProbes) -> CapabilitySet {
    CapabilitySet {
        has_deprecated: true,
        has_deprecated_with_message: probes.deprecated_with_message,
        has_unavailable_with_message: probes.unavailable_with_message,
        has_format: true,
        has_no_return: true,
        has_visibility: true,
        // nonnull is never enabled; the hook stays for sets built by hand
        has_non_null: false,
    }
}

fn gcc_like(version: Version) -> CapabilitySet {
    let modern = version.at_least(3, 0);
    let with_message = version.at_least(4, 5);
    CapabilitySet {
        has_deprecated: modern,
        has_deprecated_with_message: with_message,
        has_unavailable_with_message: false,
        has_format: modern,
        has_no_return: modern,
        has_visibility: modern,
        has_non_null: false,
    }
}
