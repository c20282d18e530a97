//! Toolchain identification from predefined macros.

use crate::macros::MacroTable;
use attrgate_model::build::BuildMode;
use attrgate_model::scheme::MacroScheme;
use attrgate_model::toolchain::{ExtensionProbes, Platform, ToolchainProfile, Vendor, Version};

/// Identify vendor, version and platform; first vendor match wins.
///
/// Clang also defines `__GNUC__`, so it must be checked first. Probe results
/// cannot be read from a macro dump and are passed in by the caller.
pub fn identify(macros: &MacroTable, probes: ExtensionProbes) -> ToolchainProfile {
    let (vendor, version) = if macros.is_defined("__clang__") {
        let vendor = if macros.is_defined("__apple_build_version__") {
            Vendor::AppleClang
        } else {
            Vendor::Clang
        };
        (vendor, version_of(macros, "__clang_major__", "__clang_minor__"))
    } else if macros.is_defined("__GNUC__") {
        (
            Vendor::Gcc,
            version_of(macros, "__GNUC__", "__GNUC_MINOR__"),
        )
    } else if macros.is_defined("_MSC_VER") || macros.is_defined("_WIN32") {
        (Vendor::Msvc, msc_version(macros))
    } else {
        (Vendor::Unknown, None)
    };

    let platform = if macros.is_defined("__APPLE__") {
        Platform::Apple
    } else if macros.is_defined("_WIN32") {
        Platform::Windows
    } else {
        Platform::Other
    };

    let profile = ToolchainProfile {
        vendor,
        version,
        platform,
        probes,
    };
    tracing::debug!(%profile, "identified toolchain");
    profile
}

/// Read the build-mode switches named by `scheme`.
pub fn build_mode(macros: &MacroTable, scheme: &MacroScheme) -> BuildMode {
    BuildMode {
        library_source: macros.is_defined(&scheme.library_source_macro()),
        exclude_deprecated: macros.is_defined(&scheme.no_deprecated_macro()),
    }
}

fn version_of(macros: &MacroTable, major: &str, minor: &str) -> Option<Version> {
    let major = u32::try_from(macros.int_value(major)?).ok()?;
    let minor = macros
        .int_value(minor)
        .and_then(|m| u32::try_from(m).ok())
        .unwrap_or(0);
    Some(Version::new(major, minor))
}

/// `_MSC_VER` encodes `major * 100 + minor`, e.g. 1930 is 19.30.
fn msc_version(macros: &MacroTable) -> Option<Version> {
    let v = u32::try_from(macros.int_value("_MSC_VER")?).ok()?;
    Some(Version::new(v / 100, v % 100))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(defs: &[(&str, &str)]) -> MacroTable {
        let mut t = MacroTable::new();
        for (name, value) in defs {
            t.define(name, value);
        }
        t
    }

    #[test]
    fn clang_wins_over_gnuc() {
        let t = table(&[
            ("__clang__", "1"),
            ("__clang_major__", "17"),
            ("__clang_minor__", "0"),
            ("__GNUC__", "4"),
            ("__GNUC_MINOR__", "2"),
        ]);
        let p = identify(&t, ExtensionProbes::none());
        assert_eq!(p.vendor, Vendor::Clang);
        assert_eq!(p.version, Some(Version::new(17, 0)));
    }

    #[test]
    fn apple_build_version_marks_apple_clang() {
        let t = table(&[
            ("__clang__", "1"),
            ("__apple_build_version__", "15000040"),
            ("__APPLE__", "1"),
        ]);
        let p = identify(&t, ExtensionProbes::none());
        assert_eq!(p.vendor, Vendor::AppleClang);
        assert_eq!(p.platform, Platform::Apple);
        assert_eq!(p.version, None);
    }

    #[test]
    fn msvc_version_split() {
        let t = table(&[("_MSC_VER", "1930"), ("_WIN32", "1")]);
        let p = identify(&t, ExtensionProbes::none());
        assert_eq!(p.vendor, Vendor::Msvc);
        assert_eq!(p.version, Some(Version::new(19, 30)));
        assert_eq!(p.platform, Platform::Windows);
    }

    #[test]
    fn mingw_is_gcc_on_windows() {
        let t = table(&[("__GNUC__", "13"), ("_WIN32", "1")]);
        let p = identify(&t, ExtensionProbes::none());
        assert_eq!(p.vendor, Vendor::Gcc);
        assert_eq!(p.platform, Platform::Windows);
        assert_eq!(p.version, Some(Version::new(13, 0)));
    }

    #[test]
    fn build_mode_from_switches() {
        let t = table(&[("_LIB_SOURCE", ""), ("_LIB_NO_DEPRECATED", "1")]);
        let mode = build_mode(&t, &MacroScheme::new("_LIB"));
        assert!(mode.library_source);
        assert!(mode.exclude_deprecated);
        assert_eq!(
            build_mode(&t, &MacroScheme::default()),
            BuildMode::default()
        );
    }
}
