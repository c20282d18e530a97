//! Identification from realistic `cc -dM -E` output.

use attrgate_facts::{build_mode, identify, parse_macro_dump};
use attrgate_model::build::BuildMode;
use attrgate_model::scheme::MacroScheme;
use attrgate_model::toolchain::{ExtensionProbes, Platform, Vendor, Version};

const GCC_12_LINUX: &str = r#"#define __DBL_MIN_EXP__ (-1021)
#define __UINT_LEAST16_MAX__ 0xffff
#define __GNUC__ 12
#define __GNUC_MINOR__ 2
#define __GNUC_PATCHLEVEL__ 0
#define __VERSION__ "12.2.0"
#define __INT64_C(c) c ## L
#define __linux__ 1
#define __unix__ 1
#define __FLT_EVAL_METHOD__ 0
"#;

const APPLE_CLANG: &str = r#"#define _LP64 1
#define __APPLE_CC__ 6000
#define __APPLE__ 1
#define __GNUC_MINOR__ 2
#define __GNUC__ 4
#define __VERSION__ "Apple LLVM 15.0.0 (clang-1500.0.40.1)"
#define __apple_build_version__ 15000040
#define __clang__ 1
#define __clang_major__ 15
#define __clang_minor__ 0
#define __has_include(x) 0
"#;

#[test]
fn gcc_dump_identifies_gcc() {
    let table = parse_macro_dump(GCC_12_LINUX).expect("parse dump");
    let profile = identify(&table, ExtensionProbes::none());
    assert_eq!(profile.vendor, Vendor::Gcc);
    assert_eq!(profile.version, Some(Version::new(12, 2)));
    assert_eq!(profile.platform, Platform::Other);
    assert_eq!(table.value("__VERSION__"), Some("\"12.2.0\""));
}

#[test]
fn apple_dump_identifies_apple_clang() {
    let table = parse_macro_dump(APPLE_CLANG).expect("parse dump");
    let profile = identify(&table, ExtensionProbes::all());
    assert_eq!(profile.vendor, Vendor::AppleClang);
    assert_eq!(profile.version, Some(Version::new(15, 0)));
    assert_eq!(profile.platform, Platform::Apple);
    assert_eq!(profile.probes, ExtensionProbes::all());
}

#[test]
fn old_gcc_minor_is_read() {
    let table = parse_macro_dump("#define __GNUC__ 4\n#define __GNUC_MINOR__ 4\n").unwrap();
    let profile = identify(&table, ExtensionProbes::none());
    assert_eq!(profile.version, Some(Version::new(4, 4)));
}

#[test]
fn empty_dump_is_unknown() {
    let table = parse_macro_dump("").unwrap();
    let profile = identify(&table, ExtensionProbes::none());
    assert_eq!(profile.vendor, Vendor::Unknown);
    assert_eq!(profile.version, None);
}

#[test]
fn undef_and_comments_are_honored() {
    let src = "// from a cross toolchain\n#define _WIN32 1\n\n#undef _WIN32\n";
    let table = parse_macro_dump(src).unwrap();
    assert!(!table.is_defined("_WIN32"));
    assert_eq!(identify(&table, ExtensionProbes::none()).vendor, Vendor::Unknown);
}

#[test]
fn build_switches_read_from_dump() {
    let src = "#define __GNUC__ 9\n#define _API_SOURCE 1\n";
    let table = parse_macro_dump(src).unwrap();
    assert_eq!(
        build_mode(&table, &MacroScheme::default()),
        BuildMode::library()
    );
}

#[test]
fn definition_lines_are_recorded() {
    let table = parse_macro_dump(GCC_12_LINUX).unwrap();
    assert_eq!(table.get("__GNUC__").map(|d| d.line), Some(3));
}
