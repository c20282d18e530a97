//! Macro dump through to generated header.

use attrgate_facts::{build_mode, identify, parse_macro_dump};
use attrgate_model::annotation::AnnotationKind;
use attrgate_model::scheme::MacroScheme;
use attrgate_model::toolchain::ExtensionProbes;
use attrgate_resolve::{generate_header, resolve_all};

fn table_for(dump: &str, probes: ExtensionProbes) -> attrgate_resolve::ResolutionTable {
    let macros = parse_macro_dump(dump).expect("parse dump");
    let profile = identify(&macros, probes);
    let mode = build_mode(&macros, &MacroScheme::default());
    resolve_all(&profile, mode)
}

#[test]
fn gcc_4_4_drops_messages() {
    let t = table_for(
        "#define __GNUC__ 4\n#define __GNUC_MINOR__ 4\n",
        ExtensionProbes::none(),
    );
    let msg = t.get(AnnotationKind::DeprecatedWithMessage).unwrap();
    assert_eq!(
        msg.rendered,
        r#"__attribute__ ((deprecated)) __attribute__ ((visibility("default")))"#
    );
}

#[test]
fn apple_strict_consumer_gets_unavailable() {
    let dump = "#define __clang__ 1\n#define __APPLE__ 1\n#define _API_NO_DEPRECATED 1\n";
    let t = table_for(dump, ExtensionProbes::all());
    assert_eq!(
        t.get(AnnotationKind::Deprecated).unwrap().rendered,
        r#"__attribute__ ((unavailable)) __attribute__ ((visibility("default")))"#
    );
    assert_eq!(
        t.get(AnnotationKind::DeprecatedWithMessage).unwrap().rendered,
        r#"__attribute__ ((unavailable(m))) __attribute__ ((visibility("default")))"#
    );
}

#[test]
fn library_build_header_has_no_restrictions() {
    let dump = "#define __GNUC__ 12\n#define _API_SOURCE 1\n";
    let t = table_for(dump, ExtensionProbes::none());
    let header = generate_header(&t, &MacroScheme::default());
    assert!(header.contains(
        "#  define _API_INTERNAL_MSG(m) __attribute__ ((visibility(\"default\")))\n"
    ));
    assert!(!header.contains("__attribute__ ((deprecated"));
    assert!(header.contains("library_source=true"));
    assert!(header.contains(&t.fingerprint()));
}

#[test]
fn msvc_header_is_all_empty() {
    let t = table_for("#define _MSC_VER 1930\n#define _WIN32 1\n", ExtensionProbes::all());
    assert!(t.entries.iter().all(|e| e.rendered.is_empty()));
}

#[cfg(feature = "serde")]
#[test]
fn table_serializes() {
    let t = table_for("#define __GNUC__ 9\n", ExtensionProbes::none());
    let json = serde_json::to_value(&t).expect("serialize");
    assert_eq!(json["profile"]["vendor"], "gcc");
    assert_eq!(json["entries"].as_array().map(|a| a.len()), Some(9));
}

#[test]
fn escaped_message_renders_back_as_c_literal() {
    use attrgate_facts::parse_annotation;
    use attrgate_model::toolchain::ToolchainProfile;
    use attrgate_resolve::{detect, render_expansion, resolve};

    let profile = ToolchainProfile::gcc(5, 0);
    let caps = detect(&profile);
    let ann = parse_annotation(r#"DEPRECATED_MSG("\x41\102 \a")"#).expect("parse annotation");
    let r = resolve(
        &ann,
        &caps,
        attrgate_model::build::BuildMode::default(),
        profile.platform,
    );
    assert_eq!(
        render_expansion(&r.expansion),
        r#"__attribute__ ((deprecated("AB \007"))) __attribute__ ((visibility("default")))"#
    );
}
