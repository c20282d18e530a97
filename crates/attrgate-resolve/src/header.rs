//! C header emission for a resolved table.

use crate::table::ResolutionTable;
use attrgate_model::scheme::MacroScheme;
use std::fmt::Write;

/// Render `table` as a self-contained C header defining one macro per kind.
pub fn generate_header(table: &ResolutionTable, scheme: &MacroScheme) -> String {
    let guard = scheme.guard_macro();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "//");
    let _ = writeln!(out, "// Generated by attrgate. Do not edit.");
    let _ = writeln!(out, "//");
    let _ = writeln!(out, "// toolchain:   {}", table.profile);
    let _ = writeln!(out, "// build mode:  {}", table.mode);
    let _ = writeln!(out, "// fingerprint: {}", table.fingerprint());
    let _ = writeln!(out, "//");
    let _ = writeln!(out);
    let _ = writeln!(out, "#ifndef {}", guard);
    let _ = writeln!(out, "#  define {}", guard);
    let _ = writeln!(out);

    for entry in &table.entries {
        let name = format!(
            "{}{}",
            scheme.macro_name(entry.kind),
            entry.kind.arity().macro_params()
        );
        if entry.rendered.is_empty() {
            let _ = writeln!(out, "#  define {}", name);
        } else {
            let _ = writeln!(out, "#  define {} {}", name, entry.rendered);
        }
    }

    let _ = writeln!(out, "#endif // !{}", guard);
    out
}
