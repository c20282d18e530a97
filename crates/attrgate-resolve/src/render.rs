//! GNU attribute spelling for resolved tokens.

use attrgate_model::annotation::Arg;
use attrgate_model::expansion::{AttrToken, Expansion, Visibility};
use std::fmt::Write;

pub fn render_arg(arg: &Arg) -> String {
    match arg {
        Arg::Str(s) => c_string_literal(s),
        Arg::Index(i) => i.to_string(),
        Arg::Param(p) => p.clone(),
    }
}

fn render_args(args: &[Arg]) -> String {
    args.iter().map(render_arg).collect::<Vec<_>>().join(", ")
}

fn with_optional_message(name: &str, message: &Option<Arg>) -> String {
    match message {
        Some(m) => format!("__attribute__ (({}({})))", name, render_arg(m)),
        None => format!("__attribute__ (({}))", name),
    }
}

pub fn render_token(token: &AttrToken) -> String {
    match token {
        AttrToken::Visibility(Visibility::Default) => {
            r#"__attribute__ ((visibility("default")))"#.to_string()
        }
        AttrToken::Visibility(Visibility::Hidden) => {
            r#"__attribute__ ((visibility("hidden")))"#.to_string()
        }
        AttrToken::Deprecated(m) => with_optional_message("deprecated", m),
        AttrToken::Unavailable(m) => with_optional_message("unavailable", m),
        AttrToken::Format {
            format_index,
            first_arg,
        } => format!(
            "__attribute__ ((__format__(__printf__, {}, {})))",
            render_arg(format_index),
            render_arg(first_arg)
        ),
        AttrToken::NonNull(args) => format!("__attribute__ ((nonnull({})))", render_args(args)),
        AttrToken::NoReturn => "__attribute__ ((noreturn))".to_string(),
    }
}

/// Space-separated tokens; the empty expansion renders as "".
pub fn render_expansion(expansion: &Expansion) -> String {
    expansion
        .tokens()
        .iter()
        .map(render_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote `s` as a C string literal.
pub fn c_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            // octal, since hex escapes would swallow following hex digits
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
