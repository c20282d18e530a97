use crate::lexer::Lexer;
use crate::macros::{MacroDef, MacroTable};
use crate::token::{Tok, TokKind};
use crate::MAX_INPUT_SIZE;
use anyhow::{bail, Context, Result};
use attrgate_model::annotation::{Annotation, AnnotationKind, Arg, Arity};

// ======= predefined-macro dumps =======

/// Parse the output of `cc -dM -E -x c /dev/null`.
///
/// Accepts `#define`, `#undef`, blank lines and comments; anything else is
/// rejected with its line number.
pub fn parse_macro_dump(src: &str) -> Result<MacroTable> {
    if src.len() > MAX_INPUT_SIZE {
        bail!(
            "macro dump exceeds {} bytes ({} bytes)",
            MAX_INPUT_SIZE,
            src.len()
        );
    }

    let mut table = MacroTable::new();
    for (idx, line) in src.lines().enumerate() {
        let lineno = idx as u32 + 1;
        parse_directive(line, lineno, &mut table).with_context(|| format!("line {}", lineno))?;
    }
    tracing::debug!(macros = table.len(), "parsed macro dump");
    Ok(table)
}

fn parse_directive(line: &str, lineno: u32, table: &mut MacroTable) -> Result<()> {
    let mut lex = Lexer::new(line);
    let first = lex.next_tok();
    match first.kind {
        TokKind::Eof => return Ok(()),
        TokKind::Hash => {}
        TokKind::Error(msg) => bail!("{}", msg),
        other => bail!("expected directive, found {:?}", other),
    }

    let directive = lex.next_tok();
    let name = lex.next_tok();
    let name_text = match name.kind {
        TokKind::Ident(s) => s,
        other => bail!("expected macro name, found {:?}", other),
    };

    match &directive.kind {
        TokKind::Ident(d) if d == "define" => {}
        TokKind::Ident(d) if d == "undef" => {
            table.undef(&name_text);
            return Ok(());
        }
        other => bail!("unsupported directive {:?}", other),
    }

    // function-like only when '(' directly follows the name
    let mut body_start = name.span.end as usize;
    let params = if line.as_bytes().get(body_start) == Some(&b'(') {
        let open = lex.next_tok();
        debug_assert!(matches!(open.kind, TokKind::LParen));
        let mut params = Vec::new();
        loop {
            let t = lex.next_tok();
            match t.kind {
                TokKind::RParen => {
                    body_start = t.span.end as usize;
                    break;
                }
                TokKind::Ident(p) => params.push(p),
                TokKind::Ellipsis => params.push("...".to_string()),
                TokKind::Comma => {}
                TokKind::Eof => bail!("unterminated parameter list for '{}'", name_text),
                other => bail!("unexpected {:?} in parameter list of '{}'", other, name_text),
            }
        }
        Some(params)
    } else {
        None
    };

    table.insert(
        &name_text,
        MacroDef {
            params,
            value: line[body_start..].trim().to_string(),
            line: lineno,
        },
    );
    Ok(())
}

// ======= annotation expressions =======

/// Parse a declaration-site annotation such as `_API_FORMAT(2, 3)` or
/// `DEPRECATED_MSG("use bar")`.
pub fn parse_annotation(src: &str) -> Result<Annotation> {
    if src.len() > MAX_INPUT_SIZE {
        bail!(
            "annotation exceeds {} bytes ({} bytes)",
            MAX_INPUT_SIZE,
            src.len()
        );
    }
    let mut p = Parser::new(src);
    let annotation = p.parse_annotation()?;
    if !matches!(p.cur.kind, TokKind::Eof) {
        bail!("unexpected trailing {:?}", p.cur.kind);
    }
    Ok(annotation)
}

struct Parser<'a> {
    lex: Lexer<'a>,
    cur: Tok,
    nxt: Tok,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let mut lex = Lexer::new(src);
        let cur = lex.next_tok();
        let nxt = lex.next_tok();
        Self { lex, cur, nxt }
    }

    fn bump(&mut self) {
        self.cur = std::mem::replace(&mut self.nxt, self.lex.next_tok());
    }

    fn at(&self, k: &TokKind) -> bool {
        std::mem::discriminant(&self.cur.kind) == std::mem::discriminant(k)
    }

    fn expect(&mut self, k: TokKind) -> Result<Tok> {
        if let TokKind::Error(msg) = &self.cur.kind {
            bail!("{}", msg);
        }
        if self.at(&k) {
            let t = self.cur.clone();
            self.bump();
            Ok(t)
        } else {
            bail!("expected {:?}, found {:?}", k, self.cur.kind)
        }
    }

    fn parse_annotation(&mut self) -> Result<Annotation> {
        let name = match &self.cur.kind {
            TokKind::Ident(s) => s.clone(),
            TokKind::Error(msg) => bail!("{}", msg),
            other => bail!("expected annotation name, found {:?}", other),
        };
        let Some(kind) = AnnotationKind::from_macro_name(&name) else {
            bail!("unknown annotation '{}'", name);
        };
        self.bump();

        if kind.arity() == Arity::None {
            if self.at(&TokKind::LParen) {
                bail!("{} takes no arguments", kind);
            }
            return Ok(Annotation::template(kind));
        }

        self.expect(TokKind::LParen)?;
        let annotation = match kind {
            AnnotationKind::DeprecatedWithMessage => {
                Annotation::DeprecatedWithMessage(self.parse_message(kind)?)
            }
            AnnotationKind::InternalWithMessage => {
                Annotation::InternalWithMessage(self.parse_message(kind)?)
            }
            AnnotationKind::Format => {
                let format_index = self.parse_index()?;
                self.expect(TokKind::Comma)?;
                let first_arg = self.parse_index_or_zero()?;
                check_format_indices(&format_index, &first_arg)?;
                Annotation::Format {
                    format_index,
                    first_arg,
                }
            }
            _ => Annotation::NonNull(self.parse_index_list()?),
        };
        self.expect(TokKind::RParen)?;
        Ok(annotation)
    }

    /// One string (adjacent literals concatenate) or a macro parameter.
    fn parse_message(&mut self, kind: AnnotationKind) -> Result<Arg> {
        match &self.cur.kind {
            TokKind::Str(_) => {
                let mut text = String::new();
                while let TokKind::Str(s) = &self.cur.kind {
                    text.push_str(s);
                    self.bump();
                }
                Ok(Arg::Str(text))
            }
            TokKind::Ident(p) => {
                let arg = Arg::Param(p.clone());
                self.bump();
                Ok(arg)
            }
            TokKind::RParen => bail!("{} requires a message", kind),
            TokKind::Error(msg) => bail!("{}", msg),
            other => bail!("expected string message, found {:?}", other),
        }
    }

    fn parse_index(&mut self) -> Result<Arg> {
        match self.parse_index_or_zero()? {
            Arg::Index(0) => bail!("argument indices start at 1"),
            arg => Ok(arg),
        }
    }

    fn parse_index_or_zero(&mut self) -> Result<Arg> {
        let arg = match &self.cur.kind {
            TokKind::Int(v) => match u32::try_from(*v) {
                Ok(i) => Arg::Index(i),
                Err(_) => bail!("argument index {} out of range", v),
            },
            TokKind::Ident(p) => Arg::Param(p.clone()),
            TokKind::Error(msg) => bail!("{}", msg),
            other => bail!("expected argument index, found {:?}", other),
        };
        self.bump();
        Ok(arg)
    }

    /// `1, 2, 3`, optionally wrapped in an extra pair of parentheses.
    fn parse_index_list(&mut self) -> Result<Vec<Arg>> {
        let wrapped = self.at(&TokKind::LParen);
        if wrapped {
            self.bump();
        }
        let mut out = Vec::new();
        if !self.at(&TokKind::RParen) {
            out.push(self.parse_index()?);
            while self.at(&TokKind::Comma) {
                self.bump();
                out.push(self.parse_index()?);
            }
        }
        if wrapped {
            self.expect(TokKind::RParen)?;
        }
        Ok(out)
    }
}

/// The variadic index is 0 (nothing to check) or follows the format string.
fn check_format_indices(format_index: &Arg, first_arg: &Arg) -> Result<()> {
    if let (Arg::Index(f), Arg::Index(a)) = (format_index, first_arg) {
        if *a != 0 && *a <= *f {
            bail!(
                "first variadic argument ({}) must come after the format argument ({})",
                a,
                f
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_with_empty_body() {
        let t = parse_macro_dump("#define __APPLE__").unwrap();
        assert_eq!(t.value("__APPLE__"), Some(""));
    }

    #[test]
    fn object_like_with_space_before_paren() {
        let t = parse_macro_dump("#define X (1)").unwrap();
        let def = t.get("X").unwrap();
        assert!(def.params.is_none());
        assert_eq!(def.value, "(1)");
    }

    #[test]
    fn function_like_params() {
        let t = parse_macro_dump("#define __INT64_C(c) c ## L").unwrap();
        let def = t.get("__INT64_C").unwrap();
        assert_eq!(def.params.as_deref(), Some(&["c".to_string()][..]));
        assert_eq!(def.value, "c ## L");
        assert_eq!(t.int_value("__INT64_C"), None);
    }

    #[test]
    fn format_zero_first_arg_allowed() {
        assert_eq!(
            parse_annotation("FORMAT(1, 0)").unwrap(),
            Annotation::format(1, 0)
        );
    }
}
