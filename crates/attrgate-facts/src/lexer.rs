use crate::token::{Tok, TokKind};
use attrgate_model::span::Span;

/// Maximum tokens a single lexer will produce before yielding an error token.
pub const MAX_TOKENS: usize = 4096;

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    produced: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            produced: 0,
        }
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.src.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }
    fn peek2(&self) -> Option<u8> {
        self.src.get(self.pos + 1).copied()
    }

    fn span(&self, start: usize) -> Span {
        Span {
            start: start as u32,
            end: self.pos as u32,
        }
    }

    fn tok(&self, kind: TokKind, start: usize) -> Tok {
        Tok {
            kind,
            span: self.span(start),
        }
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
                self.bump();
            }
            // line comment: //
            if self.peek() == Some(b'/') && self.peek2() == Some(b'/') {
                while let Some(b) = self.peek() {
                    if b == b'\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            // block comment: /* ... */ (an unterminated one runs to the end)
            if self.peek() == Some(b'/') && self.peek2() == Some(b'*') {
                self.bump();
                self.bump();
                while self.peek().is_some() {
                    if self.peek() == Some(b'*') && self.peek2() == Some(b'/') {
                        self.bump();
                        self.bump();
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            break;
        }
    }

    pub fn next_tok(&mut self) -> Tok {
        self.skip_ws_and_comments();
        let start = self.pos;

        if self.produced >= MAX_TOKENS {
            return self.tok(
                TokKind::Error(format!("token limit of {} exceeded", MAX_TOKENS)),
                start,
            );
        }

        let Some(b) = self.bump() else {
            return self.tok(TokKind::Eof, start);
        };
        self.produced += 1;

        // `...`
        if b == b'.' && self.peek() == Some(b'.') && self.peek2() == Some(b'.') {
            self.bump();
            self.bump();
            return self.tok(TokKind::Ellipsis, start);
        }

        let single = match b {
            b'#' => Some(TokKind::Hash),
            b'(' => Some(TokKind::LParen),
            b')' => Some(TokKind::RParen),
            b',' => Some(TokKind::Comma),
            _ => None,
        };
        if let Some(k) = single {
            return self.tok(k, start);
        }

        if b == b'"' {
            return self.lex_string(start);
        }

        if b.is_ascii_digit() {
            return self.lex_int(b, start);
        }

        // ident
        if b.is_ascii_alphabetic() || b == b'_' {
            while matches!(self.peek(), Some(p) if p.is_ascii_alphanumeric() || p == b'_') {
                self.bump();
            }
            let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
            return self.tok(TokKind::Ident(text), start);
        }

        // anything else is a lone punctuator; keep multi-byte chars whole
        let width = utf8_width(b);
        for _ in 1..width {
            self.bump();
        }
        let ch = std::str::from_utf8(&self.src[start..self.pos])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.tok(TokKind::Punct(ch), start)
    }

    fn lex_string(&mut self, start: usize) -> Tok {
        let mut bytes = Vec::new();
        loop {
            let Some(b) = self.bump() else {
                return self.tok(TokKind::Error("unterminated string literal".into()), start);
            };
            match b {
                b'"' => break,
                b'\n' => {
                    return self.tok(TokKind::Error("newline in string literal".into()), start);
                }
                b'\\' => match self.lex_escape() {
                    Ok(byte) => bytes.push(byte),
                    Err(msg) => return self.tok(TokKind::Error(msg), start),
                },
                other => bytes.push(other),
            }
        }
        match String::from_utf8(bytes) {
            Ok(s) => self.tok(TokKind::Str(s), start),
            Err(_) => self.tok(
                TokKind::Error("string literal is not valid UTF-8".into()),
                start,
            ),
        }
    }

    /// Decode one escape sequence; the backslash is already consumed.
    fn lex_escape(&mut self) -> Result<u8, String> {
        let Some(esc) = self.bump() else {
            return Err("unterminated string literal".into());
        };
        let byte = match esc {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'v' => 0x0b,
            b'\\' | b'\'' | b'"' | b'?' => esc,
            b'0'..=b'7' => {
                let mut value = u32::from(esc - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            self.bump();
                            value = value * 8 + u32::from(d - b'0');
                        }
                        _ => break,
                    }
                }
                u8::try_from(value)
                    .map_err(|_| format!("octal escape '\\{:o}' is out of range", value))?
            }
            b'x' => {
                let mut value: u32 = 0;
                let mut digits = 0;
                while let Some(d) = self.peek().and_then(|p| (p as char).to_digit(16)) {
                    self.bump();
                    // saturate so long runs still report out of range
                    value = value.saturating_mul(16).saturating_add(d);
                    digits += 1;
                }
                if digits == 0 {
                    return Err("'\\x' escape without hex digits".into());
                }
                u8::try_from(value).map_err(|_| "hex escape is out of range".to_string())?
            }
            other => {
                return Err(format!(
                    "unknown escape sequence '\\{}'",
                    char::from(other).escape_default()
                ))
            }
        };
        Ok(byte)
    }

    fn lex_int(&mut self, first: u8, start: usize) -> Tok {
        let hex = first == b'0' && matches!(self.peek(), Some(b'x' | b'X'));
        if hex {
            self.bump();
        }
        let digits_start = self.pos - usize::from(!hex);
        while matches!(self.peek(), Some(p) if p.is_ascii_hexdigit() && (hex || p.is_ascii_digit()))
        {
            self.bump();
        }
        let digits = String::from_utf8_lossy(&self.src[digits_start..self.pos]).into_owned();
        // integer suffixes: 1L, 0x10UL, ...
        while matches!(self.peek(), Some(b'u' | b'U' | b'l' | b'L')) {
            self.bump();
        }
        let radix = if hex { 16 } else { 10 };
        match u64::from_str_radix(&digits, radix) {
            Ok(v) => self.tok(TokKind::Int(v), start),
            Err(_) => self.tok(
                TokKind::Error(format!(
                    "invalid integer literal '{}'",
                    String::from_utf8_lossy(&self.src[start..self.pos])
                )),
                start,
            ),
        }
    }
}

fn utf8_width(first: u8) -> usize {
    match first {
        0xF0..=0xF7 => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}
