use attrgate_model::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    // trivia / eof / error
    Eof,
    /// Error token (e.g., unterminated string, token limit exceeded)
    Error(String),
    // punctuation
    Hash,
    LParen,
    RParen,
    Comma,
    Ellipsis,
    /// Any other single character; only meaningful inside macro bodies.
    Punct(char),
    // idents / literals
    Ident(String),
    Int(u64),
    Str(String),
}

#[derive(Debug, Clone)]
pub struct Tok {
    pub kind: TokKind,
    pub span: Span,
}
