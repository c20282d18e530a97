#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod identify;
mod lexer;
mod macros;
mod parser;
mod token;

pub use identify::{build_mode, identify};
pub use macros::{MacroDef, MacroTable};
pub use parser::{parse_annotation, parse_macro_dump};

/// Inputs larger than this are rejected before lexing.
pub const MAX_INPUT_SIZE: usize = 1_000_000;
