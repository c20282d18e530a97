#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod detect;
pub mod header;
pub mod render;
mod resolver;
pub mod rules;
mod table;

pub use detect::detect;
pub use header::generate_header;
pub use render::{render_expansion, render_token};
pub use resolver::{public_expansion, resolve, Resolution};
pub use rules::{Outcome, RuleId, RuleInput};
pub use table::{resolve_all, KindResolution, ResolutionTable};

// Short names for dependents that only need the resolution surface.
pub mod prelude {
    pub use attrgate_model::annotation::{Annotation, AnnotationKind, Arg, ALL_KINDS};
    pub use attrgate_model::build::BuildMode;
    pub use attrgate_model::caps::CapabilitySet;
    pub use attrgate_model::expansion::{AttrToken, Expansion, Visibility};
    pub use attrgate_model::toolchain::{Platform, ToolchainProfile, Vendor, Version};

    pub use crate::{detect, resolve, resolve_all, Resolution, ResolutionTable};
}
