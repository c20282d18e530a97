//! Where the toolchain facts and build mode come from.

use anyhow::{bail, Context, Result};
use attrgate_facts::{build_mode, identify, parse_macro_dump, MAX_INPUT_SIZE};
use attrgate_model::build::BuildMode;
use attrgate_model::scheme::{MacroScheme, DEFAULT_PREFIX};
use attrgate_model::toolchain::{
    Extension, ExtensionProbes, Platform, ToolchainProfile, Vendor, Version,
};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Predefined-macro dump (`cc -dM -E -x c /dev/null`); `-` reads stdin
    #[arg(long, value_name = "FILE", conflicts_with = "vendor")]
    pub facts: Option<PathBuf>,

    /// Compiler vendor: clang, apple-clang, gcc, msvc, unknown
    #[arg(long)]
    pub vendor: Option<Vendor>,

    /// Compiler version as major[.minor]
    #[arg(long, requires = "vendor")]
    pub version: Option<Version>,

    /// Target platform: apple, windows, other (defaults to the vendor's own)
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Extension reported by `__has_extension` (repeatable):
    /// deprecated-with-message, unavailable-with-message
    #[arg(long = "extension", value_name = "NAME")]
    pub extensions: Vec<Extension>,

    /// Compiling the library's own source
    #[arg(
        long,
        env = "ATTRGATE_LIBRARY_SOURCE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub library_source: bool,

    /// Exclude the deprecated API surface
    #[arg(
        long,
        env = "ATTRGATE_NO_DEPRECATED",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_deprecated: bool,

    /// Prefix of the emitted macros and of the build-switch macros
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,
}

/// Everything resolution needs, gathered once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facts {
    pub profile: ToolchainProfile,
    pub mode: BuildMode,
    pub scheme: MacroScheme,
}

impl ProfileArgs {
    pub fn scheme(&self) -> MacroScheme {
        MacroScheme::new(&self.prefix)
    }

    fn probes(&self) -> ExtensionProbes {
        self.extensions.iter().copied().collect()
    }

    fn flag_mode(&self) -> BuildMode {
        BuildMode::new(self.library_source, self.no_deprecated)
    }

    /// Build the facts from a macro dump or from explicit flags.
    ///
    /// Build switches found in a dump are OR'ed with the flags; an explicit
    /// `--platform` overrides the platform read from the dump.
    pub fn load(&self) -> Result<Facts> {
        let scheme = self.scheme();
        let (mut profile, mode) = match &self.facts {
            Some(path) => {
                let src = read_facts(path)?;
                let macros = parse_macro_dump(&src)
                    .with_context(|| format!("parsing macro dump '{}'", path.display()))?;
                let profile = identify(&macros, self.probes());
                let mode = build_mode(&macros, &scheme).union(self.flag_mode());
                (profile, mode)
            }
            None => {
                let Some(vendor) = self.vendor else {
                    bail!("either --facts or --vendor is required");
                };
                let profile =
                    ToolchainProfile::new(vendor, self.version, vendor.default_platform())
                        .with_probes(self.probes());
                (profile, self.flag_mode())
            }
        };
        if let Some(platform) = self.platform {
            profile = profile.with_platform(platform);
        }
        tracing::debug!(%profile, %mode, prefix = %scheme.prefix, "loaded facts");
        Ok(Facts {
            profile,
            mode,
            scheme,
        })
    }
}

fn read_facts(path: &Path) -> Result<String> {
    let src = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading macro dump from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read facts file '{}'", path.display()))?
    };
    if src.len() > MAX_INPUT_SIZE {
        bail!(
            "facts file exceeds {}MB limit ({} bytes)",
            MAX_INPUT_SIZE / 1_000_000,
            src.len()
        );
    }
    Ok(src)
}
