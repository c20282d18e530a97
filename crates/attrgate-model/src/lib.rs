pub mod span {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Span {
        pub start: u32,
        pub end: u32,
    }
}

/// Error returned when a textual name does not map to a known model value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    pub what: &'static str,
    pub input: String,
}

impl std::fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "unknown {} '{}'", self.what, self.input)
    }
}

impl std::error::Error for ParseNameError {}

pub mod toolchain {
    use super::ParseNameError;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Vendor {
        Clang,
        /// Apple's distribution of Clang.
        AppleClang,
        Gcc,
        Msvc,
        Unknown,
    }

    impl Vendor {
        /// Compilers that answer `__has_extension` probes.
        pub fn is_clang_like(self) -> bool {
            matches!(self, Vendor::Clang | Vendor::AppleClang)
        }

        /// Platform assumed when only the vendor is known.
        pub const fn default_platform(self) -> Platform {
            match self {
                Vendor::AppleClang => Platform::Apple,
                Vendor::Msvc => Platform::Windows,
                Vendor::Clang | Vendor::Gcc | Vendor::Unknown => Platform::Other,
            }
        }

        pub fn name(self) -> &'static str {
            match self {
                Vendor::Clang => "clang",
                Vendor::AppleClang => "apple-clang",
                Vendor::Gcc => "gcc",
                Vendor::Msvc => "msvc",
                Vendor::Unknown => "unknown",
            }
        }
    }

    impl fmt::Display for Vendor {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl FromStr for Vendor {
        type Err = ParseNameError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_ascii_lowercase().as_str() {
                "clang" => Ok(Vendor::Clang),
                "apple-clang" | "appleclang" => Ok(Vendor::AppleClang),
                "gcc" | "gnu" => Ok(Vendor::Gcc),
                "msvc" | "cl" => Ok(Vendor::Msvc),
                "unknown" | "other" => Ok(Vendor::Unknown),
                _ => Err(ParseNameError {
                    what: "vendor",
                    input: s.to_string(),
                }),
            }
        }
    }

    /// Compiler version as `major.minor`; any patch component is ignored.
    #[derive(
        Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    pub struct Version {
        pub major: u32,
        pub minor: u32,
    }

    impl Version {
        pub const fn new(major: u32, minor: u32) -> Self {
            Self { major, minor }
        }

        #[inline]
        pub fn at_least(self, major: u32, minor: u32) -> bool {
            self >= Version::new(major, minor)
        }
    }

    impl fmt::Display for Version {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }

    impl FromStr for Version {
        type Err = ParseNameError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let err = || ParseNameError {
                what: "version",
                input: s.to_string(),
            };
            let mut parts = s.trim().split('.');
            let major = parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or_else(err)?;
            let minor = match parts.next() {
                Some(p) => p.parse::<u32>().map_err(|_| err())?,
                None => 0,
            };
            // patch level is accepted and dropped
            if let Some(p) = parts.next() {
                p.parse::<u32>().map_err(|_| err())?;
            }
            if parts.next().is_some() {
                return Err(err());
            }
            Ok(Version { major, minor })
        }
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Platform {
        Apple,
        Windows,
        #[default]
        Other,
    }

    impl Platform {
        #[inline]
        pub fn is_apple(self) -> bool {
            self == Platform::Apple
        }

        pub fn name(self) -> &'static str {
            match self {
                Platform::Apple => "apple",
                Platform::Windows => "windows",
                Platform::Other => "other",
            }
        }
    }

    impl fmt::Display for Platform {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl FromStr for Platform {
        type Err = ParseNameError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_ascii_lowercase().as_str() {
                "apple" | "darwin" | "macos" => Ok(Platform::Apple),
                "windows" | "win32" => Ok(Platform::Windows),
                "other" | "linux" | "unix" => Ok(Platform::Other),
                _ => Err(ParseNameError {
                    what: "platform",
                    input: s.to_string(),
                }),
            }
        }
    }

    /// Compiler sub-features that only a `__has_extension` probe can report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Extension {
        DeprecatedWithMessage,
        UnavailableWithMessage,
    }

    impl FromStr for Extension {
        type Err = ParseNameError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "deprecated-with-message" | "attribute_deprecated_with_message" => {
                    Ok(Extension::DeprecatedWithMessage)
                }
                "unavailable-with-message" | "attribute_unavailable_with_message" => {
                    Ok(Extension::UnavailableWithMessage)
                }
                _ => Err(ParseNameError {
                    what: "extension",
                    input: s.to_string(),
                }),
            }
        }
    }

    /// Results of the extension probes; absent means not reported.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ExtensionProbes {
        pub deprecated_with_message: bool,
        pub unavailable_with_message: bool,
    }

    impl ExtensionProbes {
        pub const fn none() -> Self {
            Self {
                deprecated_with_message: false,
                unavailable_with_message: false,
            }
        }

        pub const fn all() -> Self {
            Self {
                deprecated_with_message: true,
                unavailable_with_message: true,
            }
        }

        pub fn with(mut self, ext: Extension) -> Self {
            match ext {
                Extension::DeprecatedWithMessage => self.deprecated_with_message = true,
                Extension::UnavailableWithMessage => self.unavailable_with_message = true,
            }
            self
        }
    }

    impl FromIterator<Extension> for ExtensionProbes {
        fn from_iter<I: IntoIterator<Item = Extension>>(iter: I) -> Self {
            iter.into_iter().fold(Self::none(), Self::with)
        }
    }

    /// Identification facts about the active compiler.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ToolchainProfile {
        pub vendor: Vendor,
        pub version: Option<Version>,
        pub platform: Platform,
        pub probes: ExtensionProbes,
    }

    impl ToolchainProfile {
        pub const fn new(vendor: Vendor, version: Option<Version>, platform: Platform) -> Self {
            Self {
                vendor,
                version,
                platform,
                probes: ExtensionProbes::none(),
            }
        }

        pub const fn clang() -> Self {
            Self::new(Vendor::Clang, None, Vendor::Clang.default_platform())
        }

        pub const fn apple_clang() -> Self {
            Self::new(Vendor::AppleClang, None, Vendor::AppleClang.default_platform())
        }

        pub const fn gcc(major: u32, minor: u32) -> Self {
            Self::new(
                Vendor::Gcc,
                Some(Version::new(major, minor)),
                Vendor::Gcc.default_platform(),
            )
        }

        pub const fn msvc() -> Self {
            Self::new(Vendor::Msvc, None, Vendor::Msvc.default_platform())
        }

        pub const fn unknown() -> Self {
            Self::new(Vendor::Unknown, None, Vendor::Unknown.default_platform())
        }

        pub fn with_platform(mut self, platform: Platform) -> Self {
            self.platform = platform;
            self
        }

        pub fn with_version(mut self, version: Version) -> Self {
            self.version = Some(version);
            self
        }

        pub fn with_probes(mut self, probes: ExtensionProbes) -> Self {
            self.probes = probes;
            self
        }
    }

    impl fmt::Display for ToolchainProfile {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.vendor)?;
            if let Some(v) = self.version {
                write!(f, " {}", v)?;
            }
            write!(f, " (platform: {})", self.platform)
        }
    }
}

pub mod build {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// The two compile-time switches set by the build configuration.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BuildMode {
        /// Compiling the library's own implementation.
        pub library_source: bool,
        /// Consumer opted out of the deprecated API surface.
        pub exclude_deprecated: bool,
    }

    impl BuildMode {
        pub const fn new(library_source: bool, exclude_deprecated: bool) -> Self {
            Self {
                library_source,
                exclude_deprecated,
            }
        }

        pub const fn library() -> Self {
            Self::new(true, false)
        }

        pub const fn strict() -> Self {
            Self::new(false, true)
        }

        /// Every combination of the two switches.
        pub const fn all() -> [BuildMode; 4] {
            [
                Self::new(false, false),
                Self::new(false, true),
                Self::new(true, false),
                Self::new(true, true),
            ]
        }

        pub fn union(self, other: BuildMode) -> Self {
            Self {
                library_source: self.library_source || other.library_source,
                exclude_deprecated: self.exclude_deprecated || other.exclude_deprecated,
            }
        }
    }

    impl fmt::Display for BuildMode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "library_source={} exclude_deprecated={}",
                self.library_source, self.exclude_deprecated
            )
        }
    }
}

pub mod caps {
    use serde::{Deserialize, Serialize};

    /// What a toolchain can express in its attribute syntax.
    ///
    /// `has_deprecated_with_message` implies `has_deprecated` for every
    /// detected profile; the struct itself does not enforce it so that
    /// arbitrary sets can be fed to the resolver.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CapabilitySet {
        pub has_deprecated: bool,
        pub has_deprecated_with_message: bool,
        pub has_unavailable_with_message: bool,
        pub has_format: bool,
        pub has_no_return: bool,
        pub has_visibility: bool,
        pub has_non_null: bool,
    }

    pub const CAPABILITY_COUNT: usize = 7;

    impl CapabilitySet {
        pub const fn none() -> Self {
            Self {
                has_deprecated: false,
                has_deprecated_with_message: false,
                has_unavailable_with_message: false,
                has_format: false,
                has_no_return: false,
                has_visibility: false,
                has_non_null: false,
            }
        }

        /// Build a set from a bitmask in `flags()` order.
        pub const fn from_bits(bits: u8) -> Self {
            Self {
                has_deprecated: bits & 1 != 0,
                has_deprecated_with_message: bits & (1 << 1) != 0,
                has_unavailable_with_message: bits & (1 << 2) != 0,
                has_format: bits & (1 << 3) != 0,
                has_no_return: bits & (1 << 4) != 0,
                has_visibility: bits & (1 << 5) != 0,
                has_non_null: bits & (1 << 6) != 0,
            }
        }

        pub fn is_empty(&self) -> bool {
            *self == Self::none()
        }

        pub fn is_consistent(&self) -> bool {
            !self.has_deprecated_with_message || self.has_deprecated
        }

        pub fn flags(&self) -> [(&'static str, bool); CAPABILITY_COUNT] {
            [
                ("deprecated", self.has_deprecated),
                ("deprecated_with_message", self.has_deprecated_with_message),
                ("unavailable_with_message", self.has_unavailable_with_message),
                ("format", self.has_format),
                ("no_return", self.has_no_return),
                ("visibility", self.has_visibility),
                ("non_null", self.has_non_null),
            ]
        }
    }
}

pub mod annotation {
    use super::ParseNameError;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    /// Shape of the arguments a kind's macro takes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Arity {
        None,
        Message,
        IndexPair,
        IndexList,
    }

    impl Arity {
        /// Parameter list used when the kind is emitted as a C macro.
        pub fn macro_params(self) -> &'static str {
            match self {
                Arity::None => "",
                Arity::Message => "(m)",
                Arity::IndexPair => "(a,b)",
                Arity::IndexList => "(...)",
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum AnnotationKind {
        Deprecated,
        DeprecatedWithMessage,
        InternalWithMessage,
        Format,
        NonNull,
        NoReturn,
        Internal,
        Private,
        Public,
    }

    /// All kinds, in header order.
    pub const ALL_KINDS: &[AnnotationKind] = &[
        AnnotationKind::Deprecated,
        AnnotationKind::DeprecatedWithMessage,
        AnnotationKind::InternalWithMessage,
        AnnotationKind::Format,
        AnnotationKind::NonNull,
        AnnotationKind::NoReturn,
        AnnotationKind::Internal,
        AnnotationKind::Private,
        AnnotationKind::Public,
    ];

    impl AnnotationKind {
        /// Macro name suffix, e.g. `DEPRECATED_MSG` in `_API_DEPRECATED_MSG`.
        pub fn suffix(self) -> &'static str {
            match self {
                AnnotationKind::Deprecated => "DEPRECATED",
                AnnotationKind::DeprecatedWithMessage => "DEPRECATED_MSG",
                AnnotationKind::InternalWithMessage => "INTERNAL_MSG",
                AnnotationKind::Format => "FORMAT",
                AnnotationKind::NonNull => "NONNULL",
                AnnotationKind::NoReturn => "NORETURN",
                AnnotationKind::Internal => "INTERNAL",
                AnnotationKind::Private => "PRIVATE",
                AnnotationKind::Public => "PUBLIC",
            }
        }

        pub fn arity(self) -> Arity {
            match self {
                AnnotationKind::DeprecatedWithMessage | AnnotationKind::InternalWithMessage => {
                    Arity::Message
                }
                AnnotationKind::Format => Arity::IndexPair,
                AnnotationKind::NonNull => Arity::IndexList,
                _ => Arity::None,
            }
        }

        /// Kinds whose expansion always ends with the `Public` expansion.
        pub fn implies_public(self) -> bool {
            matches!(
                self,
                AnnotationKind::Deprecated
                    | AnnotationKind::DeprecatedWithMessage
                    | AnnotationKind::InternalWithMessage
            )
        }

        pub fn from_suffix(suffix: &str) -> Option<AnnotationKind> {
            ALL_KINDS.iter().copied().find(|k| k.suffix() == suffix)
        }

        /// Match a full macro name such as `_API_FORMAT` or a bare `FORMAT`.
        ///
        /// The longest matching suffix wins, so `X_DEPRECATED_MSG` is never
        /// taken for a prefixed `MSG`.
        pub fn from_macro_name(name: &str) -> Option<AnnotationKind> {
            if let Some(kind) = Self::from_suffix(name) {
                return Some(kind);
            }
            ALL_KINDS
                .iter()
                .copied()
                .filter(|k| {
                    name.strip_suffix(k.suffix())
                        .is_some_and(|head| head.ends_with('_'))
                })
                .max_by_key(|k| k.suffix().len())
        }
    }

    impl fmt::Display for AnnotationKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.suffix())
        }
    }

    impl FromStr for AnnotationKind {
        type Err = ParseNameError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::from_macro_name(&s.to_ascii_uppercase()).ok_or_else(|| ParseNameError {
                what: "annotation kind",
                input: s.to_string(),
            })
        }
    }

    /// One argument at a declaration site.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Arg {
        /// A string literal message (unescaped contents).
        Str(String),
        /// A 1-based argument index.
        Index(u32),
        /// A macro parameter, spliced verbatim.
        Param(String),
    }

    impl Arg {
        pub fn param(name: &str) -> Self {
            Arg::Param(name.to_string())
        }
    }

    /// An annotation occurrence: a kind together with its arguments.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Annotation {
        Deprecated,
        DeprecatedWithMessage(Arg),
        InternalWithMessage(Arg),
        Format { format_index: Arg, first_arg: Arg },
        NonNull(Vec<Arg>),
        NoReturn,
        Internal,
        Private,
        Public,
    }

    impl Annotation {
        pub fn deprecated_msg(msg: impl Into<String>) -> Self {
            Annotation::DeprecatedWithMessage(Arg::Str(msg.into()))
        }

        pub fn internal_msg(msg: impl Into<String>) -> Self {
            Annotation::InternalWithMessage(Arg::Str(msg.into()))
        }

        pub fn format(format_index: u32, first_arg: u32) -> Self {
            Annotation::Format {
                format_index: Arg::Index(format_index),
                first_arg: Arg::Index(first_arg),
            }
        }

        pub fn non_null<I: IntoIterator<Item = u32>>(indices: I) -> Self {
            Annotation::NonNull(indices.into_iter().map(Arg::Index).collect())
        }

        /// The annotation as it appears in a macro definition, with the
        /// kind's parameters standing in for concrete arguments.
        pub fn template(kind: AnnotationKind) -> Self {
            match kind {
                AnnotationKind::Deprecated => Annotation::Deprecated,
                AnnotationKind::DeprecatedWithMessage => {
                    Annotation::DeprecatedWithMessage(Arg::param("m"))
                }
                AnnotationKind::InternalWithMessage => {
                    Annotation::InternalWithMessage(Arg::param("m"))
                }
                AnnotationKind::Format => Annotation::Format {
                    format_index: Arg::param("a"),
                    first_arg: Arg::param("b"),
                },
                AnnotationKind::NonNull => Annotation::NonNull(vec![Arg::param("__VA_ARGS__")]),
                AnnotationKind::NoReturn => Annotation::NoReturn,
                AnnotationKind::Internal => Annotation::Internal,
                AnnotationKind::Private => Annotation::Private,
                AnnotationKind::Public => Annotation::Public,
            }
        }

        pub fn kind(&self) -> AnnotationKind {
            match self {
                Annotation::Deprecated => AnnotationKind::Deprecated,
                Annotation::DeprecatedWithMessage(_) => AnnotationKind::DeprecatedWithMessage,
                Annotation::InternalWithMessage(_) => AnnotationKind::InternalWithMessage,
                Annotation::Format { .. } => AnnotationKind::Format,
                Annotation::NonNull(_) => AnnotationKind::NonNull,
                Annotation::NoReturn => AnnotationKind::NoReturn,
                Annotation::Internal => AnnotationKind::Internal,
                Annotation::Private => AnnotationKind::Private,
                Annotation::Public => AnnotationKind::Public,
            }
        }
    }
}

pub mod expansion {
    use super::annotation::Arg;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Visibility {
        Default,
        Hidden,
    }

    /// One opaque attribute attached to a declaration.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum AttrToken {
        Visibility(Visibility),
        Deprecated(Option<Arg>),
        Unavailable(Option<Arg>),
        Format { format_index: Arg, first_arg: Arg },
        NonNull(Vec<Arg>),
        NoReturn,
    }

    /// Ordered attribute tokens chosen for one annotation occurrence.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Expansion {
        tokens: Vec<AttrToken>,
    }

    impl Expansion {
        pub const fn empty() -> Self {
            Self { tokens: Vec::new() }
        }

        pub fn single(token: AttrToken) -> Self {
            Self {
                tokens: vec![token],
            }
        }

        pub fn push(&mut self, token: AttrToken) {
            self.tokens.push(token);
        }

        /// Concatenate another expansion after this one.
        pub fn then(mut self, other: Expansion) -> Self {
            self.tokens.extend(other.tokens);
            self
        }

        pub fn tokens(&self) -> &[AttrToken] {
            &self.tokens
        }

        pub fn is_empty(&self) -> bool {
            self.tokens.is_empty()
        }

        pub fn len(&self) -> usize {
            self.tokens.len()
        }

        pub fn ends_with(&self, tail: &Expansion) -> bool {
            self.tokens.ends_with(&tail.tokens)
        }
    }

    impl From<Vec<AttrToken>> for Expansion {
        fn from(tokens: Vec<AttrToken>) -> Self {
            Self { tokens }
        }
    }

    impl IntoIterator for Expansion {
        type Item = AttrToken;
        type IntoIter = std::vec::IntoIter<AttrToken>;

        fn into_iter(self) -> Self::IntoIter {
            self.tokens.into_iter()
        }
    }
}

pub mod scheme {
    use super::annotation::AnnotationKind;
    use serde::{Deserialize, Serialize};

    pub const DEFAULT_PREFIX: &str = "_API";

    /// Naming of the emitted macros and of the build-mode switch macros.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MacroScheme {
        pub prefix: String,
    }

    impl Default for MacroScheme {
        fn default() -> Self {
            Self::new(DEFAULT_PREFIX)
        }
    }

    impl MacroScheme {
        pub fn new(prefix: &str) -> Self {
            Self {
                prefix: prefix.trim_end_matches('_').to_string(),
            }
        }

        pub fn macro_name(&self, kind: AnnotationKind) -> String {
            format!("{}_{}", self.prefix, kind.suffix())
        }

        /// Defined while compiling the library's own source.
        pub fn library_source_macro(&self) -> String {
            format!("{}_SOURCE", self.prefix)
        }

        /// Defined by consumers that exclude deprecated API.
        pub fn no_deprecated_macro(&self) -> String {
            format!("{}_NO_DEPRECATED", self.prefix)
        }

        pub fn guard_macro(&self) -> String {
            format!("{}_BASE_H_", self.prefix)
        }
    }
}
