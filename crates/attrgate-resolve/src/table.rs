//! The whole per-compilation decision: every kind resolved for one profile.

use crate::detect::detect;
use crate::render::render_expansion;
use crate::resolver::{resolve, Resolution};
use attrgate_model::annotation::{Annotation, AnnotationKind, ALL_KINDS};
use attrgate_model::build::BuildMode;
use attrgate_model::caps::CapabilitySet;
use attrgate_model::toolchain::ToolchainProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KindResolution {
    pub kind: AnnotationKind,
    /// The kind with macro parameters in place of arguments.
    pub template: Annotation,
    pub resolution: Resolution,
    /// GNU spelling of `resolution.expansion`.
    pub rendered: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionTable {
    pub profile: ToolchainProfile,
    pub mode: BuildMode,
    pub capabilities: CapabilitySet,
    pub entries: Vec<KindResolution>,
}

/// Detect once, then resolve every kind in header order.
pub fn resolve_all(profile: &ToolchainProfile, mode: BuildMode) -> ResolutionTable {
    let capabilities = detect(profile);
    let entries = ALL_KINDS
        .iter()
        .map(|&kind| {
            let template = Annotation::template(kind);
            let resolution = resolve(&template, &capabilities, mode, profile.platform);
            let rendered = render_expansion(&resolution.expansion);
            KindResolution {
                kind,
                template,
                resolution,
                rendered,
            }
        })
        .collect();

    tracing::debug!(profile = %profile, mode = %mode, "resolved annotation table");
    ResolutionTable {
        profile: *profile,
        mode,
        capabilities,
        entries,
    }
}

impl ResolutionTable {
    pub fn get(&self, kind: AnnotationKind) -> Option<&KindResolution> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Digest of the rendered expansions, prefixed with "sha256:".
    ///
    /// Two tables with the same fingerprint splice identical text at every
    /// declaration site, whatever profiles produced them.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        for entry in &self.entries {
            hasher.update(entry.kind.suffix().as_bytes());
            hasher.update(b"=");
            hasher.update(entry.rendered.as_bytes());
            hasher.update(b"\n");
        }
        format!("sha256:{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_kind_once() {
        let t = resolve_all(&ToolchainProfile::gcc(9, 1), BuildMode::default());
        assert_eq!(t.entries.len(), ALL_KINDS.len());
        for kind in ALL_KINDS {
            assert!(t.get(*kind).is_some(), "missing {kind}");
        }
    }

    #[test]
    fn fingerprint_tracks_rendered_text_only() {
        // two GCC releases past 5 resolve identically
        let a = resolve_all(&ToolchainProfile::gcc(7, 0), BuildMode::default());
        let b = resolve_all(&ToolchainProfile::gcc(13, 2), BuildMode::default());
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = resolve_all(&ToolchainProfile::gcc(4, 4), BuildMode::default());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert!(a.fingerprint().starts_with("sha256:"));
    }
}
