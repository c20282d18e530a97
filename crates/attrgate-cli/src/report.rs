//! Command output in pretty and JSON form.

use anyhow::Result;
use attrgate_model::annotation::Annotation;
use attrgate_model::caps::CapabilitySet;
use attrgate_resolve::{render_expansion, Resolution, ResolutionTable};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

use crate::profile::Facts;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
}

#[derive(Serialize)]
struct DetectReport<'a> {
    profile: &'a attrgate_model::toolchain::ToolchainProfile,
    mode: &'a attrgate_model::build::BuildMode,
    capabilities: &'a CapabilitySet,
}

pub fn detect_report(facts: &Facts, caps: &CapabilitySet, format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(&DetectReport {
            profile: &facts.profile,
            mode: &facts.mode,
            capabilities: caps,
        })?),
        Format::Pretty => {
            let mut out = String::new();
            writeln!(out, "toolchain:  {}", facts.profile)?;
            writeln!(out, "build mode: {}", facts.mode)?;
            writeln!(out, "capabilities:")?;
            for (name, on) in caps.flags() {
                writeln!(out, "  {:<26}{}", name, if on { "yes" } else { "no" })?;
            }
            Ok(out)
        }
    }
}

/// One resolved annotation expression as given on the command line.
#[derive(Serialize)]
pub struct ResolvedExpr {
    pub input: String,
    pub annotation: Annotation,
    pub resolution: Resolution,
    pub rendered: String,
}

impl ResolvedExpr {
    pub fn new(input: &str, annotation: Annotation, resolution: Resolution) -> Self {
        let rendered = render_expansion(&resolution.expansion);
        Self {
            input: input.to_string(),
            annotation,
            resolution,
            rendered,
        }
    }
}

pub fn resolve_report(items: &[ResolvedExpr], format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(items)?),
        Format::Pretty => {
            let mut out = String::new();
            for item in items {
                let rule = item
                    .resolution
                    .rule
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "capability".to_string());
                writeln!(out, "{}  [{}]", item.input, rule)?;
                writeln!(out, "  {}", display_rendered(&item.rendered))?;
            }
            Ok(out)
        }
    }
}

pub fn table_report(table: &ResolutionTable, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut value = serde_json::to_value(table)?;
            value["fingerprint"] = serde_json::Value::String(table.fingerprint());
            Ok(serde_json::to_string_pretty(&value)?)
        }
        Format::Pretty => {
            let mut out = String::new();
            writeln!(out, "toolchain:   {}", table.profile)?;
            writeln!(out, "build mode:  {}", table.mode)?;
            writeln!(out, "fingerprint: {}", table.fingerprint())?;
            for entry in &table.entries {
                writeln!(
                    out,
                    "{:<16}{}",
                    entry.kind.suffix(),
                    display_rendered(&entry.rendered)
                )?;
            }
            Ok(out)
        }
    }
}

fn display_rendered(rendered: &str) -> &str {
    if rendered.is_empty() {
        "(nothing)"
    } else {
        rendered
    }
}
