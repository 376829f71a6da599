//! Recorded build manifests.
//!
//! A manifest captures what a host build handed to the stripper: every
//! shader with its metadata and, per pass, the candidate variants. The CLI
//! replays a manifest through a [`ShaderStripper`](stripper_core::ShaderStripper)
//! in place of a live build.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stripper_core::{
    CompilerData, CompilerPlatform, GraphicsTier, PassType, ShaderRef, ShaderSnippet, StaticHost,
    StaticShader,
};

use crate::error::AppError;

/// One candidate variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestVariant {
    #[serde(default)]
    pub keywords: Vec<String>,
    pub platform: CompilerPlatform,
    #[serde(default)]
    pub tier: GraphicsTier,
}

impl From<ManifestVariant> for CompilerData {
    fn from(variant: ManifestVariant) -> Self {
        Self {
            keywords: variant.keywords,
            platform: variant.platform,
            tier: variant.tier,
        }
    }
}

impl From<CompilerData> for ManifestVariant {
    fn from(data: CompilerData) -> Self {
        Self {
            keywords: data.keywords,
            platform: data.platform,
            tier: data.tier,
        }
    }
}

/// One pass of a shader with its candidate variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPass {
    pub pass_type: PassType,
    #[serde(default)]
    pub pass_name: String,
    #[serde(default)]
    pub variants: Vec<ManifestVariant>,
}

/// A shader as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestShader {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub always_included: bool,
    #[serde(default)]
    pub local_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_keywords: Vec<String>,
    #[serde(default)]
    pub passes: Vec<ManifestPass>,
}

/// A recorded build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    #[serde(default)]
    pub shaders: Vec<ManifestShader>,
}

/// The candidates of one pass, detached from the manifest for processing.
#[derive(Debug)]
pub struct PassWork {
    pub shader: ShaderRef,
    pub shader_index: usize,
    pub pass_index: usize,
    pub snippet: ShaderSnippet,
    pub candidates: Vec<CompilerData>,
}

impl BuildManifest {
    /// Reads a JSON manifest.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Manifest(format!("{}: {}", path.display(), e)))
    }

    /// Writes the manifest as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Manifest(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn variant_count(&self) -> usize {
        self.shaders
            .iter()
            .flat_map(|s| &s.passes)
            .map(|p| p.variants.len())
            .sum()
    }

    /// Builds a host that answers queries from the manifest's shader table.
    pub fn to_host(&self) -> (StaticHost, Vec<ShaderRef>) {
        let mut host = StaticHost::new();
        let handles = self
            .shaders
            .iter()
            .map(|shader| {
                let mut entry = StaticShader::new(&shader.name)
                    .with_local_keywords(shader.local_keywords.iter().map(String::as_str))
                    .with_invalid_keywords(shader.invalid_keywords.iter().map(String::as_str));
                entry.path = shader.path.clone();
                entry.always_included = shader.always_included;
                host.add_shader(entry)
            })
            .collect();
        (host, handles)
    }

    /// Moves every pass's candidates out of the manifest.
    pub fn take_work(&mut self, handles: &[ShaderRef]) -> Vec<PassWork> {
        let mut work = Vec::new();
        for (shader_index, (shader, &handle)) in self.shaders.iter_mut().zip(handles).enumerate() {
            for (pass_index, pass) in shader.passes.iter_mut().enumerate() {
                work.push(PassWork {
                    shader: handle,
                    shader_index,
                    pass_index,
                    snippet: ShaderSnippet::new(pass.pass_type, pass.pass_name.clone()),
                    candidates: std::mem::take(&mut pass.variants)
                        .into_iter()
                        .map(CompilerData::from)
                        .collect(),
                });
            }
        }
        work
    }

    /// Puts processed candidates back where they came from.
    pub fn restore_work(&mut self, work: Vec<PassWork>) {
        for item in work {
            if let Some(pass) = self
                .shaders
                .get_mut(item.shader_index)
                .and_then(|s| s.passes.get_mut(item.pass_index))
            {
                pass.variants = item.candidates.into_iter().map(ManifestVariant::from).collect();
            }
        }
    }
}
