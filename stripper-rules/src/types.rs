use serde::{Deserialize, Serialize};
use std::fmt;

/// How a [`StringFilter`] pattern is compared against its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StringMatchType {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    /// `*` matches any run of characters, `?` exactly one; anchored at both ends.
    #[default]
    Wildcard,
    /// Unanchored regular expression search.
    Regex,
}

/// A configured string predicate: match type, pattern and case sensitivity.
///
/// The default filter is `Wildcard` / `"*"`, which matches every name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringFilter {
    pub match_type: StringMatchType,
    pub pattern: String,
    pub ignore_case: bool,
}

impl Default for StringFilter {
    fn default() -> Self {
        Self::new(StringMatchType::Wildcard, "*")
    }
}

impl StringFilter {
    /// Creates a case-sensitive filter.
    pub fn new(match_type: StringMatchType, pattern: impl Into<String>) -> Self {
        Self {
            match_type,
            pattern: pattern.into(),
            ignore_case: false,
        }
    }

    /// Returns the same filter with case-insensitive matching.
    #[must_use]
    pub fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

/// Rendering pass a shader snippet is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PassType {
    Normal,
    Vertex,
    VertexLm,
    ForwardBase,
    ForwardAdd,
    LightPrePassBase,
    LightPrePassFinal,
    ShadowCaster,
    Deferred,
    Meta,
    MotionVectors,
    ScriptableRenderPipeline,
    ScriptableRenderPipelineDefaultUnlit,
}

impl fmt::Display for PassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "Normal",
            Self::Vertex => "Vertex",
            Self::VertexLm => "VertexLM",
            Self::ForwardBase => "ForwardBase",
            Self::ForwardAdd => "ForwardAdd",
            Self::LightPrePassBase => "LightPrePassBase",
            Self::LightPrePassFinal => "LightPrePassFinal",
            Self::ShadowCaster => "ShadowCaster",
            Self::Deferred => "Deferred",
            Self::Meta => "Meta",
            Self::MotionVectors => "MotionVectors",
            Self::ScriptableRenderPipeline => "ScriptableRenderPipeline",
            Self::ScriptableRenderPipelineDefaultUnlit => "ScriptableRenderPipelineDefaultUnlit",
        };
        f.write_str(name)
    }
}

/// Shader compiler backend a variant is being compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompilerPlatform {
    None,
    D3D,
    Gles20,
    Gles3x,
    OpenGLCore,
    Metal,
    Vulkan,
    PS4,
    PS5,
    XboxOneD3D11,
    XboxOneD3D12,
    GameCoreXboxOne,
    GameCoreXboxSeries,
    Switch,
}

/// Graphics hardware tier of a compiled variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GraphicsTier {
    #[default]
    Tier1,
    Tier2,
    Tier3,
}

/// Per-platform tier stripping switches used by the hardware tier rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTiers {
    pub platform: CompilerPlatform,
    #[serde(default)]
    pub strip_tier1: bool,
    #[serde(default)]
    pub strip_tier2: bool,
    #[serde(default)]
    pub strip_tier3: bool,
}

impl PlatformTiers {
    /// Whether variants of `tier` should be stripped on this platform.
    pub fn should_strip(&self, tier: GraphicsTier) -> bool {
        match tier {
            GraphicsTier::Tier1 => self.strip_tier1,
            GraphicsTier::Tier2 => self.strip_tier2,
            GraphicsTier::Tier3 => self.strip_tier3,
        }
    }
}

/// A shader name filter paired with the pass type to strip for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStripEntry {
    #[serde(default)]
    pub shader_name_filter: StringFilter,
    pub pass_type: PassType,
}

/// Parameters for shader-name based rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderNameParams {
    pub shader_names: Vec<StringFilter>,
}

/// Parameters for the shader asset path rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderPathParams {
    pub paths: Vec<StringFilter>,
}

/// Parameters for the keyword stripping rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordParams {
    /// Filters applied when building a development player.
    pub exclude_development_keywords: Vec<StringFilter>,
    /// Filters applied when building a release player.
    pub exclude_release_keywords: Vec<StringFilter>,
    pub strip_vr_variants: bool,
    pub strip_lightmap_variants: bool,
    pub strip_fog_variants: bool,
    pub strip_instancing_variants: bool,
    pub strip_dots_variants: bool,
}

/// Parameters for the platform rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformParams {
    pub platforms: Vec<CompilerPlatform>,
}

/// Parameters for the hardware tier rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareTierParams {
    pub platform_tiers: Vec<PlatformTiers>,
}

/// Parameters for the pass rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassParams {
    pub passes: Vec<PassStripEntry>,
}

/// Parameters for the reference catalog rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogParams {
    /// Catalog files, resolved against the settings file directory when relative.
    pub catalogs: Vec<std::path::PathBuf>,
    /// Also accept a candidate whose keywords equal an entry's global keywords.
    pub match_without_local_keywords: bool,
    /// Leave shaders that no catalog mentions to the other rules.
    pub only_strip_shaders_in_collections: bool,
}

/// The kind-specific part of a rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleParams {
    IncludeShaderName(ShaderNameParams),
    StripShaderName(ShaderNameParams),
    StripShaderPath(ShaderPathParams),
    StripKeywords(KeywordParams),
    StripPlatforms(PlatformParams),
    StripHardwareTier(HardwareTierParams),
    StripPasses(PassParams),
    IncludeInternalShaders,
    StripInternalShaders,
    IncludeHiddenShaders,
    StripHiddenShaders,
    IncludeVariantCatalog(CatalogParams),
}

/// One entry of the ordered rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
    pub rule: RuleParams,
}

const fn default_enabled() -> bool {
    true
}

impl RuleConfig {
    /// Creates an enabled rule with an empty description.
    pub fn new(rule: RuleParams) -> Self {
        Self {
            enabled: true,
            description: String::new(),
            rule,
        }
    }

    /// Sets the free-text description shown in reports and logs.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the same rule, disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Complete stripper configuration as stored in a settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripperSettings {
    /// Rules in evaluation order.
    pub rules: Vec<RuleConfig>,
    /// Write one line per distinct kept keyword combination in the report.
    pub log_included_variants: bool,
    /// Write one line per distinct stripped keyword combination in the report.
    pub log_stripped_variants: bool,
    /// Run always-included shaders through the rules instead of keeping them.
    pub process_always_included_shaders: bool,
    /// Directory run reports are written to. No report is written when unset.
    pub log_path: Option<std::path::PathBuf>,
}

impl Default for StripperSettings {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            log_included_variants: true,
            log_stripped_variants: false,
            process_always_included_shaders: true,
            log_path: None,
        }
    }
}

impl StripperSettings {
    /// Rules that take part in evaluation, in order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &RuleConfig> {
        self.rules.iter().filter(|rule| rule.enabled)
    }
}
