//! The interface to the build host.
//!
//! Everything the stripper needs to know about shaders beyond the variant
//! being evaluated comes through [`ShaderHost`]. [`StaticHost`] answers those
//! queries from plain data and backs both the CLI and the tests.

use std::collections::{HashMap, HashSet};

use stripper_rules::{CompilerPlatform, GraphicsTier, PassType};

use crate::variant::ShaderRef;

/// The shader pass a batch of candidate variants belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSnippet {
    pub pass_type: PassType,
    pub pass_name: String,
}

impl ShaderSnippet {
    pub fn new(pass_type: PassType, pass_name: impl Into<String>) -> Self {
        Self {
            pass_type,
            pass_name: pass_name.into(),
        }
    }
}

/// One candidate variant as handed over by the shader compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerData {
    /// Active keywords, in the order the host reports them.
    pub keywords: Vec<String>,
    pub platform: CompilerPlatform,
    pub tier: GraphicsTier,
}

impl CompilerData {
    pub fn new<I, S>(keywords: I, platform: CompilerPlatform, tier: GraphicsTier) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            platform,
            tier,
        }
    }
}

/// Queries the stripper makes against the build host.
///
/// Implementations must be shareable across worker threads, since passes may
/// be evaluated in parallel.
pub trait ShaderHost: Sync {
    /// Display name of a shader, e.g. `"Universal Render Pipeline/Lit"`.
    fn shader_name(&self, shader: ShaderRef) -> Option<&str>;

    /// Project asset path. `None` for shaders built into the engine.
    fn asset_path(&self, shader: ShaderRef) -> Option<&str>;

    /// Resolves a shader by display name.
    fn find_shader(&self, name: &str) -> Option<ShaderRef>;

    /// Whether `keyword` is declared locally by `shader` rather than globally.
    fn is_keyword_local(&self, shader: ShaderRef, keyword: &str) -> bool;

    /// Whether `shader` is in the project's always-included list.
    fn is_always_included(&self, shader: ShaderRef) -> bool;

    /// Checks that a keyword combination is valid for a shader pass.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the combination is rejected.
    fn check_variant(
        &self,
        _shader: ShaderRef,
        _pass_type: PassType,
        _keywords: &[String],
    ) -> Result<(), String> {
        Ok(())
    }
}

/// Description of one shader served by [`StaticHost`].
#[derive(Debug, Clone, Default)]
pub struct StaticShader {
    pub name: String,
    pub path: Option<String>,
    pub always_included: bool,
    pub local_keywords: HashSet<String>,
    /// Keywords `check_variant` rejects for this shader.
    pub invalid_keywords: HashSet<String>,
}

impl StaticShader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn always_included(mut self) -> Self {
        self.always_included = true;
        self
    }

    #[must_use]
    pub fn with_local_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.local_keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_invalid_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invalid_keywords.extend(keywords.into_iter().map(Into::into));
        self
    }
}

/// A [`ShaderHost`] backed by an in-memory shader table.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    shaders: Vec<StaticShader>,
    by_name: HashMap<String, ShaderRef>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shader and returns its handle.
    ///
    /// Registering a name twice replaces the earlier entry under the same handle.
    pub fn add_shader(&mut self, shader: StaticShader) -> ShaderRef {
        if let Some(&existing) = self.by_name.get(&shader.name) {
            self.shaders[existing.0 as usize] = shader;
            return existing;
        }
        let handle = ShaderRef(u32::try_from(self.shaders.len()).unwrap_or(u32::MAX));
        self.by_name.insert(shader.name.clone(), handle);
        self.shaders.push(shader);
        handle
    }

    pub fn shader(&self, shader: ShaderRef) -> Option<&StaticShader> {
        self.shaders.get(shader.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

impl ShaderHost for StaticHost {
    fn shader_name(&self, shader: ShaderRef) -> Option<&str> {
        self.shader(shader).map(|s| s.name.as_str())
    }

    fn asset_path(&self, shader: ShaderRef) -> Option<&str> {
        self.shader(shader).and_then(|s| s.path.as_deref())
    }

    fn find_shader(&self, name: &str) -> Option<ShaderRef> {
        self.by_name.get(name).copied()
    }

    fn is_keyword_local(&self, shader: ShaderRef, keyword: &str) -> bool {
        self.shader(shader)
            .is_some_and(|s| s.local_keywords.contains(keyword))
    }

    fn is_always_included(&self, shader: ShaderRef) -> bool {
        self.shader(shader).is_some_and(|s| s.always_included)
    }

    fn check_variant(
        &self,
        shader: ShaderRef,
        _pass_type: PassType,
        keywords: &[String],
    ) -> Result<(), String> {
        let entry = self
            .shader(shader)
            .ok_or_else(|| format!("unknown shader {shader}"))?;
        match keywords.iter().find(|k| entry.invalid_keywords.contains(*k)) {
            Some(keyword) => Err(format!(
                "keyword '{keyword}' is not valid for shader '{}'",
                entry.name
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_host_lookup() {
        let mut host = StaticHost::new();
        let lit = host.add_shader(
            StaticShader::new("Custom/Lit")
                .with_path("Assets/Shaders/Lit.shader")
                .with_local_keywords(["_NORMALMAP"]),
        );
        let blit = host.add_shader(StaticShader::new("Hidden/Blit").always_included());

        assert_eq!(host.find_shader("Custom/Lit"), Some(lit));
        assert_eq!(host.find_shader("Missing"), None);
        assert_eq!(host.shader_name(blit), Some("Hidden/Blit"));
        assert_eq!(host.asset_path(lit), Some("Assets/Shaders/Lit.shader"));
        assert_eq!(host.asset_path(blit), None);
        assert!(host.is_keyword_local(lit, "_NORMALMAP"));
        assert!(!host.is_keyword_local(lit, "FOG_EXP"));
        assert!(host.is_always_included(blit));
        assert!(!host.is_always_included(lit));
    }

    #[test]
    fn test_re_registering_keeps_handle() {
        let mut host = StaticHost::new();
        let first = host.add_shader(StaticShader::new("A"));
        let again = host.add_shader(StaticShader::new("A").always_included());
        assert_eq!(first, again);
        assert_eq!(host.len(), 1);
        assert!(host.is_always_included(first));
    }

    #[test]
    fn test_check_variant_rejects_invalid_keywords() {
        let mut host = StaticHost::new();
        let shader = host.add_shader(StaticShader::new("A").with_invalid_keywords(["OLD_KEYWORD"]));
        let ok = vec!["FOG_EXP".to_owned()];
        let bad = vec!["FOG_EXP".to_owned(), "OLD_KEYWORD".to_owned()];
        assert!(host.check_variant(shader, PassType::ForwardBase, &ok).is_ok());
        let err = host
            .check_variant(shader, PassType::ForwardBase, &bad)
            .unwrap_err();
        assert!(err.contains("OLD_KEYWORD"));
        assert!(host
            .check_variant(ShaderRef(42), PassType::ForwardBase, &ok)
            .is_err());
    }
}
