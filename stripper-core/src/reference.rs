use std::collections::{HashMap, HashSet};

use stripper_rules::VariantCatalog;

use crate::host::ShaderHost;
use crate::variant::{KeywordSet, ShaderRef, ShaderVariant};

/// Outcome of looking a candidate keyword set up in a [`VariantReferenceIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceMatch {
    /// Some reference entry of the shader has the same keyword set.
    Matched,
    /// The shader has entries, but none of them match.
    NotMatched,
    /// The index holds no entries for the shader at all.
    ShaderAbsent,
}

#[derive(Debug, Default)]
struct ShaderEntries {
    variants: Vec<ShaderVariant>,
    keyword_sets: HashSet<KeywordSet>,
    global_sets: HashSet<KeywordSet>,
}

/// Reference variants grouped by shader, with set lookups for matching.
///
/// Built once per run and read-only afterwards, so it can be shared between
/// worker threads.
#[derive(Debug, Default)]
pub struct VariantReferenceIndex {
    shaders: HashMap<ShaderRef, ShaderEntries>,
}

impl VariantReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from catalogs, resolving shader names through `host`.
    ///
    /// Entries for shaders the host does not know are skipped with a warning.
    pub fn from_catalogs<'a, I>(catalogs: I, host: &dyn ShaderHost) -> Self
    where
        I: IntoIterator<Item = &'a VariantCatalog>,
    {
        let mut index = Self::new();
        for catalog in catalogs {
            for entry in &catalog.shaders {
                let Some(shader) = host.find_shader(&entry.shader) else {
                    log::warn!(
                        "Skipping {} catalog variants for unknown shader '{}'",
                        entry.variants.len(),
                        entry.shader
                    );
                    continue;
                };
                for variant in &entry.variants {
                    index.insert(ShaderVariant::new(
                        host,
                        shader,
                        variant.pass_type,
                        variant.keywords.iter().map(String::as_str),
                    ));
                }
            }
        }
        log::debug!(
            "Reference index holds {} variants for {} shaders",
            index.variant_count(),
            index.shader_count()
        );
        index
    }

    /// Adds a reference variant. Returns `false` if an equal variant was present.
    pub fn insert(&mut self, variant: ShaderVariant) -> bool {
        let entries = self.shaders.entry(variant.shader).or_default();
        if entries.variants.contains(&variant) {
            return false;
        }
        entries.keyword_sets.insert(variant.keywords().clone());
        entries.global_sets.insert(variant.global_keywords().clone());
        entries.variants.push(variant);
        true
    }

    pub fn contains_shader(&self, shader: ShaderRef) -> bool {
        self.shaders.contains_key(&shader)
    }

    /// Exact identity membership: shader, pass type and keyword set.
    pub fn contains(&self, variant: &ShaderVariant) -> bool {
        self.shaders
            .get(&variant.shader)
            .is_some_and(|entries| entries.variants.contains(variant))
    }

    /// Reference variants recorded for `shader`, in insertion order.
    pub fn variants_for(&self, shader: ShaderRef) -> &[ShaderVariant] {
        self.shaders
            .get(&shader)
            .map(|entries| entries.variants.as_slice())
            .unwrap_or_default()
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    pub fn variant_count(&self) -> usize {
        self.shaders.values().map(|e| e.variants.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// Matches a candidate keyword set against the entries of `shader`.
    ///
    /// Pass types are not compared. With `match_without_local_keywords`, the
    /// candidate may also equal an entry's global-only keyword set.
    pub fn match_keywords(
        &self,
        shader: ShaderRef,
        keywords: &KeywordSet,
        match_without_local_keywords: bool,
    ) -> ReferenceMatch {
        let Some(entries) = self.shaders.get(&shader) else {
            return ReferenceMatch::ShaderAbsent;
        };
        if entries.keyword_sets.contains(keywords)
            || (match_without_local_keywords && entries.global_sets.contains(keywords))
        {
            ReferenceMatch::Matched
        } else {
            ReferenceMatch::NotMatched
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticHost, StaticShader};
    use stripper_rules::{CatalogVariant, PassType};

    fn setup() -> (StaticHost, ShaderRef, VariantReferenceIndex) {
        let mut host = StaticHost::new();
        let shader = host.add_shader(StaticShader::new("ShaderX").with_local_keywords(["_LOCAL"]));
        let mut catalog = VariantCatalog::default();
        catalog.add("ShaderX", CatalogVariant::new(PassType::ForwardBase, ["A", "B"]));
        catalog.add("ShaderX", CatalogVariant::new(PassType::ForwardBase, ["C", "_LOCAL"]));
        catalog.add("Unknown", CatalogVariant::new(PassType::ForwardBase, ["A"]));
        let index = VariantReferenceIndex::from_catalogs([&catalog], &host);
        (host, shader, index)
    }

    fn set(keywords: &[&str]) -> KeywordSet {
        keywords.iter().copied().collect()
    }

    #[test]
    fn test_unknown_shaders_are_skipped() {
        let (_, _, index) = setup();
        assert_eq!(index.shader_count(), 1);
        assert_eq!(index.variant_count(), 2);
    }

    #[test]
    fn test_match_is_set_equality() {
        let (_, shader, index) = setup();
        assert_eq!(index.match_keywords(shader, &set(&["B", "A"]), false), ReferenceMatch::Matched);
        assert_eq!(index.match_keywords(shader, &set(&["A"]), false), ReferenceMatch::NotMatched);
        assert_eq!(
            index.match_keywords(ShaderRef(99), &set(&["A", "B"]), false),
            ReferenceMatch::ShaderAbsent
        );
    }

    #[test]
    fn test_match_without_local_keywords() {
        let (_, shader, index) = setup();
        // The global-only set of {C, _LOCAL} is {C}.
        assert_eq!(index.match_keywords(shader, &set(&["C"]), false), ReferenceMatch::NotMatched);
        assert_eq!(index.match_keywords(shader, &set(&["C"]), true), ReferenceMatch::Matched);
    }

    #[test]
    fn test_insert_deduplicates_identities() {
        let (host, shader, mut index) = setup();
        let duplicate = ShaderVariant::new(&host, shader, PassType::ForwardBase, ["B", "A"]);
        assert!(index.contains(&duplicate));
        assert!(!index.insert(duplicate));
        let other_pass = ShaderVariant::new(&host, shader, PassType::ShadowCaster, ["A", "B"]);
        assert!(!index.contains(&other_pass));
        assert!(index.insert(other_pass));
        assert_eq!(index.variants_for(shader).len(), 3);
        assert!(index.variants_for(ShaderRef(99)).is_empty());
    }
}
