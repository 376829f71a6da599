use std::path::PathBuf;

use stripper_rules::loader::load_catalog_from_file;
use stripper_rules::{CatalogParams, RuleKind, VariantCatalog};

use super::{BuildContext, ShaderRule, VariantContext};
use crate::host::ShaderHost;
use crate::reference::{ReferenceMatch, VariantReferenceIndex};
use crate::variant::KeywordSet;
use crate::StripError;

/// Keeps only variants recorded in reference catalogs.
///
/// The catalogs are loaded and indexed in `initialize`; querying the rule
/// before that is an error.
#[derive(Debug)]
pub struct VariantCatalogRule {
    sources: Vec<PathBuf>,
    extra: Vec<VariantCatalog>,
    match_without_local_keywords: bool,
    only_strip_shaders_in_collections: bool,
    index: Option<VariantReferenceIndex>,
}

impl VariantCatalogRule {
    pub fn new(params: &CatalogParams, ctx: &BuildContext) -> Self {
        Self {
            sources: params.catalogs.iter().map(|path| ctx.resolve(path)).collect(),
            extra: ctx.extra_catalogs.clone(),
            match_without_local_keywords: params.match_without_local_keywords,
            only_strip_shaders_in_collections: params.only_strip_shaders_in_collections,
            index: None,
        }
    }

    /// A rule over an already built index.
    pub fn with_index(params: &CatalogParams, index: VariantReferenceIndex) -> Self {
        Self {
            sources: Vec::new(),
            extra: Vec::new(),
            match_without_local_keywords: params.match_without_local_keywords,
            only_strip_shaders_in_collections: params.only_strip_shaders_in_collections,
            index: Some(index),
        }
    }

    fn index(&self) -> Result<&VariantReferenceIndex, StripError> {
        self.index
            .as_ref()
            .ok_or(StripError::RuleNotInitialized(RuleKind::IncludeVariantCatalog.display_name()))
    }
}

impl ShaderRule for VariantCatalogRule {
    fn kind(&self) -> RuleKind {
        RuleKind::IncludeVariantCatalog
    }

    fn initialize(&mut self, host: &dyn ShaderHost) -> Result<(), StripError> {
        let mut catalogs = Vec::with_capacity(self.sources.len() + self.extra.len());
        for path in &self.sources {
            match load_catalog_from_file(path)? {
                Some(catalog) => catalogs.push(catalog),
                None => log::info!("Variant catalog {} not found, treating it as empty", path.display()),
            }
        }
        let index = VariantReferenceIndex::from_catalogs(catalogs.iter().chain(&self.extra), host);
        self.index = Some(index);
        Ok(())
    }

    fn should_include(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        let keywords: KeywordSet = ctx.keywords().iter().map(String::as_str).collect();
        let found = self
            .index()?
            .match_keywords(ctx.shader, &keywords, self.match_without_local_keywords);
        Ok(match found {
            ReferenceMatch::Matched => true,
            ReferenceMatch::NotMatched => false,
            ReferenceMatch::ShaderAbsent => self.only_strip_shaders_in_collections,
        })
    }

    fn should_strip(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        self.should_include(ctx).map(|include| !include)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{host, Candidate};
    use stripper_rules::loader::save_catalog_to_file;
    use stripper_rules::{CatalogVariant, PassType};
    use tempfile::tempdir;

    fn catalog() -> VariantCatalog {
        let mut catalog = VariantCatalog::default();
        catalog.add("Custom/Water", CatalogVariant::new(PassType::ForwardBase, ["A", "B"]));
        catalog
    }

    fn params(only_strip_shaders_in_collections: bool) -> CatalogParams {
        CatalogParams {
            catalogs: vec![PathBuf::from("play.json")],
            match_without_local_keywords: false,
            only_strip_shaders_in_collections,
        }
    }

    #[test]
    fn test_uninitialized_rule_errors() {
        let host = host();
        let rule = VariantCatalogRule::new(&params(false), &BuildContext::default());
        let candidate = Candidate::new(&host, "Custom/Water", &["A"]);
        assert!(matches!(
            rule.should_include(&candidate.ctx(&host)),
            Err(StripError::RuleNotInitialized(_))
        ));
    }

    #[test]
    fn test_loads_catalogs_relative_to_base_dir() {
        let dir = tempdir().unwrap();
        save_catalog_to_file(&dir.path().join("play.json"), &catalog()).unwrap();
        let host = host();
        let ctx = BuildContext {
            base_dir: Some(dir.path().to_path_buf()),
            ..BuildContext::default()
        };
        let mut rule = VariantCatalogRule::new(&params(false), &ctx);
        rule.initialize(&host).unwrap();

        let matched = Candidate::new(&host, "Custom/Water", &["B", "A"]);
        let partial = Candidate::new(&host, "Custom/Water", &["A"]);
        assert!(rule.should_include(&matched.ctx(&host)).unwrap());
        assert!(!rule.should_strip(&matched.ctx(&host)).unwrap());
        assert!(!rule.should_include(&partial.ctx(&host)).unwrap());
        assert!(rule.should_strip(&partial.ctx(&host)).unwrap());
    }

    #[test]
    fn test_missing_catalog_is_empty() {
        let dir = tempdir().unwrap();
        let host = host();
        let ctx = BuildContext {
            base_dir: Some(dir.path().to_path_buf()),
            ..BuildContext::default()
        };
        let mut rule = VariantCatalogRule::new(&params(false), &ctx);
        rule.initialize(&host).unwrap();
        let candidate = Candidate::new(&host, "Custom/Water", &[]);
        assert!(rule.should_strip(&candidate.ctx(&host)).unwrap());
    }

    #[test]
    fn test_absent_shader_follows_only_strip_flag() {
        let host = host();
        let standard = Candidate::new(&host, "Standard", &[]);
        for only_strip in [false, true] {
            let ctx = BuildContext {
                base_dir: None,
                extra_catalogs: vec![catalog()],
            };
            let mut rule = VariantCatalogRule::new(
                &CatalogParams {
                    catalogs: Vec::new(),
                    ..params(only_strip)
                },
                &ctx,
            );
            rule.initialize(&host).unwrap();
            assert_eq!(rule.should_include(&standard.ctx(&host)).unwrap(), only_strip);
            assert_eq!(rule.should_strip(&standard.ctx(&host)).unwrap(), !only_strip);
        }
    }
}
