use std::collections::{HashMap, HashSet};

use stripper_rules::{CatalogShader, CatalogVariant, PassType, VariantCatalog};

use crate::host::ShaderHost;
use crate::variant::KeywordSet;

/// Combines reference catalogs into one validated, deduplicated catalog.
///
/// Every keyword combination is checked with [`ShaderHost::check_variant`].
/// When the host rejects a combination, each keyword is checked on its own
/// and only the individually valid ones are kept. Variants are deduplicated
/// by (shader, pass type, keyword set); shaders appear in first-seen order.
///
/// Shaders the host does not know are dropped with a warning.
pub fn merge_catalogs<'a, I>(catalogs: I, host: &dyn ShaderHost) -> VariantCatalog
where
    I: IntoIterator<Item = &'a VariantCatalog>,
{
    let mut merged = VariantCatalog::default();
    let mut seen: HashSet<(String, PassType, KeywordSet)> = HashSet::new();
    // Position of each shader in `merged.shaders`.
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut repaired = 0usize;

    for catalog in catalogs {
        for entry in &catalog.shaders {
            let Some(shader) = host.find_shader(&entry.shader) else {
                log::warn!("Dropping catalog entries for unknown shader '{}'", entry.shader);
                continue;
            };
            for variant in &entry.variants {
                let keywords = match host.check_variant(shader, variant.pass_type, &variant.keywords) {
                    Ok(()) => variant.keywords.clone(),
                    Err(reason) => {
                        log::debug!(
                            "Invalid variant of '{}' ({}): {reason}",
                            entry.shader,
                            variant.pass_type
                        );
                        repaired += 1;
                        variant
                            .keywords
                            .iter()
                            .filter(|keyword| {
                                host.check_variant(
                                    shader,
                                    variant.pass_type,
                                    std::slice::from_ref(*keyword),
                                )
                                .is_ok()
                            })
                            .cloned()
                            .collect()
                    }
                };

                let key = (
                    entry.shader.clone(),
                    variant.pass_type,
                    keywords.iter().map(String::as_str).collect::<KeywordSet>(),
                );
                if !seen.insert(key) {
                    continue;
                }
                let index = *positions.entry(entry.shader.clone()).or_insert_with(|| {
                    merged.shaders.push(CatalogShader {
                        shader: entry.shader.clone(),
                        variants: Vec::new(),
                    });
                    merged.shaders.len() - 1
                });
                merged.shaders[index]
                    .variants
                    .push(CatalogVariant::new(variant.pass_type, keywords));
            }
        }
    }

    log::info!(
        "Merged catalog: {} shaders, {} variants ({} repaired)",
        merged.shader_count(),
        merged.variant_count(),
        repaired
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticHost, StaticShader};

    fn host() -> StaticHost {
        let mut host = StaticHost::new();
        host.add_shader(StaticShader::new("Lit").with_invalid_keywords(["LEGACY_FOG"]));
        host.add_shader(StaticShader::new("Unlit"));
        host
    }

    #[test]
    fn test_merge_deduplicates_across_sources() {
        let mut first = VariantCatalog::default();
        first.add("Lit", CatalogVariant::new(PassType::ForwardBase, ["A", "B"]));
        first.add("Unlit", CatalogVariant::new(PassType::ForwardBase, Vec::<String>::new()));
        let mut second = VariantCatalog::default();
        second.add("Lit", CatalogVariant::new(PassType::ForwardBase, ["B", "A"]));
        second.add("Lit", CatalogVariant::new(PassType::ShadowCaster, ["A", "B"]));

        let merged = merge_catalogs([&first, &second], &host());
        assert_eq!(merged.shader_count(), 2);
        assert_eq!(merged.shaders[0].shader, "Lit");
        assert_eq!(merged.shaders[0].variants.len(), 2);
        assert_eq!(merged.variant_count(), 3);
    }

    #[test]
    fn test_interleaved_sources_group_by_shader() {
        let mut host = StaticHost::new();
        let names: Vec<String> = (0..50).map(|i| format!("Shader{i}")).collect();
        for name in &names {
            host.add_shader(StaticShader::new(name));
        }
        let mut first = VariantCatalog::default();
        let mut second = VariantCatalog::default();
        for name in names.iter().rev() {
            second.add(name, CatalogVariant::new(PassType::ForwardBase, ["B"]));
        }
        for name in &names {
            first.add(name, CatalogVariant::new(PassType::ForwardBase, ["A"]));
        }

        let merged = merge_catalogs([&first, &second], &host);
        assert_eq!(merged.shader_count(), 50);
        assert_eq!(merged.variant_count(), 100);
        for (shader, name) in merged.shaders.iter().zip(&names) {
            assert_eq!(&shader.shader, name);
            assert_eq!(shader.variants[0].keywords, ["A"]);
            assert_eq!(shader.variants[1].keywords, ["B"]);
        }
    }

    #[test]
    fn test_invalid_combination_keeps_valid_keywords() {
        let mut catalog = VariantCatalog::default();
        catalog.add("Lit", CatalogVariant::new(PassType::ForwardBase, ["LEGACY_FOG", "FOG_EXP"]));
        // Repairs to a combination that is already present.
        catalog.add("Lit", CatalogVariant::new(PassType::ForwardBase, ["FOG_EXP"]));

        let merged = merge_catalogs([&catalog], &host());
        assert_eq!(merged.variant_count(), 1);
        assert_eq!(merged.shaders[0].variants[0].keywords, ["FOG_EXP"]);
    }

    #[test]
    fn test_unknown_shaders_and_empty_sources() {
        let mut catalog = VariantCatalog::default();
        catalog.add("Gone", CatalogVariant::new(PassType::ForwardBase, ["A"]));
        let merged = merge_catalogs([&catalog, &VariantCatalog::default()], &host());
        assert_eq!(merged, VariantCatalog::default());
    }
}
