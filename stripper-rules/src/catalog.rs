//! Reference variant catalogs.
//!
//! A catalog is a previously captured list of variants per shader, for
//! example everything observed while play-testing. Catalogs reference
//! shaders by name; the core crate resolves names to shader handles.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::PassType;

/// A single captured variant of a shader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVariant {
    pub pass_type: PassType,
    /// Active keywords. Accepts a list or one space-separated string.
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,
}

impl CatalogVariant {
    pub fn new<I, S>(pass_type: PassType, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pass_type,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// All captured variants of one shader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogShader {
    /// Shader name as reported by the host, e.g. `"Universal Render Pipeline/Lit"`.
    pub shader: String,
    #[serde(default)]
    pub variants: Vec<CatalogVariant>,
}

/// A reference variant catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCatalog {
    #[serde(default)]
    pub shaders: Vec<CatalogShader>,
}

impl VariantCatalog {
    /// Number of distinct shader entries.
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Total number of variants across all shaders.
    pub fn variant_count(&self) -> usize {
        self.shaders.iter().map(|s| s.variants.len()).sum()
    }

    /// Appends a variant, creating the shader entry on first use.
    pub fn add(&mut self, shader: &str, variant: CatalogVariant) {
        match self.shaders.iter_mut().find(|entry| entry.shader == shader) {
            Some(entry) => entry.variants.push(variant),
            None => self.shaders.push(CatalogShader {
                shader: shader.to_owned(),
                variants: vec![variant],
            }),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordsRepr {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match KeywordsRepr::deserialize(deserializer)? {
        KeywordsRepr::List(list) => list,
        KeywordsRepr::Joined(joined) => joined.split_whitespace().map(str::to_owned).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_accept_joined_string() {
        let json = r#"{ "shaders": [ { "shader": "Lit", "variants": [
            { "pass_type": "ForwardBase", "keywords": "FOG_EXP  INSTANCING_ON" },
            { "pass_type": "ShadowCaster", "keywords": ["SHADOWS_DEPTH"] },
            { "pass_type": "Meta" }
        ] } ] }"#;
        let catalog: VariantCatalog = serde_json::from_str(json).unwrap();
        let variants = &catalog.shaders[0].variants;
        assert_eq!(variants[0].keywords, ["FOG_EXP", "INSTANCING_ON"]);
        assert_eq!(variants[1].keywords, ["SHADOWS_DEPTH"]);
        assert!(variants[2].keywords.is_empty());
        assert_eq!(catalog.variant_count(), 3);
    }

    #[test]
    fn test_add_groups_by_shader() {
        let mut catalog = VariantCatalog::default();
        catalog.add("A", CatalogVariant::new(PassType::ForwardBase, ["X"]));
        catalog.add("B", CatalogVariant::new(PassType::ForwardBase, Vec::<String>::new()));
        catalog.add("A", CatalogVariant::new(PassType::ShadowCaster, ["Y"]));
        assert_eq!(catalog.shader_count(), 2);
        assert_eq!(catalog.shaders[0].variants.len(), 2);
    }
}
