use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use stripper_rules::PassType;

use crate::host::ShaderHost;

/// Opaque handle to a shader known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderRef(pub u32);

impl fmt::Display for ShaderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An unordered set of keyword names.
///
/// Equality and hashing only depend on membership: insertion order and
/// duplicates are irrelevant. Keywords are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeywordSet(BTreeSet<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains(keyword)
    }

    pub fn insert(&mut self, keyword: impl Into<String>) -> bool {
        self.0.insert(keyword.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keywords in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the subset of keywords accepted by `keep`.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
        Self(self.0.iter().filter(|k| keep(k)).cloned().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for keyword in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
            first = false;
        }
        Ok(())
    }
}

/// Joins keywords in host order with single spaces, as shown in reports.
pub fn keyword_signature<S: AsRef<str>>(keywords: &[S]) -> String {
    let mut signature = String::new();
    for (i, keyword) in keywords.iter().enumerate() {
        if i > 0 {
            signature.push(' ');
        }
        signature.push_str(keyword.as_ref());
    }
    signature
}

/// Identity of one shader variant: shader, pass and active keyword set.
///
/// `pass_name` is informational and does not take part in equality, and
/// `global_keywords` is derived from `keywords` once at construction.
#[derive(Debug, Clone)]
pub struct ShaderVariant {
    pub shader: ShaderRef,
    pub pass_type: PassType,
    pub pass_name: String,
    keywords: KeywordSet,
    global_keywords: KeywordSet,
}

impl ShaderVariant {
    /// Creates a variant, asking the host which keywords are local to `shader`.
    pub fn new<I, S>(host: &dyn ShaderHost, shader: ShaderRef, pass_type: PassType, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: KeywordSet = keywords.into_iter().collect();
        let global_keywords = keywords.filtered(|k| !host.is_keyword_local(shader, k));
        Self {
            shader,
            pass_type,
            pass_name: String::new(),
            keywords,
            global_keywords,
        }
    }

    #[must_use]
    pub fn with_pass_name(mut self, pass_name: impl Into<String>) -> Self {
        self.pass_name = pass_name.into();
        self
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// The keywords that are not local to the owning shader.
    pub fn global_keywords(&self) -> &KeywordSet {
        &self.global_keywords
    }
}

impl PartialEq for ShaderVariant {
    fn eq(&self, other: &Self) -> bool {
        self.shader == other.shader
            && self.pass_type == other.pass_type
            && self.keywords == other.keywords
    }
}

impl Eq for ShaderVariant {}

impl Hash for ShaderVariant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shader.hash(state);
        self.pass_type.hash(state);
        self.keywords.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticHost, StaticShader};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn host() -> (StaticHost, ShaderRef) {
        let mut host = StaticHost::new();
        let shader = host.add_shader(StaticShader::new("Lit").with_local_keywords(["_NORMALMAP"]));
        (host, shader)
    }

    #[test]
    fn test_keyword_set_ignores_order_and_duplicates() {
        let ab: KeywordSet = ["A", "B"].into_iter().collect();
        let ba: KeywordSet = ["B", "A"].into_iter().collect();
        let aab: KeywordSet = ["A", "A", "B"].into_iter().collect();
        assert_eq!(ab, ba);
        assert_eq!(ab, aab);
        assert_eq!(aab.len(), 2);
        assert_ne!(ab, ["A"].into_iter().collect::<KeywordSet>());
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let upper: KeywordSet = ["FOG_EXP"].into_iter().collect();
        let lower: KeywordSet = ["fog_exp"].into_iter().collect();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_global_keywords_exclude_local_ones() {
        let (host, shader) = host();
        let variant = ShaderVariant::new(&host, shader, PassType::ForwardBase, ["_NORMALMAP", "FOG_EXP"]);
        assert_eq!(variant.global_keywords(), &["FOG_EXP"].into_iter().collect::<KeywordSet>());
        assert_eq!(variant.keywords().len(), 2);
    }

    #[test]
    fn test_variant_identity_ignores_pass_name() {
        let (host, shader) = host();
        let a = ShaderVariant::new(&host, shader, PassType::ForwardBase, ["A", "B"]).with_pass_name("Forward");
        let b = ShaderVariant::new(&host, shader, PassType::ForwardBase, ["B", "A"]);
        let c = ShaderVariant::new(&host, shader, PassType::ShadowCaster, ["A", "B"]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_signature_keeps_host_order() {
        assert_eq!(keyword_signature(&["FOG_EXP", "INSTANCING_ON"]), "FOG_EXP INSTANCING_ON");
        assert_eq!(keyword_signature::<&str>(&[]), "");
    }

    proptest! {
        #[test]
        fn prop_set_equality_is_order_independent(mut keywords in proptest::collection::vec("[A-Z_]{1,8}", 0..8)) {
            let forward: KeywordSet = keywords.iter().cloned().collect();
            keywords.reverse();
            let doubled: KeywordSet = keywords.iter().chain(keywords.iter()).cloned().collect();
            prop_assert_eq!(forward, doubled);
        }
    }
}
