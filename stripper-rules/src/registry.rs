//! Declarative registry of rule kinds.
//!
//! Every rule kind is described once here: which of the three evaluation
//! hooks it implements, whether it may appear more than once in a rule list,
//! and which kinds it cannot be combined with. [`RuleList`] enforces the
//! cardinality and exclusion constraints whenever a rule is added.

use crate::types::{RuleConfig, RuleParams};
use crate::LoadError;

/// Every configurable rule kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    IncludeShaderName,
    StripShaderName,
    StripShaderPath,
    StripKeywords,
    StripPlatforms,
    StripHardwareTier,
    StripPasses,
    IncludeInternalShaders,
    StripInternalShaders,
    IncludeHiddenShaders,
    StripHiddenShaders,
    IncludeVariantCatalog,
}

/// Which evaluation hooks a rule kind participates in.
///
/// The decision engine only consults the hooks declared here; a hook that is
/// not declared never contributes to the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleCapabilities {
    /// The rule restricts itself to a subset of shaders.
    pub scope_gate: bool,
    /// The rule may vote to keep a variant.
    pub include_vote: bool,
    /// The rule may vote to strip a variant.
    pub strip_vote: bool,
}

impl RuleCapabilities {
    const INCLUDE: Self = Self {
        scope_gate: false,
        include_vote: true,
        strip_vote: false,
    };
    const STRIP: Self = Self {
        scope_gate: false,
        include_vote: false,
        strip_vote: true,
    };
    const SCOPED_INCLUDE: Self = Self {
        scope_gate: true,
        include_vote: true,
        strip_vote: false,
    };
    const SCOPED_STRIP: Self = Self {
        scope_gate: true,
        include_vote: false,
        strip_vote: true,
    };
    const INCLUDE_AND_STRIP: Self = Self {
        scope_gate: false,
        include_vote: true,
        strip_vote: true,
    };
}

/// Static metadata for a rule kind.
#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    pub kind: RuleKind,
    /// Human readable name, e.g. "Strip Keywords".
    pub display_name: &'static str,
    pub capabilities: RuleCapabilities,
    /// At most one rule of this kind per list.
    pub allow_once: bool,
    /// Kinds that may not share a list with this one.
    pub exclusive_with: &'static [RuleKind],
}

impl RuleKind {
    /// All kinds, ordered by name as presented in "add rule" menus.
    pub const ALL: [Self; 12] = [
        Self::IncludeHiddenShaders,
        Self::IncludeInternalShaders,
        Self::IncludeShaderName,
        Self::IncludeVariantCatalog,
        Self::StripHardwareTier,
        Self::StripHiddenShaders,
        Self::StripInternalShaders,
        Self::StripKeywords,
        Self::StripPasses,
        Self::StripPlatforms,
        Self::StripShaderName,
        Self::StripShaderPath,
    ];

    /// Returns the registry entry for this kind.
    pub fn descriptor(self) -> RuleDescriptor {
        use RuleCapabilities as Caps;
        match self {
            Self::IncludeShaderName => entry(self, "Include Shader Name", Caps::INCLUDE, false, &[]),
            Self::StripShaderName => entry(self, "Strip Shader Name", Caps::STRIP, false, &[]),
            Self::StripShaderPath => entry(self, "Strip Shader Path", Caps::STRIP, false, &[]),
            Self::StripKeywords => entry(self, "Strip Keywords", Caps::STRIP, false, &[]),
            Self::StripPlatforms => entry(self, "Strip Platforms", Caps::STRIP, false, &[]),
            Self::StripHardwareTier => entry(self, "Strip Hardware Tier", Caps::STRIP, false, &[]),
            Self::StripPasses => entry(self, "Strip Passes", Caps::STRIP, false, &[]),
            Self::IncludeInternalShaders => entry(
                self,
                "Include Internal Shaders",
                Caps::SCOPED_INCLUDE,
                true,
                &[Self::StripInternalShaders],
            ),
            Self::StripInternalShaders => entry(
                self,
                "Strip Internal Shaders",
                Caps::SCOPED_STRIP,
                true,
                &[Self::IncludeInternalShaders],
            ),
            Self::IncludeHiddenShaders => entry(
                self,
                "Include Hidden Shaders",
                Caps::SCOPED_INCLUDE,
                true,
                &[Self::StripHiddenShaders],
            ),
            Self::StripHiddenShaders => entry(
                self,
                "Strip Hidden Shaders",
                Caps::SCOPED_STRIP,
                true,
                &[Self::IncludeHiddenShaders],
            ),
            Self::IncludeVariantCatalog => entry(
                self,
                "Include Variant Catalog",
                Caps::INCLUDE_AND_STRIP,
                false,
                &[],
            ),
        }
    }

    /// Shorthand for `self.descriptor().display_name`.
    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    /// Menu path for "add rule" menus: "Include/..." or "Strip/...".
    pub fn menu_path(self) -> String {
        self.display_name().replacen(' ', "/", 1)
    }

    fn excludes(self, other: Self) -> bool {
        self.descriptor().exclusive_with.contains(&other)
            || other.descriptor().exclusive_with.contains(&self)
    }
}

const fn entry(
    kind: RuleKind,
    display_name: &'static str,
    capabilities: RuleCapabilities,
    allow_once: bool,
    exclusive_with: &'static [RuleKind],
) -> RuleDescriptor {
    RuleDescriptor {
        kind,
        display_name,
        capabilities,
        allow_once,
        exclusive_with,
    }
}

impl RuleParams {
    /// The registry kind of these parameters.
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::IncludeShaderName(_) => RuleKind::IncludeShaderName,
            Self::StripShaderName(_) => RuleKind::StripShaderName,
            Self::StripShaderPath(_) => RuleKind::StripShaderPath,
            Self::StripKeywords(_) => RuleKind::StripKeywords,
            Self::StripPlatforms(_) => RuleKind::StripPlatforms,
            Self::StripHardwareTier(_) => RuleKind::StripHardwareTier,
            Self::StripPasses(_) => RuleKind::StripPasses,
            Self::IncludeInternalShaders => RuleKind::IncludeInternalShaders,
            Self::StripInternalShaders => RuleKind::StripInternalShaders,
            Self::IncludeHiddenShaders => RuleKind::IncludeHiddenShaders,
            Self::StripHiddenShaders => RuleKind::StripHiddenShaders,
            Self::IncludeVariantCatalog(_) => RuleKind::IncludeVariantCatalog,
        }
    }
}

impl RuleConfig {
    /// The registry kind of this rule.
    pub const fn kind(&self) -> RuleKind {
        self.rule.kind()
    }
}

/// Ordered rule list that upholds the registry constraints.
///
/// Order is significant: rules are evaluated front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    rules: Vec<RuleConfig>,
}

impl RuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether a rule of `kind` may be added to the current list.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::DuplicateRule` when `kind` is allowed once and already
    /// present, and `LoadError::ExclusiveRule` when a present rule excludes it.
    pub fn can_add(&self, kind: RuleKind) -> Result<(), LoadError> {
        for existing in self.rules.iter().map(RuleConfig::kind) {
            if existing == kind && kind.descriptor().allow_once {
                return Err(LoadError::DuplicateRule(kind.display_name()));
            }
            if kind.excludes(existing) {
                return Err(LoadError::ExclusiveRule(
                    kind.display_name(),
                    existing.display_name(),
                ));
            }
        }
        Ok(())
    }

    /// Appends a rule after checking the registry constraints.
    ///
    /// # Errors
    ///
    /// See [`RuleList::can_add`].
    pub fn push(&mut self, rule: RuleConfig) -> Result<(), LoadError> {
        self.can_add(rule.kind())?;
        self.rules.push(rule);
        Ok(())
    }

    /// Removes and returns the rule at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<RuleConfig> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Moves the rule at `from` so that it ends up at position `to`.
    ///
    /// Returns `false` when either index is out of range.
    pub fn move_rule(&mut self, from: usize, to: usize) -> bool {
        if from >= self.rules.len() || to >= self.rules.len() {
            return false;
        }
        let rule = self.rules.remove(from);
        self.rules.insert(to, rule);
        true
    }

    /// Kinds that could be added right now, in menu order.
    pub fn available_kinds(&self) -> Vec<RuleKind> {
        RuleKind::ALL
            .into_iter()
            .filter(|kind| self.can_add(*kind).is_ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleConfig> {
        self.rules.iter()
    }

    /// Mutable access to a rule's enabled flag, description and parameters.
    ///
    /// The kind of a rule cannot be changed through this handle without
    /// bypassing the constraints, so callers replace whole rules via
    /// `remove` + `push` instead.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut RuleConfig> {
        self.rules.get_mut(index)
    }

    pub fn into_vec(self) -> Vec<RuleConfig> {
        self.rules
    }
}

impl TryFrom<Vec<RuleConfig>> for RuleList {
    type Error = LoadError;

    fn try_from(rules: Vec<RuleConfig>) -> Result<Self, Self::Error> {
        let mut list = Self::new();
        for rule in rules {
            list.push(rule)?;
        }
        Ok(list)
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a RuleConfig;
    type IntoIter = std::slice::Iter<'a, RuleConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
