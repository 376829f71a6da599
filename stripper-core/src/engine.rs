use std::time::Instant;

use log::{trace, warn};

use crate::aggregator::RunAggregator;
use crate::host::{CompilerData, ShaderHost, ShaderSnippet};
use crate::rules::{build_rules, BuildContext, ConfiguredRule, VariantContext};
use crate::variant::{keyword_signature, ShaderRef};
use crate::{StripError, StripperSettings};

/// Outcome of evaluating one candidate variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The shader is always included and rules were not consulted.
    AlwaysIncluded,
    /// No applicable rule voted strip. Carries the first rule that voted
    /// include, if any.
    Kept { included_by: Option<usize> },
    /// The rule at this index voted strip.
    Stripped { by: usize },
}

impl Decision {
    pub fn is_kept(self) -> bool {
        !matches!(self, Self::Stripped { .. })
    }
}

/// Result of processing one shader pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassOutcome {
    pub kept: usize,
    pub stripped: usize,
}

/// Evaluates candidate variants against an ordered list of rules.
///
/// A variant is kept unless an applicable rule votes to strip it; include
/// votes cannot outweigh a strip vote, whatever the rule order. Shaders in
/// the host's always-included list skip the rules unless
/// `process_always_included_shaders` is set.
#[derive(Debug)]
pub struct DecisionEngine {
    rules: Vec<ConfiguredRule>,
    process_always_included_shaders: bool,
    is_development_build: bool,
}

impl DecisionEngine {
    pub fn new(
        rules: Vec<ConfiguredRule>,
        process_always_included_shaders: bool,
        is_development_build: bool,
    ) -> Self {
        Self {
            rules,
            process_always_included_shaders,
            is_development_build,
        }
    }

    /// Builds the enabled rules of `settings`.
    ///
    /// # Errors
    ///
    /// Returns `StripError::InvalidPattern` if a rule's filter is malformed.
    pub fn from_settings(
        settings: &StripperSettings,
        ctx: &BuildContext,
        is_development_build: bool,
    ) -> Result<Self, StripError> {
        Ok(Self::new(
            build_rules(&settings.rules, ctx)?,
            settings.process_always_included_shaders,
            is_development_build,
        ))
    }

    /// Runs every rule's `initialize` hook, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first rule that cannot initialize.
    pub fn initialize(&mut self, host: &dyn ShaderHost) -> Result<(), StripError> {
        for configured in &mut self.rules {
            configured.rule.initialize(host)?;
        }
        Ok(())
    }

    pub fn rules(&self) -> &[ConfiguredRule] {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Whether `shader` bypasses rule evaluation.
    pub fn bypasses_rules(&self, host: &dyn ShaderHost, shader: ShaderRef) -> bool {
        !self.process_always_included_shaders && host.is_always_included(shader)
    }

    /// Decides the fate of a single candidate.
    pub fn decide(&self, ctx: &VariantContext<'_>) -> Decision {
        if self.bypasses_rules(ctx.host, ctx.shader) {
            return Decision::AlwaysIncluded;
        }
        self.evaluate_rules(ctx)
    }

    fn evaluate_rules(&self, ctx: &VariantContext<'_>) -> Decision {
        let mut included_by = None;
        for (index, configured) in self.rules.iter().enumerate() {
            let rule = &configured.rule;
            let caps = rule.capabilities();

            if caps.scope_gate {
                match rule.is_applicable(ctx) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        warn!("Rule '{}' failed its scope check: {}", configured.label(), e);
                        continue;
                    }
                }
            }

            if caps.include_vote {
                match rule.should_include(ctx) {
                    Ok(true) => {
                        included_by.get_or_insert(index);
                    }
                    Ok(false) => {}
                    Err(e) => warn!("Rule '{}' failed its include vote: {}", configured.label(), e),
                }
            }

            if caps.strip_vote {
                match rule.should_strip(ctx) {
                    // Nothing after a strip vote can change the outcome.
                    Ok(true) => return Decision::Stripped { by: index },
                    Ok(false) => {}
                    Err(e) => warn!("Rule '{}' failed its strip vote: {}", configured.label(), e),
                }
            }
        }
        Decision::Kept { included_by }
    }

    /// Filters the candidates of one shader pass in place.
    ///
    /// Survivors keep their relative order. Every decision is recorded in
    /// `aggregator` under the pass key.
    pub fn process_variants(
        &self,
        host: &dyn ShaderHost,
        shader: ShaderRef,
        snippet: &ShaderSnippet,
        candidates: &mut Vec<CompilerData>,
        aggregator: &mut RunAggregator,
    ) -> PassOutcome {
        let started = Instant::now();
        let shader_name = host.shader_name(shader).unwrap_or_default();
        let key = RunAggregator::pass_key(shader_name, snippet.pass_type, &snippet.pass_name);
        let slot = aggregator.slot(&key);
        let bypass = self.bypasses_rules(host, shader);
        let mut outcome = PassOutcome::default();

        candidates.retain(|data| {
            let decision = if bypass {
                Decision::AlwaysIncluded
            } else {
                self.evaluate_rules(&VariantContext {
                    host,
                    shader,
                    shader_name,
                    snippet,
                    data,
                    is_development_build: self.is_development_build,
                })
            };
            let signature = keyword_signature(&data.keywords);
            if let Decision::Stripped { by } = decision {
                trace!(
                    "Stripped {key} [{signature}] by '{}'",
                    self.rules[by].label()
                );
                outcome.stripped += 1;
            } else {
                outcome.kept += 1;
            }
            let kept = decision.is_kept();
            aggregator.record(slot, signature, kept);
            kept
        });

        aggregator.add_strip_time(started.elapsed());
        outcome
    }
}
