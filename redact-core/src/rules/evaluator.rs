// redact-core/src/rules/evaluator.rs
//! Runtime matching of caller groups against compiled rules.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::errors::TransformError;
use crate::field::Scalar;
use crate::methods::Transformer;

/// The pseudo-group used when a caller supplies no groups.
pub const NO_GROUP: &str = "none";

/// The selector identifier that matches every caller group.
pub const WILDCARD_GROUP: &str = "all";

/// One entry of a rule's group selector, e.g. `~admin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSelector {
    pub identifier: String,
    pub inverted: bool,
}

/// A compiled `selector = method(args)` segment.
#[derive(Clone)]
pub struct Rule {
    pub(crate) groups: Vec<GroupSelector>,
    pub(crate) run_on_no_match: bool,
    pub(crate) method: String,
    pub(crate) transformer: Transformer,
}

impl Rule {
    pub fn groups(&self) -> &[GroupSelector] {
        &self.groups
    }

    /// Set when the whole selector was inverted, e.g. `~[admin,csr]`.
    pub fn run_on_no_match(&self) -> bool {
        self.run_on_no_match
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("groups", &self.groups)
            .field("run_on_no_match", &self.run_on_no_match)
            .field("method", &self.method)
            .finish()
    }
}

/// The compiled form of one instruction.
///
/// Immutable and cheap to clone; a single evaluator may be shared by any
/// number of threads.
#[derive(Clone)]
pub struct Evaluator {
    instruction: Arc<str>,
    rules: Arc<[Rule]>,
}

impl Evaluator {
    pub(crate) fn new(instruction: &str, rules: Vec<Rule>) -> Self {
        Self {
            instruction: Arc::from(instruction),
            rules: Arc::from(rules),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Applies the first rule matching the caller's groups to `value`.
    ///
    /// Groups are tried in the order given; with no groups the pseudo-group
    /// `none` is used. For each group the rules are scanned in order:
    ///
    /// * a selector naming the group exactly decides the outcome. A plain
    ///   selector applies the rule, an inverted one leaves the value alone.
    ///   Either way the evaluation reports a match and stops;
    /// * otherwise, if any selector of the rule is inverted or is `all`, or
    ///   the whole selector was inverted, the rule applies and evaluation
    ///   stops.
    ///
    /// Returns `Ok(false)` when no rule matched any group.
    pub fn evaluate<S: AsRef<str>>(&self, value: &mut dyn Scalar, groups: &[S]) -> Result<bool, TransformError> {
        if groups.is_empty() {
            return self.evaluate_group(value, NO_GROUP);
        }
        for group in groups {
            let group = group.as_ref().to_lowercase();
            if self.evaluate_group(value, &group)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn evaluate_group(&self, value: &mut dyn Scalar, group: &str) -> Result<bool, TransformError> {
        for rule in self.rules.iter() {
            let mut run_on_no_match = rule.run_on_no_match;
            for selector in &rule.groups {
                if selector.identifier == group {
                    if selector.inverted {
                        trace!("Group '{}' is excluded from '{}'.", group, self.instruction);
                    } else {
                        trace!("Group '{}' applies '{}' from '{}'.", group, rule.method, self.instruction);
                        (rule.transformer)(&mut *value)?;
                    }
                    return Ok(true);
                }
                if selector.inverted || selector.identifier == WILDCARD_GROUP {
                    run_on_no_match = true;
                }
            }
            if run_on_no_match {
                trace!("Group '{}' falls through to '{}' from '{}'.", group, rule.method, self.instruction);
                (rule.transformer)(&mut *value)?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("instruction", &self.instruction)
            .field("rules", &self.rules)
            .finish()
    }
}
