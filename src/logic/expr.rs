//! Formula model for multi-agent epistemic statements.
//!
//! Every node is an immutable value tree. Sharing between nodes happens only
//! through `Variable` identity: the same variable id may occur anywhere in a
//! tree and both renderers must treat every occurrence identically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Placeholder token marking the agent slot in a predicate template.
pub const AGENT_SLOT: &str = "{agent}";

/// A natural-language predicate with an explicit agent slot.
///
/// Negation and quantifier substitution are structural operations on the
/// templates, so the renderer never has to guess at a copula inside rendered
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Template with an `{agent}` slot, e.g. `"{agent} is muddy"`.
    pub template: String,
    /// Negated template, e.g. `"{agent} is not muddy"`.
    pub negated: String,
    /// The agent name filling the slot for this instance.
    pub subject: String,
}

impl Predicate {
    pub fn new(
        template: impl Into<String>,
        negated: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            template: template.into(),
            negated: negated.into(),
            subject: subject.into(),
        }
    }

    /// Render the predicate with its own subject in the slot.
    pub fn text(&self) -> String {
        self.template.replace(AGENT_SLOT, &self.subject)
    }

    /// Render the negated form with the subject in the slot.
    pub fn negated_text(&self) -> String {
        self.negated.replace(AGENT_SLOT, &self.subject)
    }

    /// Render the template with an arbitrary filler in the slot.
    ///
    /// Used by quantifier rendering ("someone", "everyone", "not everyone").
    pub fn with_slot(&self, filler: &str) -> String {
        self.template.replace(AGENT_SLOT, filler)
    }
}

/// A propositional variable.
///
/// The id is the formal-mode token and must be unique within a problem; the
/// predicate is the natural-mode surface form. Both renderings reference the
/// same variable by the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub id: u32,
    pub predicate: Predicate,
}

impl Variable {
    pub fn new(id: u32, predicate: Predicate) -> Self {
        Self { id, predicate }
    }
}

/// Group quantifier kind over a variable sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantifierKind {
    /// Disjunction over the group.
    Someone,
    /// Conjunction over the group.
    Everyone,
    /// Negated conjunction over the group.
    NotEveryone,
}

impl QuantifierKind {
    /// Filler substituted into the agent slot in natural mode.
    pub fn filler(self) -> &'static str {
        match self {
            Self::Someone => "someone",
            Self::Everyone => "everyone",
            Self::NotEveryone => "not everyone",
        }
    }
}

/// A boolean expression over variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Var(Variable),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Quantifier {
        kind: QuantifierKind,
        vars: Vec<Variable>,
    },
}

impl Expr {
    pub fn var(v: Variable) -> Self {
        Self::Var(v)
    }

    pub fn not(e: Expr) -> Self {
        Self::Not(Box::new(e))
    }

    pub fn and(l: Expr, r: Expr) -> Self {
        Self::And(Box::new(l), Box::new(r))
    }

    pub fn or(l: Expr, r: Expr) -> Self {
        Self::Or(Box::new(l), Box::new(r))
    }

    /// Build a quantifier node.
    ///
    /// Quantifiers over an empty variable sequence are malformed; catching
    /// that is a construction-time concern, not a rendering one.
    pub fn quantifier(kind: QuantifierKind, vars: Vec<Variable>) -> Self {
        debug_assert!(!vars.is_empty(), "quantifier over empty variable group");
        Self::Quantifier { kind, vars }
    }

    /// Collect the set of variable ids reachable from this node.
    pub fn variables_used(&self) -> BTreeSet<u32> {
        let mut ids = BTreeSet::new();
        self.collect_vars(&mut ids);
        ids
    }

    fn collect_vars(&self, ids: &mut BTreeSet<u32>) {
        match self {
            Self::Var(v) => {
                ids.insert(v.id);
            }
            Self::Not(e) => e.collect_vars(ids),
            Self::And(l, r) | Self::Or(l, r) => {
                l.collect_vars(ids);
                r.collect_vars(ids);
            }
            Self::Quantifier { vars, .. } => {
                ids.extend(vars.iter().map(|v| v.id));
            }
        }
    }
}

/// Knowledge operator mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeMode {
    /// The agent believes the subject true.
    KnowsThat,
    /// The agent can determine the subject's truth value either way.
    KnowsWhether,
}

impl KnowledgeMode {
    /// Connective phrase, identical in both surface forms.
    pub fn phrase(self) -> &'static str {
        match self {
            Self::KnowsThat => "knows that",
            Self::KnowsWhether => "knows whether",
        }
    }
}

/// A knowledge statement: `<agent> knows that/whether <subject>`.
///
/// Subjects may themselves be knowledge statements, allowing nested
/// "X knows that Y knows whether ..." chains. The generator guarantees that
/// the immediately nested statement never reuses the same agent; repetition
/// at non-adjacent levels is permitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knowledge {
    pub agent: String,
    pub mode: KnowledgeMode,
    pub subject: Box<Statement>,
}

impl Knowledge {
    pub fn new(agent: impl Into<String>, mode: KnowledgeMode, subject: Statement) -> Self {
        Self {
            agent: agent.into(),
            mode,
            subject: Box::new(subject),
        }
    }

    pub fn variables_used(&self) -> BTreeSet<u32> {
        self.subject.variables_used()
    }
}

/// A statement is either a plain formula or a knowledge statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Formula(Expr),
    Knowledge(Knowledge),
}

impl Statement {
    pub fn variables_used(&self) -> BTreeSet<u32> {
        match self {
            Self::Formula(e) => e.variables_used(),
            Self::Knowledge(k) => k.variables_used(),
        }
    }
}

impl From<Expr> for Statement {
    fn from(e: Expr) -> Self {
        Self::Formula(e)
    }
}

impl From<Knowledge> for Statement {
    fn from(k: Knowledge) -> Self {
        Self::Knowledge(k)
    }
}
