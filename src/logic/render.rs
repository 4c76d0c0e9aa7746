//! Dual-format rendering of formula nodes.
//!
//! One pure function per node, dispatched by pattern match. The formal
//! surface form is the SMCDEL query syntax; the natural form is an English
//! sentence fragment. Callers pick the mode at the call site; no node carries
//! format state.

use crate::logic::{Expr, Knowledge, Statement, Variable};

/// Surface form selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// SMCDEL query syntax.
    Formal,
    /// English sentence fragments.
    Natural,
}

/// Render a node into one of the two surface forms.
///
/// Total over all well-formed trees; rendering never fails.
pub trait Render {
    fn render(&self, mode: RenderMode) -> String;
}

impl Render for Variable {
    fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Formal => self.id.to_string(),
            RenderMode::Natural => self.predicate.text(),
        }
    }
}

impl Render for Expr {
    fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Formal => render_formal(self),
            RenderMode::Natural => render_natural(self),
        }
    }
}

fn render_formal(expr: &Expr) -> String {
    match expr {
        Expr::Var(v) => v.id.to_string(),
        Expr::Not(e) => format!("~ {}", render_formal(e)),
        Expr::And(l, r) => format!("( {} & {} )", render_formal(l), render_formal(r)),
        Expr::Or(l, r) => format!("( {} | {} )", render_formal(l), render_formal(r)),
        Expr::Quantifier { kind, vars } => {
            let ids: Vec<String> = vars.iter().map(|v| v.id.to_string()).collect();
            match kind {
                crate::logic::QuantifierKind::Someone => format!("({})", ids.join("|")),
                crate::logic::QuantifierKind::Everyone => format!("({})", ids.join("&")),
                crate::logic::QuantifierKind::NotEveryone => format!("~({})", ids.join("&")),
            }
        }
    }
}

fn render_natural(expr: &Expr) -> String {
    match expr {
        Expr::Var(v) => v.predicate.text(),
        // Negation is structural: variables carry an explicit negated
        // template, double negation cancels, and anything composite gets an
        // explicit "it is not the case that" wrapper.
        Expr::Not(e) => match e.as_ref() {
            Expr::Var(v) => v.predicate.negated_text(),
            Expr::Not(inner) => render_natural(inner),
            other => format!("it is not the case that {}", render_natural(other)),
        },
        Expr::And(l, r) => join_connective(render_natural(l), render_natural(r), "and"),
        Expr::Or(l, r) => join_connective(render_natural(l), render_natural(r), "or"),
        Expr::Quantifier { kind, vars } => vars
            .first()
            .map(|v| v.predicate.with_slot(kind.filler()))
            .unwrap_or_default(),
    }
}

/// Join two clauses, collapsing identical sides to a single occurrence.
///
/// The generator freely produces `And(e, e)`; "Alice is muddy and Alice is
/// muddy" reads as nonsense, so the duplicate collapses.
fn join_connective(left: String, right: String, connective: &str) -> String {
    if left == right {
        left
    } else {
        format!("{left} {connective} {right}")
    }
}

impl Render for Knowledge {
    fn render(&self, mode: RenderMode) -> String {
        format!(
            "{} {} {}",
            self.agent,
            self.mode.phrase(),
            self.subject.render(mode)
        )
    }
}

impl Render for Statement {
    fn render(&self, mode: RenderMode) -> String {
        match self {
            Statement::Formula(e) => e.render(mode),
            Statement::Knowledge(k) => k.render(mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{KnowledgeMode, Predicate, QuantifierKind};
    use pretty_assertions::assert_eq;

    fn muddy(id: u32, subject: &str) -> Variable {
        Variable::new(
            id,
            Predicate::new("{agent} is muddy", "{agent} is not muddy", subject),
        )
    }

    #[test]
    fn formal_connectives_are_parenthesized() {
        let e = Expr::or(Expr::var(muddy(1, "Alice")), Expr::var(muddy(2, "Bob")));
        assert_eq!(e.render(RenderMode::Formal), "( 1 | 2 )");

        let e = Expr::and(Expr::not(Expr::var(muddy(1, "Alice"))), Expr::var(muddy(2, "Bob")));
        assert_eq!(e.render(RenderMode::Formal), "( ~ 1 & 2 )");
    }

    #[test]
    fn formal_quantifiers() {
        let vars = vec![muddy(1, "Alice"), muddy(2, "Bob"), muddy(3, "Carol")];
        assert_eq!(
            Expr::quantifier(QuantifierKind::Someone, vars.clone()).render(RenderMode::Formal),
            "(1|2|3)"
        );
        assert_eq!(
            Expr::quantifier(QuantifierKind::Everyone, vars.clone()).render(RenderMode::Formal),
            "(1&2&3)"
        );
        assert_eq!(
            Expr::quantifier(QuantifierKind::NotEveryone, vars).render(RenderMode::Formal),
            "~(1&2&3)"
        );
    }

    #[test]
    fn natural_negation_uses_negated_template() {
        let e = Expr::not(Expr::var(muddy(1, "Alice")));
        assert_eq!(e.render(RenderMode::Natural), "Alice is not muddy");
        assert_eq!(e.render(RenderMode::Formal), "~ 1");
    }

    #[test]
    fn natural_double_negation_cancels() {
        let e = Expr::not(Expr::not(Expr::var(muddy(1, "Alice"))));
        assert_eq!(e.render(RenderMode::Natural), "Alice is muddy");
    }

    #[test]
    fn natural_negation_of_composite_is_explicit() {
        let e = Expr::not(Expr::and(
            Expr::var(muddy(1, "Alice")),
            Expr::var(muddy(2, "Bob")),
        ));
        assert_eq!(
            e.render(RenderMode::Natural),
            "it is not the case that Alice is muddy and Bob is muddy"
        );
    }

    #[test]
    fn natural_connective_collapse() {
        let v = Expr::var(muddy(1, "Alice"));
        let and = Expr::and(v.clone(), v.clone());
        let or = Expr::or(v.clone(), v.clone());
        assert_eq!(and.render(RenderMode::Natural), v.render(RenderMode::Natural));
        assert_eq!(or.render(RenderMode::Natural), v.render(RenderMode::Natural));
        // The formal form keeps both sides.
        assert_eq!(and.render(RenderMode::Formal), "( 1 & 1 )");
    }

    #[test]
    fn natural_quantifier_substitutes_agent_slot() {
        let vars = vec![muddy(1, "Alice"), muddy(2, "Bob")];
        assert_eq!(
            Expr::quantifier(QuantifierKind::Someone, vars.clone()).render(RenderMode::Natural),
            "someone is muddy"
        );
        assert_eq!(
            Expr::quantifier(QuantifierKind::NotEveryone, vars).render(RenderMode::Natural),
            "not everyone is muddy"
        );
    }

    #[test]
    fn knowledge_renders_in_both_modes() {
        let inner = Knowledge::new(
            "Bob",
            KnowledgeMode::KnowsWhether,
            Expr::var(muddy(1, "Alice")).into(),
        );
        let outer = Knowledge::new("Alice", KnowledgeMode::KnowsThat, inner.into());
        assert_eq!(
            outer.render(RenderMode::Formal),
            "Alice knows that Bob knows whether 1"
        );
        assert_eq!(
            outer.render(RenderMode::Natural),
            "Alice knows that Bob knows whether Alice is muddy"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let e = Expr::and(
            Expr::not(Expr::var(muddy(1, "Alice"))),
            Expr::var(muddy(2, "Bob")),
        );
        assert_eq!(e.render(RenderMode::Formal), e.render(RenderMode::Formal));
        assert_eq!(e.render(RenderMode::Natural), e.render(RenderMode::Natural));
    }

    #[test]
    fn variable_identity_is_mode_invariant() {
        let s: Statement = Expr::and(
            Expr::var(muddy(1, "Alice")),
            Expr::not(Expr::var(muddy(2, "Bob"))),
        )
        .into();
        let before = s.variables_used();
        let _ = s.render(RenderMode::Formal);
        let _ = s.render(RenderMode::Natural);
        assert_eq!(s.variables_used(), before);
    }
}
