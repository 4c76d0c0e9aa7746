//! Problem aggregate: law, observations, announcements, hypothesis.
//!
//! A `Problem` is an immutable value tree assembled once; rendering is a pure
//! function of the tree and the requested mode.

use crate::logic::{Expr, Render, RenderMode, Statement, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// World-law constraint on variable valuations.
///
/// The trivial laws are dedicated cases rather than sentinel variable names:
/// `Top` constrains nothing, `Bottom` admits no worlds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Law {
    Top,
    Bottom,
    Formula(Expr),
}

impl Law {
    pub fn variables_used(&self) -> BTreeSet<u32> {
        match self {
            Self::Top | Self::Bottom => BTreeSet::new(),
            Self::Formula(e) => e.variables_used(),
        }
    }
}

impl Render for Law {
    fn render(&self, mode: RenderMode) -> String {
        match (self, mode) {
            (Self::Top, RenderMode::Formal) => "LAW Top".to_string(),
            (Self::Bottom, RenderMode::Formal) => "LAW Bottom".to_string(),
            (Self::Formula(e), RenderMode::Formal) => format!("LAW {}", e.render(mode)),
            // Trivial laws say nothing in natural language.
            (Self::Top, RenderMode::Natural) | (Self::Bottom, RenderMode::Natural) => String::new(),
            (Self::Formula(e), RenderMode::Natural) => {
                let text = e.render(mode);
                if text.is_empty() {
                    text
                } else {
                    format!("{text}.")
                }
            }
        }
    }
}

/// A public announcement: "it is publicly announced that `inner` holds".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement(pub Statement);

impl Announcement {
    pub fn new(inner: impl Into<Statement>) -> Self {
        Self(inner.into())
    }

    pub fn variables_used(&self) -> BTreeSet<u32> {
        self.0.variables_used()
    }
}

impl Render for Announcement {
    fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Formal => format!("[ ! {} ]", self.0.render(mode)),
            RenderMode::Natural => {
                format!("It is publicly announced that {}", self.0.render(mode))
            }
        }
    }
}

/// Boolean visibility matrix indexed by (agent row, variable column).
///
/// A true cell means the agent directly observes that variable's truth value.
/// Dimensions always equal `agents x variables` for the owning problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMatrix {
    n_agents: usize,
    n_vars: usize,
    cells: Vec<bool>,
}

impl ObservationMatrix {
    pub fn new(n_agents: usize, n_vars: usize) -> Self {
        Self {
            n_agents,
            n_vars,
            cells: vec![false; n_agents * n_vars],
        }
    }

    pub fn n_agents(&self) -> usize {
        self.n_agents
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    pub fn set(&mut self, agent: usize, var: usize, value: bool) {
        self.cells[agent * self.n_vars + var] = value;
    }

    pub fn observes(&self, agent: usize, var: usize) -> bool {
        self.cells[agent * self.n_vars + var]
    }

    /// Column indices of the true cells in one agent's row, in column order.
    pub fn observed_by(&self, agent: usize) -> Vec<usize> {
        (0..self.n_vars)
            .filter(|&var| self.observes(agent, var))
            .collect()
    }
}

/// A complete epistemic problem instance.
///
/// Read-only after construction; `render` picks the surface form per call, so
/// both renderings of one problem reference the same variable identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub variables: Vec<Variable>,
    pub agents: Vec<String>,
    pub law: Law,
    pub observations: ObservationMatrix,
    pub announcements: Vec<Announcement>,
    pub hypothesis: Statement,
}

impl Problem {
    /// Assemble a problem.
    ///
    /// The observation matrix dimensions must match the agent and variable
    /// sequences; mismatched dimensions are a construction bug.
    pub fn new(
        variables: Vec<Variable>,
        agents: Vec<String>,
        law: Law,
        observations: ObservationMatrix,
        announcements: Vec<Announcement>,
        hypothesis: Statement,
    ) -> Self {
        assert_eq!(observations.n_agents(), agents.len());
        assert_eq!(observations.n_vars(), variables.len());
        Self {
            variables,
            agents,
            law,
            observations,
            announcements,
            hypothesis,
        }
    }

    /// Group the observation matrix into per-agent clauses.
    ///
    /// Agents whose row is all false are silently omitted.
    pub fn observations_text(&self, mode: RenderMode) -> String {
        let mut clauses = Vec::new();
        for (row, agent) in self.agents.iter().enumerate() {
            let observed = self.observations.observed_by(row);
            if observed.is_empty() {
                continue;
            }
            match mode {
                RenderMode::Formal => {
                    let ids: Vec<String> = observed
                        .iter()
                        .map(|&col| self.variables[col].id.to_string())
                        .collect();
                    clauses.push(format!("{agent}:{}", ids.join(",")));
                }
                RenderMode::Natural => {
                    let names: Vec<String> = observed
                        .iter()
                        .map(|&col| self.variables[col].render(mode))
                        .collect();
                    clauses.push(format!(
                        "{agent} knows whether {}.",
                        join_whether(&names)
                    ));
                }
            }
        }
        match mode {
            RenderMode::Formal => {
                if clauses.is_empty() {
                    String::new()
                } else {
                    format!("OBS {}", clauses.join(" "))
                }
            }
            RenderMode::Natural => clauses.join(" "),
        }
    }

    fn announcements_text(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Formal => self
                .announcements
                .iter()
                .map(|a| a.render(mode))
                .collect::<Vec<_>>()
                .join(" "),
            RenderMode::Natural => self
                .announcements
                .iter()
                .map(|a| format!("{}.", a.render(mode)))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Premises only: law, observations, and announcements.
    pub fn premises(&self, mode: RenderMode) -> String {
        join_nonempty(&[
            self.law.render(mode),
            self.observations_text(mode),
            self.announcements_text(mode),
        ])
    }

    /// Hypothesis as a standalone sentence (natural) or bare statement (formal).
    pub fn hypothesis_text(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Formal => self.hypothesis.render(mode),
            RenderMode::Natural => format!("{}.", self.hypothesis.render(mode)),
        }
    }

    /// All variable ids referenced anywhere in the problem.
    pub fn variables_used(&self) -> BTreeSet<u32> {
        let mut ids = self.law.variables_used();
        for announcement in &self.announcements {
            ids.extend(announcement.variables_used());
        }
        ids.extend(self.hypothesis.variables_used());
        ids
    }
}

impl Render for Problem {
    fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Formal => {
                let ids: Vec<String> = self.variables.iter().map(|v| v.id.to_string()).collect();
                join_nonempty(&[
                    format!("VARS {}", ids.join(",")),
                    self.law.render(mode),
                    self.observations_text(mode),
                    format!("VALID? {}", join_nonempty(&[
                        self.announcements_text(mode),
                        self.hypothesis.render(mode),
                    ])),
                ])
            }
            RenderMode::Natural => join_nonempty(&[
                self.premises(mode),
                self.hypothesis_text(mode),
            ]),
        }
    }
}

/// Join the natural names of observed variables:
/// "A", "A and whether B", "A, whether B and whether C".
fn join_whether(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => {
            let head = init.join(", whether ");
            format!("{head} and whether {last}")
        }
    }
}

/// Concatenate segments with single spaces, skipping empty ones.
fn join_nonempty(segments: &[String]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Knowledge, KnowledgeMode, Predicate};
    use pretty_assertions::assert_eq;

    fn muddy(id: u32, subject: &str) -> Variable {
        Variable::new(
            id,
            Predicate::new("{agent} is muddy", "{agent} is not muddy", subject),
        )
    }

    /// The muddy-children example: Alice sees Bob, the disjunction is
    /// announced, so Alice can deduce her own state.
    fn example_problem() -> Problem {
        let v1 = muddy(1, "Alice");
        let v2 = muddy(2, "Bob");
        let mut observations = ObservationMatrix::new(2, 2);
        observations.set(0, 1, true);
        Problem::new(
            vec![v1.clone(), v2.clone()],
            vec!["Alice".to_string(), "Bob".to_string()],
            Law::Top,
            observations,
            vec![Announcement::new(Expr::or(
                Expr::var(v1.clone()),
                Expr::var(v2),
            ))],
            Knowledge::new("Alice", KnowledgeMode::KnowsWhether, Expr::var(v1).into()).into(),
        )
    }

    #[test]
    fn formal_rendering_of_example() {
        let problem = example_problem();
        assert_eq!(
            problem.render(RenderMode::Formal),
            "VARS 1,2 LAW Top OBS Alice:2 VALID? [ ! ( 1 | 2 ) ] Alice knows whether 1"
        );
    }

    #[test]
    fn natural_rendering_of_example() {
        let problem = example_problem();
        assert_eq!(
            problem.render(RenderMode::Natural),
            "Alice knows whether Bob is muddy. \
             It is publicly announced that Alice is muddy or Bob is muddy. \
             Alice knows whether Alice is muddy."
        );
    }

    #[test]
    fn rendering_same_mode_twice_is_identical() {
        let problem = example_problem();
        assert_eq!(
            problem.render(RenderMode::Formal),
            problem.render(RenderMode::Formal)
        );
        assert_eq!(
            problem.render(RenderMode::Natural),
            problem.render(RenderMode::Natural)
        );
    }

    #[test]
    fn variable_ids_invariant_across_modes() {
        let problem = example_problem();
        let before = problem.hypothesis.variables_used();
        let _ = problem.render(RenderMode::Formal);
        let _ = problem.render(RenderMode::Natural);
        assert_eq!(problem.hypothesis.variables_used(), before);
    }

    #[test]
    fn observation_grouping_is_complete() {
        let vars = vec![muddy(1, "Alice"), muddy(2, "Bob"), muddy(3, "Carol")];
        let agents = vec!["Alice".to_string(), "Bob".to_string(), "Carol".to_string()];
        let mut observations = ObservationMatrix::new(3, 3);
        observations.set(0, 0, true);
        observations.set(0, 2, true);
        observations.set(2, 1, true);
        // Bob's row is all false and must produce no clause.
        let problem = Problem::new(
            vars.clone(),
            agents,
            Law::Top,
            observations,
            Vec::new(),
            Statement::Formula(Expr::var(vars[0].clone())),
        );

        assert_eq!(
            problem.observations_text(RenderMode::Formal),
            "OBS Alice:1,3 Carol:2"
        );
        assert_eq!(
            problem.observations_text(RenderMode::Natural),
            "Alice knows whether Alice is muddy and whether Carol is muddy. \
             Carol knows whether Bob is muddy."
        );
    }

    #[test]
    fn observation_separator_with_three_items() {
        let vars = vec![muddy(1, "Alice"), muddy(2, "Bob"), muddy(3, "Carol")];
        let mut observations = ObservationMatrix::new(1, 3);
        for col in 0..3 {
            observations.set(0, col, true);
        }
        let problem = Problem::new(
            vars.clone(),
            vec!["Dan".to_string()],
            Law::Top,
            observations,
            Vec::new(),
            Statement::Formula(Expr::var(vars[0].clone())),
        );
        assert_eq!(
            problem.observations_text(RenderMode::Natural),
            "Dan knows whether Alice is muddy, whether Bob is muddy and whether Carol is muddy."
        );
    }

    #[test]
    fn trivial_law_renders_empty_natural_text_without_stray_whitespace() {
        let problem = example_problem();
        let natural = problem.render(RenderMode::Natural);
        assert!(!natural.contains("  "));
        assert!(!natural.starts_with(' '));

        let formal = problem.render(RenderMode::Formal);
        assert!(formal.contains("LAW Top"));
        assert!(!formal.contains("  "));
    }

    #[test]
    fn nontrivial_law_renders_in_both_modes() {
        let v1 = muddy(1, "Alice");
        let law = Law::Formula(Expr::or(
            Expr::var(v1.clone()),
            Expr::var(muddy(2, "Bob")),
        ));
        assert_eq!(law.render(RenderMode::Formal), "LAW ( 1 | 2 )");
        assert_eq!(
            law.render(RenderMode::Natural),
            "Alice is muddy or Bob is muddy."
        );
    }

    #[test]
    fn bottom_law_renders_formal_token_only() {
        assert_eq!(Law::Bottom.render(RenderMode::Formal), "LAW Bottom");
        assert_eq!(Law::Bottom.render(RenderMode::Natural), "");
    }

    #[test]
    fn announcement_wrapping() {
        let a = Announcement::new(Knowledge::new(
            "Alice",
            KnowledgeMode::KnowsThat,
            Expr::var(muddy(1, "Alice")).into(),
        ));
        assert_eq!(a.render(RenderMode::Formal), "[ ! Alice knows that 1 ]");
        assert_eq!(
            a.render(RenderMode::Natural),
            "It is publicly announced that Alice knows that Alice is muddy"
        );
    }

    #[test]
    #[should_panic]
    fn mismatched_matrix_dimensions_are_rejected() {
        let vars = vec![muddy(1, "Alice")];
        Problem::new(
            vars.clone(),
            vec!["Alice".to_string(), "Bob".to_string()],
            Law::Top,
            ObservationMatrix::new(1, 1),
            Vec::new(),
            Statement::Formula(Expr::var(vars[0].clone())),
        );
    }
}
