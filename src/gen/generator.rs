//! Depth-bounded random generation of epistemic problems.
//!
//! The generator is a pure function of the caller's random source: no state
//! persists between calls, so independent problems can be generated in
//! parallel with one seeded RNG per task.

use crate::logic::{
    Announcement, Expr, Knowledge, KnowledgeMode, Law, ObservationMatrix, Predicate, Problem,
    QuantifierKind, Render, RenderMode, Statement, Variable,
};
use crate::models::{GeneratorConfig, Result, SmcgenError, Verdict};
use crate::verifier::Verifier;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// A problem that passed the sanity check.
#[derive(Debug, Clone)]
pub struct CheckedProblem {
    pub problem: Problem,
    /// Announcement regenerations consumed before acceptance.
    pub sanity_retries: u32,
}

/// Random generator over a fixed variable, agent, and quantifier pool.
pub struct ProblemGenerator {
    variables: Vec<Variable>,
    agents: Vec<String>,
    /// Leaf choices: every variable, plus quantifier instances if configured.
    atoms: Vec<Expr>,
    depth: u32,
    knowledge_depth: u32,
    n_announcements: usize,
    n_observations: usize,
    random_law: bool,
    max_sanity_retries: u32,
    /// Id reserved for the sanity-check probe; never in the pool.
    probe_id: u32,
}

impl ProblemGenerator {
    /// Build a generator from config, instantiating one variable per
    /// (predicate, agent) pair.
    pub fn new(config: &GeneratorConfig, agents: Vec<String>) -> Self {
        let mut variables = Vec::with_capacity(config.predicates.len() * agents.len());
        let mut id = 1u32;
        for spec in &config.predicates {
            for agent in &agents {
                variables.push(Variable::new(
                    id,
                    Predicate::new(&spec.template, &spec.negated, agent),
                ));
                id += 1;
            }
        }

        let mut atoms: Vec<Expr> = variables.iter().cloned().map(Expr::Var).collect();
        if config.include_quantifiers {
            // One quantifier group per predicate, spanning all agents.
            for group in variables.chunks(agents.len()) {
                for kind in [
                    QuantifierKind::Someone,
                    QuantifierKind::Everyone,
                    QuantifierKind::NotEveryone,
                ] {
                    atoms.push(Expr::quantifier(kind, group.to_vec()));
                }
            }
        }

        Self {
            variables,
            agents,
            atoms,
            depth: config.depth,
            knowledge_depth: config.knowledge_depth,
            n_announcements: config.n_announcements,
            n_observations: config.n_observations,
            random_law: config.random_law,
            max_sanity_retries: config.max_sanity_retries,
            probe_id: id,
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    /// Generate a random boolean expression of the given depth.
    ///
    /// Depth 0 draws an atom uniformly and negates it half the time. Deeper
    /// levels always conjoin two subtrees: And-only chaining keeps generated
    /// statements analyzable, a deliberate distribution choice (Or stays
    /// fully supported in the model and renderer).
    pub fn random_expression(&self, rng: &mut impl Rng, depth: u32) -> Expr {
        if depth == 0 {
            let atom = self.atoms[rng.gen_range(0..self.atoms.len())].clone();
            if rng.gen_bool(0.5) {
                Expr::not(atom)
            } else {
                atom
            }
        } else {
            Expr::and(
                self.random_expression(rng, depth - 1),
                self.random_expression(rng, depth - 1),
            )
        }
    }

    /// Generate a random knowledge statement nested to the given depth.
    ///
    /// The agent at each level is drawn from the pool minus the agent of the
    /// immediately enclosing level, so adjacent levels never repeat an agent.
    /// Non-adjacent repetition is permitted.
    pub fn random_knowledge(
        &self,
        rng: &mut impl Rng,
        depth: u32,
        excluded_agent: Option<&str>,
    ) -> Knowledge {
        let mode = if rng.gen_bool(0.5) {
            KnowledgeMode::KnowsThat
        } else {
            KnowledgeMode::KnowsWhether
        };

        let candidates: Vec<&String> = self
            .agents
            .iter()
            .filter(|a| Some(a.as_str()) != excluded_agent)
            .collect();
        let agent = candidates[rng.gen_range(0..candidates.len())].clone();

        let subject = if depth == 0 {
            Statement::Formula(self.random_expression(rng, 0))
        } else {
            Statement::Knowledge(self.random_knowledge(rng, depth - 1, Some(&agent)))
        };

        Knowledge::new(agent, mode, subject)
    }

    fn random_statement(&self, rng: &mut impl Rng) -> Statement {
        if rng.gen_bool(0.5) {
            Statement::Formula(self.random_expression(rng, self.depth))
        } else {
            Statement::Knowledge(self.random_knowledge(rng, self.knowledge_depth, None))
        }
    }

    /// Generate a fresh announcement set.
    pub fn random_announcements(&self, rng: &mut impl Rng) -> Vec<Announcement> {
        (0..self.n_announcements)
            .map(|_| Announcement(self.random_statement(rng)))
            .collect()
    }

    fn random_observations(&self, rng: &mut impl Rng) -> ObservationMatrix {
        let mut matrix = ObservationMatrix::new(self.agents.len(), self.variables.len());
        let columns: Vec<usize> = (0..self.variables.len()).collect();
        for row in 0..self.agents.len() {
            for &col in columns.choose_multiple(rng, self.n_observations) {
                matrix.set(row, col, true);
            }
        }
        matrix
    }

    /// Assemble a complete random problem.
    pub fn random_problem(&self, rng: &mut impl Rng) -> Problem {
        let law = if self.random_law {
            Law::Formula(self.random_expression(rng, 1))
        } else {
            Law::Top
        };

        Problem::new(
            self.variables.clone(),
            self.agents.clone(),
            law,
            self.random_observations(rng),
            self.random_announcements(rng),
            self.random_statement(rng),
        )
    }

    /// Build the sanity-check probe for a candidate problem.
    ///
    /// The probe keeps the candidate's premises and swaps the hypothesis for
    /// a fresh variable whose id is outside the pool, so no premise can
    /// mention it. If the verifier still reports it entailed, the
    /// announcement set entails arbitrary propositions.
    pub fn probe(&self, problem: &Problem) -> Problem {
        let fresh = Variable::new(
            self.probe_id,
            Predicate::new("{agent} is elsewhere", "{agent} is not elsewhere", "nobody"),
        );

        let mut variables = problem.variables.clone();
        variables.push(fresh.clone());

        let mut observations =
            ObservationMatrix::new(problem.agents.len(), variables.len());
        for row in 0..problem.agents.len() {
            for col in 0..problem.variables.len() {
                if problem.observations.observes(row, col) {
                    observations.set(row, col, true);
                }
            }
        }

        Problem::new(
            variables,
            problem.agents.clone(),
            problem.law.clone(),
            observations,
            problem.announcements.clone(),
            Statement::Formula(Expr::var(fresh)),
        )
    }

    /// Generate a problem whose announcement set passes the sanity check.
    ///
    /// An `Entailed` probe verdict means the announcements are internally
    /// contradictory; the announcement set is regenerated and the probe
    /// retried, up to `max_sanity_retries` attempts. Exhausting the budget is
    /// a fatal generation failure for this problem instance. A probe the
    /// verifier cannot parse is a hard failure with no retry.
    pub async fn generate_checked(
        &self,
        rng: &mut StdRng,
        verifier: &dyn Verifier,
    ) -> Result<CheckedProblem> {
        let mut problem = self.random_problem(rng);

        for attempt in 0..self.max_sanity_retries {
            let probe = self.probe(&problem);
            match verifier.verify(&probe.render(RenderMode::Formal)).await? {
                Verdict::Entailed => {
                    debug!(
                        attempt = attempt,
                        "Announcements entail an unmentioned variable, regenerating"
                    );
                    problem = Problem::new(
                        problem.variables,
                        problem.agents,
                        problem.law,
                        problem.observations,
                        self.random_announcements(rng),
                        problem.hypothesis,
                    );
                }
                Verdict::SyntaxError => {
                    return Err(SmcgenError::InvalidQuery(probe.render(RenderMode::Formal)));
                }
                Verdict::NotEntailed | Verdict::Tautology => {
                    return Ok(CheckedProblem {
                        problem,
                        sanity_retries: attempt,
                    });
                }
            }
        }

        Err(SmcgenError::SanityCheckExhausted {
            attempts: self.max_sanity_retries,
        })
    }
}
