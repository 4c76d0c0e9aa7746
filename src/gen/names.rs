//! Agent name pool.

use rand::seq::SliceRandom;
use rand::Rng;

/// First names used as agent identifiers.
pub const AGENT_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "Dan", "Erin", "Frank", "Grace", "Heidi", "Ivan", "Judy", "Mallory",
    "Niaj", "Olivia", "Peggy", "Rupert", "Sybil", "Trent", "Victor", "Walter", "Wendy",
];

/// Draw `n` distinct agent names.
///
/// Requests beyond the pool size fall back to numbered identifiers so the
/// result always has exactly `n` distinct entries.
pub fn sample_agents(rng: &mut impl Rng, n: usize) -> Vec<String> {
    let mut agents: Vec<String> = AGENT_NAMES
        .choose_multiple(rng, n.min(AGENT_NAMES.len()))
        .map(|s| s.to_string())
        .collect();
    for i in agents.len()..n {
        agents.push(format!("Agent{}", i + 1));
    }
    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_are_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let agents = sample_agents(&mut rng, 5);
        assert_eq!(agents.len(), 5);
        let mut sorted = agents.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
    }

    #[test]
    fn oversized_requests_get_numbered_fallbacks() {
        let mut rng = StdRng::seed_from_u64(7);
        let agents = sample_agents(&mut rng, AGENT_NAMES.len() + 2);
        assert_eq!(agents.len(), AGENT_NAMES.len() + 2);
        assert!(agents.contains(&format!("Agent{}", AGENT_NAMES.len() + 2)));
    }

    #[test]
    fn same_seed_same_agents() {
        let a = sample_agents(&mut StdRng::seed_from_u64(42), 3);
        let b = sample_agents(&mut StdRng::seed_from_u64(42), 3);
        assert_eq!(a, b);
    }
}
