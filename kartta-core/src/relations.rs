//! Relation selection for linked concept pairs.
//!
//! Extraction typically produces several candidate propositions between the
//! same two concepts, differing in phrasing and confidence. A drawn map shows
//! one labelled edge per pair, so the candidates must be reduced to a single
//! best proposition.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::error::ModelError;
use crate::model::{ConceptGraph, ConceptPair, Proposition};

/// Reduces the graph to at most one proposition per linked concept pair.
///
/// Candidates for a pair are grouped by normalised label (case, surrounding
/// whitespace, and internal whitespace runs are ignored), and each group is
/// represented by its most confident member. The winning group has the
/// highest confidence; ties prefer the more frequent phrasing, then the
/// normalised label that sorts first. Concepts are carried over unchanged.
///
/// # Errors
/// Returns [`ModelError`] only if the input graph violates its own
/// invariants, which a [`ConceptGraph`] built through its constructors never
/// does.
///
/// # Examples
/// ```
/// use kartta_core::{
///     Concept, ConceptGraph, ConceptId, Proposition, PropositionId, select_relations,
/// };
///
/// let mut graph = ConceptGraph::new();
/// graph.insert_concept(Concept::new(ConceptId::new(1), "CO2", 2.0)?)?;
/// graph.insert_concept(Concept::new(ConceptId::new(2), "warming", 1.0)?)?;
/// let (a, b) = (ConceptId::new(1), ConceptId::new(2));
/// graph.insert_proposition(Proposition::new(PropositionId::new(1), a, b, "causes", 0.9)?)?;
/// graph.insert_proposition(Proposition::new(PropositionId::new(2), a, b, "drives", 0.6)?)?;
///
/// let reduced = select_relations(&graph)?;
/// assert_eq!(reduced.proposition_count(), 1);
/// # Ok::<(), kartta_core::ModelError>(())
/// ```
#[instrument(
    name = "relations.select",
    err,
    skip(graph),
    fields(concepts = graph.concept_count(), propositions = graph.proposition_count())
)]
pub fn select_relations(graph: &ConceptGraph) -> Result<ConceptGraph, ModelError> {
    let mut by_pair: BTreeMap<ConceptPair, Vec<&Proposition>> = BTreeMap::new();
    for proposition in graph.propositions() {
        by_pair.entry(proposition.pair()).or_default().push(proposition);
    }

    let mut reduced = ConceptGraph::new();
    for concept in graph.concepts() {
        reduced.insert_concept(concept.clone())?;
    }
    for candidates in by_pair.into_values() {
        if let Some(winner) = best_candidate(&candidates) {
            reduced.insert_proposition(winner.clone())?;
        }
    }
    debug!(kept = reduced.proposition_count(), "reduced to one relation per pair");
    Ok(reduced)
}

fn best_candidate<'a>(candidates: &[&'a Proposition]) -> Option<&'a Proposition> {
    if let [single] = candidates {
        return Some(single);
    }

    let mut groups: BTreeMap<String, Vec<&Proposition>> = BTreeMap::new();
    for &candidate in candidates {
        groups
            .entry(normalise(candidate.label()))
            .or_default()
            .push(candidate);
    }

    // Each phrasing is represented by its most confident occurrence, with
    // the smallest id breaking exact confidence ties deterministically.
    groups
        .into_iter()
        .filter_map(|(label, group)| {
            let frequency = group.len();
            group
                .into_iter()
                .max_by(|a, b| {
                    a.confidence()
                        .total_cmp(&b.confidence())
                        .then_with(|| b.id().cmp(&a.id()))
                })
                .map(|leader| (leader, frequency, label))
        })
        .max_by(|(a, freq_a, label_a), (b, freq_b, label_b)| {
            a.confidence()
                .total_cmp(&b.confidence())
                .then_with(|| freq_a.cmp(freq_b))
                .then_with(|| label_b.cmp(label_a))
        })
        .map(|(leader, _, _)| leader)
}

fn normalise(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalise, select_relations};
    use crate::model::{Concept, ConceptGraph, ConceptId, Proposition, PropositionId};

    fn base_graph() -> ConceptGraph {
        let mut graph = ConceptGraph::new();
        for (id, label) in [(1, "emissions"), (2, "warming"), (3, "sea level")] {
            graph
                .insert_concept(Concept::new(ConceptId::new(id), label, 1.0).expect("valid"))
                .expect("unique id");
        }
        graph
    }

    fn add(graph: &mut ConceptGraph, id: u64, a: u64, b: u64, label: &str, confidence: f64) {
        graph
            .insert_proposition(
                Proposition::new(
                    PropositionId::new(id),
                    ConceptId::new(a),
                    ConceptId::new(b),
                    label,
                    confidence,
                )
                .expect("valid"),
            )
            .expect("known endpoints");
    }

    #[test]
    fn keeps_the_most_confident_label() {
        let mut graph = base_graph();
        add(&mut graph, 1, 1, 2, "causes", 0.9);
        add(&mut graph, 2, 1, 2, "relates to", 0.4);
        add(&mut graph, 3, 2, 3, "raises", 0.7);

        let reduced = select_relations(&graph).expect("valid input");
        assert_eq!(reduced.proposition_count(), 2);
        let labels: Vec<&str> = reduced.propositions().iter().map(Proposition::label).collect();
        assert!(labels.contains(&"causes"));
        assert!(labels.contains(&"raises"));
    }

    #[test]
    fn label_variants_pool_into_one_group() {
        let mut graph = base_graph();
        add(&mut graph, 1, 1, 2, "  Causes ", 0.6);
        add(&mut graph, 2, 1, 2, "causes", 0.8);
        add(&mut graph, 3, 2, 1, "leads   to", 0.8);

        let reduced = select_relations(&graph).expect("valid input");
        assert_eq!(reduced.proposition_count(), 1);
        // Equal best confidence; "causes" appears twice, "leads to" once.
        let kept = reduced.propositions().first().expect("one proposition");
        assert_eq!(kept.id(), PropositionId::new(2));
    }

    #[test]
    fn exact_ties_inside_a_group_prefer_the_smallest_id() {
        let mut graph = base_graph();
        add(&mut graph, 9, 1, 2, "causes", 0.8);
        add(&mut graph, 4, 2, 1, "causes", 0.8);

        let reduced = select_relations(&graph).expect("valid input");
        let kept = reduced.propositions().first().expect("one proposition");
        assert_eq!(kept.id(), PropositionId::new(4));
    }

    #[test]
    fn direction_is_ignored_when_pairing_candidates() {
        let mut graph = base_graph();
        add(&mut graph, 1, 1, 2, "causes", 0.5);
        add(&mut graph, 2, 2, 1, "follows from", 0.9);

        let reduced = select_relations(&graph).expect("valid input");
        assert_eq!(reduced.proposition_count(), 1);
        let kept = reduced.propositions().first().expect("one proposition");
        assert_eq!(kept.label(), "follows from");
    }

    #[test]
    fn concepts_survive_even_without_propositions() {
        let graph = base_graph();
        let reduced = select_relations(&graph).expect("valid input");
        assert_eq!(reduced.concept_count(), 3);
        assert_eq!(reduced.proposition_count(), 0);
    }

    #[test]
    fn normalisation_collapses_case_and_whitespace() {
        assert_eq!(normalise("  Leads   To "), "leads to");
        assert_eq!(normalise("causes"), "causes");
    }
}
