//! Connected components of a concept graph.
//!
//! Used by the component-decomposed selector to split the input into
//! independent subproblems, and by tests to verify the connectivity
//! invariant of selection results.

use std::collections::{BTreeSet, VecDeque};

use crate::model::{ConceptGraph, ConceptId};

/// One connected component of a concept graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    members: BTreeSet<ConceptId>,
}

impl Component {
    /// Returns the member concept ids.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<ConceptId> {
        &self.members
    }

    /// Returns the number of member concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when the component is empty (never the case for
    /// components produced by [`connected_components`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the smallest member id; components are never empty.
    #[must_use]
    pub fn smallest_id(&self) -> Option<ConceptId> {
        self.members.first().copied()
    }
}

/// Computes the connected components of the graph's undirected adjacency.
///
/// Components are ordered by descending size, ties broken by smallest
/// contained id, so the output is deterministic. Concepts with no
/// propositions form singleton components.
///
/// # Examples
/// ```
/// use kartta_core::{Concept, ConceptGraph, ConceptId, connected_components};
///
/// let mut graph = ConceptGraph::new();
/// graph.insert_concept(Concept::new(ConceptId::new(1), "isolated", 1.0)?)?;
/// let components = connected_components(&graph);
/// assert_eq!(components.len(), 1);
/// assert_eq!(components[0].len(), 1);
/// # Ok::<(), kartta_core::ModelError>(())
/// ```
#[must_use]
pub fn connected_components(graph: &ConceptGraph) -> Vec<Component> {
    let adjacency = graph.adjacency();
    let mut unvisited: BTreeSet<ConceptId> = adjacency.keys().copied().collect();
    let mut components = Vec::new();

    while let Some(&start) = unvisited.iter().next() {
        unvisited.remove(&start);
        let mut members = BTreeSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(id) = queue.pop_front() {
            members.insert(id);
            let Some(neighbours) = adjacency.get(&id) else {
                continue;
            };
            for &neighbour in neighbours {
                if unvisited.remove(&neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        components.push(Component { members });
    }

    components.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| a.smallest_id().cmp(&b.smallest_id()))
    });
    components
}
