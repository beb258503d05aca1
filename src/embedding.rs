//! Colour preserving embeddings of small pattern graphs into larger targets.

use std::ops::ControlFlow;

use crate::graph::{ColouredGraph, VertexIndex, NO_EDGE};

/// `embedding[v]` is the target vertex of pattern vertex `v`.
pub type Embedding = Vec<VertexIndex>;

/// Whether pattern vertex `assignment.len()` may go to `candidate`.
/// Uncoloured pattern pairs don't constrain the target.
fn is_consistent(
    pattern: &ColouredGraph,
    target: &ColouredGraph,
    assignment: &[VertexIndex],
    candidate: VertexIndex,
) -> bool {
    let next = assignment.len();
    assignment
        .iter()
        .enumerate()
        .all(|(pattern_vertex, target_vertex)| {
            let colour = pattern.get_edge(pattern_vertex, next);
            colour == NO_EDGE || target.get_edge(*target_vertex, candidate) == colour
        })
}

/// Depth first search over the pattern vertices in ascending order.
/// `used[t]` marks the target vertices taken by `assignment`.
fn extend(
    pattern: &ColouredGraph,
    target: &ColouredGraph,
    assignment: &mut Vec<VertexIndex>,
    used: &mut [bool],
    on_complete: &mut dyn FnMut(&[VertexIndex]) -> ControlFlow<()>,
) -> ControlFlow<()> {
    if assignment.len() == pattern.size() {
        return on_complete(assignment);
    }

    for candidate in 0..target.size() {
        if used[candidate] || !is_consistent(pattern, target, assignment, candidate) {
            continue;
        }

        used[candidate] = true;
        assignment.push(candidate);
        let flow = extend(pattern, target, assignment, used, on_complete);
        assignment.pop();
        used[candidate] = false;

        if flow.is_break() {
            return flow;
        }
    }

    ControlFlow::Continue(())
}

fn search(
    pattern: &ColouredGraph,
    target: &ColouredGraph,
    on_complete: &mut dyn FnMut(&[VertexIndex]) -> ControlFlow<()>,
) {
    if pattern.size() > target.size() {
        return;
    }

    let mut assignment = Vec::with_capacity(pattern.size());
    let mut used = vec![false; target.size()];
    let _ = extend(pattern, target, &mut assignment, &mut used, on_complete);
}

/// Every embedding of `pattern` into `target`, including those that
/// only differ by an automorphism, in lexicographic order.
pub fn find_all(pattern: &ColouredGraph, target: &ColouredGraph) -> Vec<Embedding> {
    let mut embeddings = Vec::new();
    search(pattern, target, &mut |embedding| {
        embeddings.push(embedding.to_vec());
        ControlFlow::Continue(())
    });
    embeddings
}

pub fn find_first(pattern: &ColouredGraph, target: &ColouredGraph) -> Option<Embedding> {
    let mut first = None;
    search(pattern, target, &mut |embedding| {
        first = Some(embedding.to_vec());
        ControlFlow::Break(())
    });
    first
}

pub fn exists(pattern: &ColouredGraph, target: &ColouredGraph) -> bool {
    find_first(pattern, target).is_some()
}
