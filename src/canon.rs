//! Canonical forms of coloured graphs that don't change
//! when the vertices or the colours get relabeled.

use nauty_Traces_sys::{densenauty, empty_graph, optionblk, statsblk, FALSE, TRUE};
use std::{os::raw::c_int, sync::Mutex};

use crate::graph::{ColouredGraph, NautyGraph};

/// nauty works in static buffers, so only one call may run at a time.
pub(crate) static NAUTY_LOCK: Mutex<()> = Mutex::new(());

/// Key shared by exactly those coloured graphs that are equal up to
/// a vertex permutation and a permutation of the colours.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalForm(Vec<u64>);

/// Something that relabels a plain graph canonically,
/// respecting the cells of its partition.
pub trait CanonicalFormOracle: Sync {
    /// Adjacency setwords of the canonically relabeled graph.
    fn canonical_adjacency(&self, graph: NautyGraph) -> Vec<u64>;
}

/// Dense nauty.
#[derive(Debug, Default, Clone, Copy)]
pub struct Nauty;

impl CanonicalFormOracle for Nauty {
    fn canonical_adjacency(&self, mut graph: NautyGraph) -> Vec<u64> {
        debug_assert!(graph.check_valid());
        let (n, m) = graph.graph_repr_sizes();
        let mut canonical_graph = empty_graph(m, n);

        if n == 0 {
            return canonical_graph;
        }

        let mut options = optionblk::default();
        options.getcanon = TRUE;
        options.defaultptn = FALSE;
        let mut stats = statsblk::default();
        let mut orbits = vec![0 as c_int; n];

        // A poisoned lock only tells that another thread panicked.
        let _guard = NAUTY_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Safety: Call to nauty library function with buffers
        // sized for n vertices and m setwords per vertex.
        unsafe {
            densenauty(
                graph.adjacency_matrix.as_mut_ptr(),
                graph.vertex_order.as_mut_ptr(),
                graph.partition.as_mut_ptr(),
                orbits.as_mut_ptr(),
                &mut options,
                &mut stats,
                m as c_int,
                n as c_int,
                canonical_graph.as_mut_ptr(),
            );
        }

        canonical_graph
    }
}

/// Normalizes the vertex order through the oracle and
/// the colour names by trying every colour permutation.
#[derive(Debug, Default, Clone)]
pub struct Canonicaliser<O: CanonicalFormOracle = Nauty> {
    oracle: O,
}

impl<O: CanonicalFormOracle> Canonicaliser<O> {
    pub fn new(oracle: O) -> Self {
        Canonicaliser { oracle }
    }

    /// The smallest oracle answer over all `max_colour!` recolourings.
    pub fn canonical_form(&self, graph: &ColouredGraph) -> CanonicalForm {
        graph
            .colour_permutations()
            .map(|weak_isomorph| {
                let nauty_graph = NautyGraph::from_coloured_graph(&weak_isomorph);
                CanonicalForm(self.oracle.canonical_adjacency(nauty_graph))
            })
            .min()
            .expect("The identity is always a colour permutation!")
    }

    pub fn is_isomorphic(&self, first: &ColouredGraph, second: &ColouredGraph) -> bool {
        first.size() == second.size()
            && first.max_colour() == second.max_colour()
            && self.canonical_form(first) == self.canonical_form(second)
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;
    use crate::graph::VertexIndex;

    /// Tries every relabeling that keeps the cells of the partition
    /// and returns the smallest adjacency. Only usable for tiny graphs.
    struct BruteForce;

    impl CanonicalFormOracle for BruteForce {
        fn canonical_adjacency(&self, graph: NautyGraph) -> Vec<u64> {
            let (n, m) = graph.graph_repr_sizes();
            let has_arc = |start: usize, end: usize| {
                graph.adjacency_matrix[start * m + end / 64] & (1u64 << (63 - end % 64)) != 0
            };

            let mut cells = Vec::new();
            let mut cell = Vec::new();
            for (vertex, marker) in graph.vertex_order.iter().zip(graph.partition.iter()) {
                cell.push(*vertex as usize);
                if *marker == 0 {
                    cells.push(std::mem::take(&mut cell));
                }
            }

            cells
                .iter()
                .map(|cell| cell.iter().copied().permutations(cell.len()))
                .multi_cartesian_product()
                .map(|arrangement| {
                    let labels = arrangement.concat();
                    let mut relabeled = vec![0u64; n * m];
                    for (new_start, old_start) in labels.iter().enumerate() {
                        for (new_end, old_end) in labels.iter().enumerate() {
                            if has_arc(*old_start, *old_end) {
                                relabeled[new_start * m + new_end / 64] |=
                                    1u64 << (63 - new_end % 64);
                            }
                        }
                    }
                    relabeled
                })
                .min()
                .unwrap_or_default()
        }
    }

    /// 2-colourings of K4 without monochromatic triangles:
    /// a 4-cycle with a perfect matching and a path with its complementary path.
    fn cycle_and_matching() -> ColouredGraph {
        ColouredGraph::from_edges(
            4,
            2,
            &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 1), (0, 2, 2), (1, 3, 2)],
        )
    }

    fn path_and_path() -> ColouredGraph {
        ColouredGraph::from_edges(
            4,
            2,
            &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 2, 2), (0, 3, 2), (1, 3, 2)],
        )
    }

    fn mixed_graph() -> ColouredGraph {
        ColouredGraph::from_edges(
            5,
            3,
            &[
                (0, 1, 1),
                (0, 2, 2),
                (0, 3, 3),
                (1, 2, 3),
                (1, 4, 1),
                (2, 4, 2),
                (3, 4, 1),
            ],
        )
    }

    #[test]
    fn test_vertex_permutation_invariance() {
        let canonicaliser = Canonicaliser::<Nauty>::default();
        let graph = mixed_graph();
        let form = canonicaliser.canonical_form(&graph);

        for permutation in (0..graph.size()).permutations(graph.size()) {
            let permuted = graph.permute_vertices(&permutation);
            assert_eq!(form, canonicaliser.canonical_form(&permuted));
        }
    }

    #[test]
    fn test_colour_permutation_invariance() {
        let canonicaliser = Canonicaliser::<Nauty>::default();
        let graph = mixed_graph();
        let form = canonicaliser.canonical_form(&graph);

        for recoloured in graph.colour_permutations() {
            assert_eq!(form, canonicaliser.canonical_form(&recoloured));
            let shuffled = recoloured.permute_vertices(&[3, 0, 4, 1, 2]);
            assert!(canonicaliser.is_isomorphic(&graph, &shuffled));
        }
    }

    #[test]
    fn test_non_isomorphic_colourings_differ() {
        let canonicaliser = Canonicaliser::<Nauty>::default();
        let cycle = cycle_and_matching();
        let path = path_and_path();
        assert!(cycle.is_triangle_free() && path.is_triangle_free());

        assert_ne!(
            canonicaliser.canonical_form(&cycle),
            canonicaliser.canonical_form(&path)
        );
        assert!(!canonicaliser.is_isomorphic(&cycle, &path));

        // The path colouring is self-complementary under swapping the colours.
        let swapped = path.recolour(&[2, 1]);
        assert!(canonicaliser.is_isomorphic(&path, &swapped));
    }

    #[test]
    fn test_layers_are_not_mixed() {
        let canonicaliser = Canonicaliser::<Nauty>::default();

        // Colour 3 sets both bits, colours 1 and 2 only one.
        let two_colours = ColouredGraph::from_edges(3, 3, &[(0, 1, 1), (1, 2, 3)]);
        let one_colour = ColouredGraph::from_edges(3, 3, &[(0, 1, 1), (1, 2, 1)]);
        let other_two = ColouredGraph::from_edges(3, 3, &[(0, 1, 2), (1, 2, 1)]);

        assert!(!canonicaliser.is_isomorphic(&two_colours, &one_colour));
        assert!(canonicaliser.is_isomorphic(&two_colours, &other_two));

        // Every single edge is the same up to the colour names.
        let forms = (1..=3)
            .map(|colour| canonicaliser.canonical_form(&ColouredGraph::with_edge(3, colour)))
            .collect::<Vec<_>>();
        assert!(forms.iter().all_equal());
    }

    #[test]
    fn test_different_sizes_are_not_isomorphic() {
        let canonicaliser = Canonicaliser::<Nauty>::default();
        let small = ColouredGraph::new(2, 2);
        let big = ColouredGraph::new(3, 2);
        assert!(!canonicaliser.is_isomorphic(&small, &big));
    }

    #[test]
    fn test_empty_graph() {
        let canonicaliser = Canonicaliser::<Nauty>::default();
        let empty = ColouredGraph::new(0, 2);
        assert_eq!(
            canonicaliser.canonical_form(&empty),
            canonicaliser.canonical_form(&empty.clone())
        );
    }

    #[test]
    fn test_brute_force_oracle_agrees() {
        let nauty = Canonicaliser::<Nauty>::default();
        let brute_force = Canonicaliser::new(BruteForce);

        let graphs: Vec<ColouredGraph> = vec![
            cycle_and_matching(),
            cycle_and_matching().permute_vertices(&[2, 3, 1, 0]),
            path_and_path(),
            path_and_path().recolour(&[2, 1]),
            ColouredGraph::from_edges(4, 2, &[(0, 1, 1), (2, 3, 1)]),
            ColouredGraph::from_edges(4, 2, &[(0, 1, 1), (1, 2, 1)]),
        ];

        for (first, second) in graphs.iter().tuple_combinations::<(_, _)>() {
            assert_eq!(
                nauty.canonical_form(first) == nauty.canonical_form(second),
                brute_force.canonical_form(first) == brute_force.canonical_form(second),
            );
        }

        assert!(brute_force.is_isomorphic(&graphs[0], &graphs[1]));
        assert!(brute_force.is_isomorphic(&graphs[2], &graphs[3]));
        assert!(!brute_force.is_isomorphic(&graphs[0], &graphs[2]));
        assert!(!brute_force.is_isomorphic(&graphs[4], &graphs[5]));
    }

    #[test]
    fn test_brute_force_vertex_invariance() {
        let brute_force = Canonicaliser::new(BruteForce);
        let graph = ColouredGraph::from_edges(4, 3, &[(0, 1, 1), (1, 2, 2), (2, 3, 3)]);
        let form = brute_force.canonical_form(&graph);

        let permutations: Vec<Vec<VertexIndex>> =
            vec![vec![3, 2, 1, 0], vec![1, 0, 3, 2], vec![2, 0, 3, 1]];
        for permutation in permutations {
            let permuted = graph.permute_vertices(&permutation);
            assert_eq!(form, brute_force.canonical_form(&permuted));
        }
    }
}
