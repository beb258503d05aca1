use custom_debug_derive::Debug;
use itertools::Itertools;
use std::fmt;

use super::{number_layers, Colour, VertexIndex, NO_EDGE};
use crate::debug::rows_fmt;

/// Complete or partial edge colouring of a graph with a fixed maximum colour.
///
/// Each vertex is blown up into one bit-vertex per layer. The layers of a
/// vertex form a clique and the edge between the `l`-th layers of two
/// vertices carries bit `l` of their edge colour. Indices out of range,
/// self loops and colours above the maximum violate the contract and panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColouredGraph {
    size: usize,
    max_colour: Colour,
    #[debug(skip)]
    layers: usize,
    #[debug(with = "rows_fmt")]
    encoded: Vec<Vec<bool>>,
}

impl ColouredGraph {
    pub fn new(size: usize, max_colour: Colour) -> Self {
        assert!(max_colour > 0, "A coloured graph needs at least one colour!");

        let layers = number_layers(max_colour);
        let encoded_size = size * layers;
        let mut graph = ColouredGraph {
            size,
            max_colour,
            layers,
            encoded: vec![vec![false; encoded_size]; encoded_size],
        };

        for vertex in 0..size {
            graph.thread_layers(vertex);
        }

        graph
    }

    /// Two vertices joined by a single edge of the given colour.
    pub fn with_edge(max_colour: Colour, colour: Colour) -> Self {
        let mut graph = Self::new(2, max_colour);
        graph.set_edge(0, 1, colour);
        graph
    }

    pub fn from_edges(
        size: usize,
        max_colour: Colour,
        edges: &[(VertexIndex, VertexIndex, Colour)],
    ) -> Self {
        let mut graph = Self::new(size, max_colour);
        for (start, end, colour) in edges {
            graph.set_edge(*start, *end, *colour);
        }
        graph
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_colour(&self) -> Colour {
        self.max_colour
    }

    pub fn number_layers(&self) -> usize {
        self.layers
    }

    pub fn number_encoded_vertices(&self) -> usize {
        self.size * self.layers
    }

    pub fn encoded_adjacency(&self) -> &[Vec<bool>] {
        &self.encoded
    }

    /// Append a new uncoloured vertex. Existing indices and colours stay as they are.
    pub fn add_vertex(&mut self) {
        let new_encoded_size = (self.size + 1) * self.layers;

        for row in self.encoded.iter_mut() {
            row.resize(new_encoded_size, false);
        }
        self.encoded
            .resize(new_encoded_size, vec![false; new_encoded_size]);

        self.size += 1;
        self.thread_layers(self.size - 1);
    }

    /// Overwrite the colour of the edge between `start` and `end`.
    /// Colour 0 removes the edge.
    pub fn set_edge(&mut self, start: VertexIndex, end: VertexIndex, colour: Colour) {
        self.check_bounds(start, end);
        assert_ne!(start, end, "Self loops can't be coloured!");
        assert!(
            colour <= self.max_colour,
            "Colour {} exceeds the maximum colour {}!",
            colour,
            self.max_colour
        );

        let start_base = start * self.layers;
        let end_base = end * self.layers;

        // Every layer is written, so nothing of an older colour survives.
        for layer in 0..self.layers {
            let bit = (colour >> layer) & 1 == 1;
            self.encoded[start_base + layer][end_base + layer] = bit;
            self.encoded[end_base + layer][start_base + layer] = bit;
        }
    }

    pub fn get_edge(&self, start: VertexIndex, end: VertexIndex) -> Colour {
        self.check_bounds(start, end);

        let start_base = start * self.layers;
        let end_base = end * self.layers;

        (0..self.layers)
            .filter(|layer| self.encoded[start_base + layer][end_base + layer])
            .fold(NO_EDGE, |colour, layer| colour | (1 << layer))
    }

    pub fn has_edge(&self, start: VertexIndex, end: VertexIndex) -> bool {
        self.get_edge(start, end) != NO_EDGE
    }

    /// All coloured edges `(i, j, colour)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexIndex, VertexIndex, Colour)> + '_ {
        (0..self.size)
            .tuple_combinations::<(VertexIndex, VertexIndex)>()
            .filter_map(move |(start, end)| {
                let colour = self.get_edge(start, end);
                if colour == NO_EDGE {
                    None
                } else {
                    Some((start, end, colour))
                }
            })
    }

    pub fn is_triangle_free(&self) -> bool {
        !(0..self.size)
            .tuple_combinations::<(VertexIndex, VertexIndex, VertexIndex)>()
            .any(|(first, second, third)| {
                let colour = self.get_edge(first, second);
                colour != NO_EDGE
                    && colour == self.get_edge(first, third)
                    && colour == self.get_edge(second, third)
            })
    }

    /// Whether some triangle of the graph still has an uncoloured edge.
    pub fn is_partial(&self) -> bool {
        (0..self.size)
            .tuple_combinations::<(VertexIndex, VertexIndex, VertexIndex)>()
            .any(|(first, second, third)| {
                !self.has_edge(first, second)
                    || !self.has_edge(first, third)
                    || !self.has_edge(second, third)
            })
    }

    /// Relabel the colours: colour `c > 0` becomes `permutation[c - 1]`.
    pub fn recolour(&self, permutation: &[Colour]) -> Self {
        assert_eq!(
            permutation.len(),
            self.max_colour as usize,
            "A colour permutation has to map every colour!"
        );

        let mut recoloured = Self::new(self.size, self.max_colour);
        for (start, end, colour) in self.edges() {
            recoloured.set_edge(start, end, permutation[colour as usize - 1]);
        }
        recoloured
    }

    /// Every recolouring of the graph under a permutation of `1..=max_colour`,
    /// starting with the identity.
    pub fn colour_permutations(&self) -> impl Iterator<Item = ColouredGraph> + '_ {
        let max_colour = self.max_colour as usize;
        (1..=self.max_colour)
            .permutations(max_colour)
            .map(move |permutation| self.recolour(&permutation))
    }

    /// Relabel the vertices: vertex `v` becomes `permutation[v]`.
    pub fn permute_vertices(&self, permutation: &[VertexIndex]) -> Self {
        assert_eq!(
            permutation.len(),
            self.size,
            "A vertex permutation has to map every vertex!"
        );

        let mut permuted = Self::new(self.size, self.max_colour);
        for (start, end, colour) in self.edges() {
            permuted.set_edge(permutation[start], permutation[end], colour);
        }
        permuted
    }

    /// Subgraph on the given vertices; vertex `vertices[i]` becomes `i`.
    pub fn induced_subgraph(&self, vertices: &[VertexIndex]) -> Self {
        let mut subgraph = Self::new(vertices.len(), self.max_colour);
        for (start, end) in
            (0..vertices.len()).tuple_combinations::<(VertexIndex, VertexIndex)>()
        {
            let colour = self.get_edge(vertices[start], vertices[end]);
            if colour != NO_EDGE {
                subgraph.set_edge(start, end, colour);
            }
        }
        subgraph
    }

    /// The subgraph induced on all vertices joined to `vertex` by an edge of
    /// `colour`, together with these neighbours in ascending order.
    pub fn neighbourhood(&self, vertex: VertexIndex, colour: Colour) -> (Self, Vec<VertexIndex>) {
        assert!(colour != NO_EDGE, "Neighbourhoods are taken along coloured edges!");

        let neighbours = (0..self.size)
            .filter(|other| *other != vertex && self.get_edge(vertex, *other) == colour)
            .collect::<Vec<VertexIndex>>();

        (self.induced_subgraph(&neighbours), neighbours)
    }

    fn check_bounds(&self, start: VertexIndex, end: VertexIndex) {
        assert!(
            start < self.size && end < self.size,
            "Edge ({}, {}) out of bounds for a graph with {} vertices!",
            start,
            end,
            self.size
        );
    }

    /// Connect all layers of a vertex to each other.
    fn thread_layers(&mut self, vertex: VertexIndex) {
        let base = vertex * self.layers;
        for (first, second) in (0..self.layers).tuple_combinations::<(usize, usize)>() {
            self.encoded[base + first][base + second] = true;
            self.encoded[base + second][base + first] = true;
        }
    }
}

/// Dense colour matrix, one row per line.
impl fmt::Display for ColouredGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for start in 0..self.size {
            writeln!(
                f,
                "{}",
                (0..self.size).map(|end| self.get_edge(start, end)).join(" ")
            )?;
        }
        Ok(())
    }
}
