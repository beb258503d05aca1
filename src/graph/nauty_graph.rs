use custom_debug_derive::Debug;
use nauty_Traces_sys::{empty_graph, ADDONEARC, SETWORDSNEEDED};
use std::os::raw::c_int;

use super::ColouredGraph;
use crate::debug::bin_fmt;

/// Orders the bit-vertices layer by layer and puts every layer into
/// its own cell, so that relabelings can't mix up the layers.
fn layer_partition(size: usize, layers: usize) -> (Vec<c_int>, Vec<c_int>) {
    let mut vertex_order = Vec::with_capacity(size * layers);
    let mut partition = Vec::with_capacity(size * layers);

    for layer in 0..layers {
        for vertex in 0..size {
            vertex_order.push((vertex * layers + layer) as c_int);
            // 0 marks the end of a cell.
            partition.push(if vertex + 1 < size { 1 } else { 0 });
        }
    }

    (vertex_order, partition)
}

#[derive(Debug, Clone)]
pub struct NautyGraph {
    /// actual graph
    #[debug(with = "bin_fmt")]
    pub adjacency_matrix: Vec<u64>,
    /// lab
    pub vertex_order: Vec<c_int>,
    /// ptn aka the layer cells
    pub partition: Vec<c_int>,
}

impl NautyGraph {
    /// Plain graph on the bit-vertices: an edge exists iff the encoded
    /// adjacency has it, which covers the layer threads as well as the colour bits.
    pub fn from_coloured_graph(graph: &ColouredGraph) -> NautyGraph {
        let n = graph.number_encoded_vertices();
        let m = SETWORDSNEEDED(n);

        let mut adjacency_matrix = empty_graph(m, n);
        for (start, row) in graph.encoded_adjacency().iter().enumerate() {
            for (end, _) in row.iter().enumerate().filter(|(_, adjacent)| **adjacent) {
                ADDONEARC(&mut adjacency_matrix, start, end, m);
            }
        }

        let (vertex_order, partition) = layer_partition(graph.size(), graph.number_layers());

        NautyGraph {
            adjacency_matrix,
            vertex_order,
            partition,
        }
    }

    pub fn check_valid(&self) -> bool {
        let n = self.partition.len();
        let m = SETWORDSNEEDED(n);

        self.adjacency_matrix.len() == n * m && self.vertex_order.len() == n
    }

    pub fn graph_repr_sizes(&self) -> (usize, usize) {
        let n = self.partition.len();
        (n, SETWORDSNEEDED(n))
    }
}
