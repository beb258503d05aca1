//! Representation of edge coloured graphs as well as
//! their bit-layer blow-up into plain graphs that
//! nauty understands.

mod coloured_graph;
pub use coloured_graph::ColouredGraph;

mod nauty_graph;
pub use nauty_graph::NautyGraph;

/// Edge colour, 0 means that there is no edge.
pub type Colour = u8;
pub type VertexIndex = usize;

pub const NO_EDGE: Colour = 0;

/// Number of bit layers needed to write down every colour up to `max_colour`,
/// i.e. ⌈log2(max_colour + 1)⌉.
pub fn number_layers(max_colour: Colour) -> usize {
    (Colour::BITS - max_colour.leading_zeros()) as usize
}
