//! Orderly generation of triangle-free colourings of complete graphs.
//!
//! A generation holds one representative per class of colourings of
//! `K_n` that are equal up to renaming vertices and colours. The next
//! generation comes from appending a vertex to every representative,
//! trying all colourings of the new edges and keeping each class once.

use rayon::prelude::*;
use std::collections::HashSet;

use crate::{
    canon::{CanonicalForm, CanonicalFormOracle, Canonicaliser, Nauty},
    graph::{Colour, ColouredGraph, VertexIndex, NO_EDGE},
    statistics::GenerationStatistics,
    time, Error, Settings,
};

/// Odometer over `[1, max_colour]^length` where the last position
/// turns fastest. Starts with all ones.
#[derive(Debug, Clone)]
pub struct ColouringGenerator {
    max_colour: Colour,
    colouring: Vec<Colour>,
    started: bool,
    done: bool,
    /// Position to advance instead of the last one.
    advance_at: Option<usize>,
}

impl ColouringGenerator {
    pub fn new(length: usize, max_colour: Colour) -> Self {
        assert!(max_colour > 0, "Colourings need at least one colour!");

        ColouringGenerator {
            max_colour,
            colouring: vec![1; length],
            started: false,
            done: false,
            advance_at: None,
        }
    }

    /// Drop all upcoming colourings that agree with the last one on
    /// positions `0..=position` and return how many were dropped.
    pub fn skip_past(&mut self, position: usize) -> u64 {
        assert!(
            self.started && !self.done,
            "Only a visited colouring can be skipped past!"
        );
        assert!(position < self.colouring.len());
        debug_assert!(self.advance_at.is_none());

        let max_colour = self.max_colour as u64;
        let dropped = self
            .colouring
            .iter()
            .skip(position + 1)
            .fold(0u64, |dropped, colour| {
                dropped
                    .saturating_mul(max_colour)
                    .saturating_add(max_colour - *colour as u64)
            });

        self.advance_at = Some(position);
        dropped
    }

    /// Reset everything right of `position` and count up at `position`
    /// with carry. Returns false on overflow of the first position.
    fn advance(&mut self, position: usize) -> bool {
        for colour in self.colouring.iter_mut().skip(position + 1) {
            *colour = 1;
        }

        for colour in self.colouring[..=position].iter_mut().rev() {
            if *colour < self.max_colour {
                *colour += 1;
                return true;
            }
            *colour = 1;
        }

        false
    }
}

impl Iterator for ColouringGenerator {
    type Item = Vec<Colour>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
        } else {
            let last = self.colouring.len().checked_sub(1);
            let advanced = match self.advance_at.take().or(last) {
                Some(position) => self.advance(position),
                None => false,
            };
            if !advanced {
                self.done = true;
                return None;
            }
        }

        Some(self.colouring.clone())
    }
}

/// The larger vertex of the first monochromatic triangle through `new_vertex`,
/// scanning pairs `i < j` by ascending `j`. That makes the result the smallest
/// position a triangle can be blamed on.
pub fn first_triangle_position(
    graph: &ColouredGraph,
    new_vertex: VertexIndex,
) -> Option<VertexIndex> {
    (0..new_vertex).find(|second| {
        let colour = graph.get_edge(*second, new_vertex);
        colour != NO_EDGE
            && (0..*second).any(|first| {
                graph.get_edge(first, new_vertex) == colour
                    && graph.get_edge(first, *second) == colour
            })
    })
}

pub struct AugmentationEngine<O: CanonicalFormOracle = Nauty> {
    canonicaliser: Canonicaliser<O>,
    max_colour: Colour,
    /// Reject colourings one by one instead of skipping doomed blocks.
    brute_force: bool,
    /// Extend the representatives of a generation on the rayon pool.
    parallel: bool,
}

impl AugmentationEngine<Nauty> {
    pub fn new(max_colour: Colour, settings: &Settings) -> Self {
        Self::with_canonicaliser(Canonicaliser::default(), max_colour, settings)
    }
}

impl<O: CanonicalFormOracle> AugmentationEngine<O> {
    pub fn with_canonicaliser(
        canonicaliser: Canonicaliser<O>,
        max_colour: Colour,
        settings: &Settings,
    ) -> Self {
        assert!(max_colour > 0, "The search needs at least one colour!");

        AugmentationEngine {
            canonicaliser,
            max_colour,
            brute_force: settings.brute_force,
            parallel: settings.parallel,
        }
    }

    /// Generation 2: one edge per colour.
    pub fn seed(&self) -> Vec<ColouredGraph> {
        (1..=self.max_colour)
            .map(|colour| ColouredGraph::with_edge(self.max_colour, colour))
            .collect()
    }

    /// All triangle-free one-vertex extensions of `representative`,
    /// one per canonical form, in the order they were found.
    pub fn extend_representative(
        &self,
        representative: &ColouredGraph,
    ) -> (Vec<(CanonicalForm, ColouredGraph)>, GenerationStatistics) {
        assert_eq!(
            representative.max_colour(),
            self.max_colour,
            "Representative coloured with a different maximum colour!"
        );

        let new_vertex = representative.size();
        let mut extended = representative.clone();
        extended.add_vertex();

        let mut statistics = GenerationStatistics::default();
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        let mut colourings = ColouringGenerator::new(new_vertex, self.max_colour);
        while let Some(colouring) = colourings.next() {
            statistics.colourings_visited += 1;
            for (vertex, colour) in colouring.iter().enumerate() {
                extended.set_edge(vertex, new_vertex, *colour);
            }

            if let Some(position) = first_triangle_position(&extended, new_vertex) {
                statistics.triangle_rejections += 1;
                if !self.brute_force {
                    statistics.colourings_skipped += colourings.skip_past(position);
                }
                continue;
            }

            statistics.canonicalisations += 1;
            let form = self.canonicaliser.canonical_form(&extended);
            if seen.insert(form.clone()) {
                candidates.push((form, extended.clone()));
            } else {
                statistics.duplicates += 1;
            }
        }

        (candidates, statistics)
    }

    /// Extend every representative and keep the first graph of each
    /// canonical form, visiting representatives in the given order.
    pub fn next_generation(
        &self,
        representatives: &[ColouredGraph],
    ) -> (Vec<ColouredGraph>, GenerationStatistics) {
        let extensions: Vec<_> = if self.parallel {
            representatives
                .par_iter()
                .map(|representative| self.extend_representative(representative))
                .collect()
        } else {
            representatives
                .iter()
                .map(|representative| self.extend_representative(representative))
                .collect()
        };

        let mut statistics = GenerationStatistics {
            vertices: representatives.first().map_or(0, |first| first.size() + 1),
            representatives: representatives.len(),
            ..Default::default()
        };
        let mut seen = HashSet::new();
        let mut generation = Vec::new();

        for (candidates, partial_statistics) in extensions {
            statistics.absorb(&partial_statistics);
            for (form, graph) in candidates {
                if seen.insert(form) {
                    generation.push(graph);
                } else {
                    statistics.duplicates += 1;
                }
            }
        }

        statistics.kept = generation.len();
        (generation, statistics)
    }

    /// Grow `graphs` (all of size `start - 1`) generation by generation up
    /// to `stop` vertices. Every finished generation is handed to `on_generation`.
    pub fn run<F>(
        &self,
        mut graphs: Vec<ColouredGraph>,
        start: usize,
        stop: usize,
        mut on_generation: F,
    ) -> Result<Vec<ColouredGraph>, Error>
    where
        F: FnMut(&[ColouredGraph], &GenerationStatistics) -> Result<(), Error>,
    {
        assert!(start >= 3, "Generation 2 is the seed!");
        assert!(
            graphs.iter().all(|graph| graph.size() + 1 == start),
            "Representatives need {} vertices!",
            start - 1
        );

        for vertices in start..=stop {
            time!(duration, result, self.next_generation(&graphs));
            let (generation, mut statistics) = result;
            statistics.vertices = vertices;
            statistics.duration = duration;

            log::info!(
                "Found {} distinct colourings for k{} in {:.2} seconds",
                generation.len(),
                vertices,
                duration.as_secs_f64()
            );
            log::debug!("{:?}", statistics);

            on_generation(&generation, &statistics)?;
            graphs = generation;
        }

        Ok(graphs)
    }
}
