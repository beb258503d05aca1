//! Statistics about the augmentation runs.

use custom_debug_derive::Debug;
use std::{
    fs::File,
    io::Write,
    path::PathBuf,
    time::{Duration, Instant},
};

use crate::{debug::opt_fmt, graph::Colour, Error};

/// Counters of a single generation step.
/// Every colouring of a new vertex is either visited or skipped,
/// every visited one is either rejected or canonicalised.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationStatistics {
    pub vertices: usize,
    pub representatives: usize,
    pub colourings_visited: u64,
    pub triangle_rejections: u64,
    pub colourings_skipped: u64,
    pub canonicalisations: u64,
    pub duplicates: u64,
    pub kept: usize,
    pub duration: Duration,
}

impl GenerationStatistics {
    /// Add the colouring counters of a partial result.
    pub fn absorb(&mut self, other: &GenerationStatistics) {
        self.colourings_visited += other.colourings_visited;
        self.triangle_rejections += other.triangle_rejections;
        self.colourings_skipped += other.colourings_skipped;
        self.canonicalisations += other.canonicalisations;
        self.duplicates += other.duplicates;
    }
}

#[derive(Debug)]
pub struct Statistics {
    // Meta information
    #[debug(skip)]
    out_file: PathBuf,
    max_colour: Colour,
    skip_ahead: bool,
    // Timings
    #[debug(skip)]
    start_time: Instant,
    #[debug(with = "opt_fmt")]
    end_time: Option<Duration>,
    // Generations
    generations: Vec<GenerationStatistics>,
}

impl Statistics {
    #[cfg(not(tarpaulin_include))]
    pub fn new(out_file: PathBuf, max_colour: Colour, skip_ahead: bool) -> Self {
        Statistics {
            out_file,
            max_colour,
            skip_ahead,
            start_time: Instant::now(),
            end_time: None,
            generations: Vec::new(),
        }
    }

    #[cfg(not(tarpaulin_include))]
    pub fn log_generation(&mut self, generation: &GenerationStatistics) {
        self.generations.push(generation.clone());
    }

    #[cfg(not(tarpaulin_include))]
    pub fn log_end(&mut self) {
        self.end_time = Some(self.start_time.elapsed());
    }

    #[cfg(not(tarpaulin_include))]
    pub fn save_statistics(&self) -> Result<(), Error> {
        let mut statistics_file = File::create(&self.out_file)?;
        write!(statistics_file, "Raw Statistics: {:#?}", self).map_err(Error::from)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_absorb() {
        let mut total = GenerationStatistics {
            vertices: 4,
            representatives: 2,
            ..Default::default()
        };
        let part = GenerationStatistics {
            colourings_visited: 8,
            triangle_rejections: 2,
            colourings_skipped: 1,
            canonicalisations: 6,
            duplicates: 5,
            ..Default::default()
        };

        total.absorb(&part);
        total.absorb(&part);

        assert_eq!(16, total.colourings_visited);
        assert_eq!(4, total.triangle_rejections);
        assert_eq!(2, total.colourings_skipped);
        assert_eq!(12, total.canonicalisations);
        assert_eq!(10, total.duplicates);
        assert_eq!((4, 2, 0), (total.vertices, total.representatives, total.kept));
    }
}
