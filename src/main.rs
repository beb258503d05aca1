#![warn(rust_2018_idioms)]
//#![deny(warnings, missing_docs)]

//! Search for edge colourings of complete graphs
//! without monochromatic triangles by orderly generation.

use clap::Parser;
use itertools::Itertools;
use std::{collections::HashSet, path::Path};

mod graph;
use graph::Colour;

mod canon;
use canon::{Canonicaliser, Nauty};

mod augment;
use augment::AugmentationEngine;

mod embedding;

mod parser;

mod input;
use input::{read_first_graph, read_generation, write_generation, Cli, Command};

mod statistics;
use statistics::Statistics;

mod debug;
pub use debug::Error;
use debug::print_embedding;

#[cfg(not(tarpaulin_include))]
pub fn do_if_some<F, T>(optional: &mut Option<T>, f: F)
where
    F: FnOnce(&mut T),
{
    if let Some(val) = optional {
        f(val);
    }
}

#[derive(Debug, Default)]
pub struct Settings {
    /// Reject every colouring with a triangle on its own
    /// instead of skipping all colourings that share it.
    pub brute_force: bool,
    /// Extend the representatives of a generation in parallel.
    pub parallel: bool,
}

#[cfg(not(tarpaulin_include))]
fn logger(level: log::LevelFilter) {
    env_logger::builder()
        .format_module_path(false)
        .format_target(false)
        .filter_level(level)
        .init()
}

#[cfg(not(tarpaulin_include))]
fn verify(start: usize, stop: usize, max_colour: Colour, dir: &Path) -> Result<(), Error> {
    let canonicaliser = Canonicaliser::<Nauty>::default();

    for vertices in start..=stop {
        let graphs = read_generation(dir, vertices, max_colour)?;

        time!(
            verify_time,
            forms,
            graphs
                .iter()
                .map(|graph| canonicaliser.canonical_form(graph))
                .collect::<HashSet<_>>()
        );
        let invalid = graphs
            .iter()
            .filter(|graph| graph.is_partial() || !graph.is_triangle_free())
            .count();

        log::info!(
            "Found {} distinct colourings in {} stored for k{} in {:.2} seconds",
            forms.len(),
            graphs.len(),
            vertices,
            verify_time.as_secs_f64()
        );

        if forms.len() != graphs.len() {
            for ((first_index, first), (second_index, second)) in graphs
                .iter()
                .enumerate()
                .tuple_combinations::<(_, _)>()
            {
                if canonicaliser.is_isomorphic(first, second) {
                    log::warn!(
                        "Colourings {} and {} of k{} are isomorphic!",
                        first_index,
                        second_index,
                        vertices
                    );
                }
            }
        }
        if invalid > 0 {
            log::warn!(
                "k{} holds {} partial colourings or ones with a monochromatic triangle!",
                vertices,
                invalid
            );
        }
    }

    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    logger(if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    let settings = cli.command.settings();
    log::debug!("{:?}", settings);

    match cli.command {
        Command::Augment {
            start,
            stop,
            colours,
            dir,
            statistics,
            ..
        } => {
            let engine = AugmentationEngine::new(colours, &settings);
            let mut statistics = statistics
                .map(|out_file| Statistics::new(out_file, colours, !settings.brute_force));

            // Either start from the single edges or from the last stored generation, ...
            let start = start.max(3);
            let graphs = if start == 3 {
                engine.seed()
            } else {
                read_generation(&dir, start - 1, colours)?
            };

            // ... extend them generation by generation and store each one.
            engine.run(graphs, start, stop, |generation, generation_statistics| {
                do_if_some(&mut statistics, |st| st.log_generation(generation_statistics));
                write_generation(&dir, generation_statistics.vertices, generation)
            })?;

            if let Some(mut statistics) = statistics {
                statistics.log_end();
                statistics.save_statistics()?;
            }
        }
        Command::Verify {
            start,
            stop,
            colours,
            dir,
        } => verify(start, stop, colours, &dir)?,
        Command::Embed {
            pattern,
            target,
            vertex,
            colour,
            all,
            check,
        } => {
            let pattern = read_first_graph(&pattern)?;
            let target = read_first_graph(&target)?;

            // Either embed the whole pattern or only a neighbourhood in it.
            let (pattern, pattern_vertices) = match (vertex, colour) {
                (Some(vertex), Some(colour)) => {
                    if vertex >= pattern.size() || colour == 0 || colour > pattern.max_colour() {
                        return Err(Error::MalformedGraph(format!(
                            "no neighbourhood of vertex {} in colour {}",
                            vertex, colour
                        )));
                    }
                    pattern.neighbourhood(vertex, colour)
                }
                _ => {
                    let pattern_vertices = (0..pattern.size()).collect::<Vec<_>>();
                    (pattern, pattern_vertices)
                }
            };

            if check {
                println!("{}", embedding::exists(&pattern, &target));
            } else if all {
                let embeddings = embedding::find_all(&pattern, &target);
                embeddings
                    .iter()
                    .for_each(|found| print_embedding(&pattern_vertices, found));
                log::info!("Found {} embeddings", embeddings.len());
            } else if let Some(first) = embedding::find_first(&pattern, &target) {
                print_embedding(&pattern_vertices, &first);
            } else {
                println!("No embedding");
            }
        }
    }

    Ok(())
}
