//! Command line and the generation files on disk.

use clap::{Parser, Subcommand};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use crate::{
    debug::write_bulk,
    graph::{Colour, ColouredGraph, VertexIndex},
    parser::parse_bulk_input,
    Error, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "trifree")]
#[command(version, about = "Triangle-free edge colourings of complete graphs")]
pub struct Cli {
    /// Log debug information, e.g. per generation statistics.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one representative per class of triangle-free colourings.
    Augment {
        /// First vertex count to generate. 3 starts from the single edges,
        /// larger values continue from the stored previous generation.
        #[arg(long, default_value_t = 3)]
        start: usize,

        /// Last vertex count to generate.
        #[arg(long)]
        stop: usize,

        /// Number of edge colours.
        #[arg(short = 'k', long)]
        colours: Colour,

        /// Directory for the generation files `k<n>.adj`.
        #[arg(short, long, default_value = "graphs")]
        dir: PathBuf,

        /// Reject colourings one by one instead of skipping doomed blocks.
        #[arg(long)]
        no_skip_ahead: bool,

        /// Extend the representatives of a generation in parallel.
        #[arg(short, long)]
        parallel: bool,

        /// Write statistics about the run to this file.
        #[arg(short, long)]
        statistics: Option<PathBuf>,
    },

    /// Check that the stored generations contain no isomorphic pairs.
    Verify {
        #[arg(long, default_value_t = 3)]
        start: usize,

        #[arg(long)]
        stop: usize,

        #[arg(short = 'k', long)]
        colours: Colour,

        #[arg(short, long, default_value = "graphs")]
        dir: PathBuf,
    },

    /// Embed the first graph of one file into the first graph of another.
    Embed {
        pattern: PathBuf,

        target: PathBuf,

        /// Only embed the neighbourhood of this pattern vertex.
        #[arg(long, requires = "colour")]
        vertex: Option<VertexIndex>,

        /// Colour of the edges that span the neighbourhood.
        #[arg(short = 'k', long, requires = "vertex")]
        colour: Option<Colour>,

        /// Print every embedding instead of the first one.
        #[arg(short, long)]
        all: bool,

        /// Only tell whether an embedding exists.
        #[arg(short, long, conflicts_with = "all")]
        check: bool,
    },
}

impl Command {
    pub fn settings(&self) -> Settings {
        match self {
            Command::Augment {
                no_skip_ahead,
                parallel,
                ..
            } => Settings {
                brute_force: *no_skip_ahead,
                parallel: *parallel,
            },
            _ => Settings::default(),
        }
    }
}

pub fn generation_file(dir: &Path, vertices: usize) -> PathBuf {
    dir.join(format!("k{}.adj", vertices))
}

pub fn read_graphs(path: &Path, max_colour: Option<Colour>) -> Result<Vec<ColouredGraph>, Error> {
    let file = File::open(path)?;
    parse_bulk_input(BufReader::new(file), max_colour)
}

pub fn read_first_graph(path: &Path) -> Result<ColouredGraph, Error> {
    read_graphs(path, None)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::MalformedGraph(format!("{} holds no graph", path.display())))
}

/// Load generation `vertices` and check that it fits the requested search.
pub fn read_generation(
    dir: &Path,
    vertices: usize,
    max_colour: Colour,
) -> Result<Vec<ColouredGraph>, Error> {
    let graphs = read_graphs(&generation_file(dir, vertices), Some(max_colour))?;

    if let Some(graph) = graphs
        .iter()
        .find(|graph| graph.size() != vertices || graph.max_colour() != max_colour)
    {
        return Err(Error::MalformedGraph(format!(
            "generation k{} with {} colours holds a graph with {} vertices and {} colours",
            vertices,
            max_colour,
            graph.size(),
            graph.max_colour()
        )));
    }

    Ok(graphs)
}

pub fn write_generation(
    dir: &Path,
    vertices: usize,
    graphs: &[ColouredGraph],
) -> Result<(), Error> {
    fs::create_dir_all(dir)?;
    let mut writer = BufWriter::new(File::create(generation_file(dir, vertices))?);
    write_bulk(&mut writer, graphs, true)
}
