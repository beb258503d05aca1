//! Debug facilities.
use itertools::Itertools;
use nom::error::{VerboseError, VerboseErrorKind};
use std::{
    fmt::{self, Debug},
    io::{self, Write},
};

use crate::{
    embedding::Embedding,
    graph::{ColouredGraph, VertexIndex},
    parser::ParseError,
};

// Error types and From<...> implementations

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error while parsing a graph file")]
    ParseError(Vec<VerboseErrorKind>),
    #[error("Malformed colour matrix: {0}")]
    MalformedGraph(String),
    #[error("Error while reading or writing graphs")]
    IOError(io::Error),
}

#[cfg(not(tarpaulin_include))]
fn handle_nom_verbose_error<E: Debug>(verbose: VerboseError<E>) -> Vec<VerboseErrorKind> {
    verbose
        .errors
        .into_iter()
        .map(|(msg, kind)| {
            log::error!("{:?}", msg);
            kind
        })
        .collect()
}

impl<'a> From<nom::Err<ParseError<'a>>> for Error {
    #[cfg(not(tarpaulin_include))]
    fn from(pe: nom::Err<ParseError<'a>>) -> Self {
        match pe {
            nom::Err::Error(verbose) | nom::Err::Failure(verbose) => {
                Self::ParseError(handle_nom_verbose_error(verbose))
            }
            nom::Err::Incomplete(_) => unreachable!(),
        }
    }
}

impl From<io::Error> for Error {
    #[cfg(not(tarpaulin_include))]
    fn from(ie: io::Error) -> Self {
        Self::IOError(ie)
    }
}

// Output of graphs and embeddings

/// Write graphs in the bulk adjacency format: an optional header
/// `n=<vertices> k=<max colour>` and one colour matrix per graph,
/// each followed by a blank line.
pub fn write_bulk(
    writer: &mut impl Write,
    graphs: &[ColouredGraph],
    with_header: bool,
) -> Result<(), Error> {
    if with_header {
        if let Some(first) = graphs.first() {
            writeln!(writer, "n={} k={}", first.size(), first.max_colour())?;
        }
    }

    for graph in graphs {
        write!(writer, "{}", graph)?;
        writeln!(writer)?;
    }

    writer.flush().map_err(Error::from)
}

/// `pattern_vertices[v]` is the name under which pattern vertex `v` gets printed.
#[cfg(not(tarpaulin_include))]
pub fn print_embedding(pattern_vertices: &[VertexIndex], embedding: &Embedding) {
    println!(
        "{}",
        embedding
            .iter()
            .zip(pattern_vertices.iter())
            .map(|(target_vertex, pattern_vertex)| format!(
                "{} -> {}",
                pattern_vertex, target_vertex
            ))
            .join(", ")
    );
}

// Custom formatter for debug printing

#[cfg(not(tarpaulin_include))]
pub fn opt_fmt<T: fmt::Debug>(option: &Option<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match option {
        Some(val) => val.fmt(f),
        None => write!(f, "None"),
    }
}

#[allow(clippy::ptr_arg)]
#[cfg(not(tarpaulin_include))]
pub fn bin_fmt(vec: &Vec<u64>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{")?;
    for number in vec {
        write!(f, "{:#066b}", number)?;
    }
    write!(f, "}}")?;

    Ok(())
}

#[allow(clippy::ptr_arg)]
#[cfg(not(tarpaulin_include))]
pub fn rows_fmt(rows: &Vec<Vec<bool>>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[")?;
    for row in rows {
        write!(f, " ")?;
        for bit in row {
            write!(f, "{}", if *bit { '1' } else { '0' })?;
        }
    }
    write!(f, " ]")
}

// Debug macros that allow to time single expressions

#[macro_export]
macro_rules! time {
    ($i:ident, $ret:ident, $exp:expr) => {
        let before = std::time::Instant::now();
        let $ret = $exp;
        let $i = before.elapsed();
    };
}

#[macro_export]
macro_rules! parse_single_line {
    ($ret:ident, $exp:expr) => {
        let (res, $ret) = $exp?;
        eof::<crate::parser::Input<'_>, crate::parser::ParseError<'_>>(res)?;
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_write_bulk() -> Result<(), Error> {
        let graphs = vec![
            ColouredGraph::with_edge(2, 1),
            ColouredGraph::with_edge(2, 2),
        ];

        let mut buffer = Vec::new();
        write_bulk(&mut buffer, &graphs, true)?;
        assert_eq!(
            "n=2 k=2\n0 1\n1 0\n\n0 2\n2 0\n\n",
            String::from_utf8(buffer).unwrap()
        );

        let mut buffer = Vec::new();
        write_bulk(&mut buffer, &graphs[..1], false)?;
        assert_eq!("0 1\n1 0\n\n", String::from_utf8(buffer).unwrap());

        Ok(())
    }

    #[test]
    fn test_time_macro() {
        time!(duration, result, (1..=10).sum::<u32>());
        assert_eq!(55, result);
        assert!(duration.as_secs() < 60);
    }
}
