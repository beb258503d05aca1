//! Parser for files with many coloured graphs in the bulk adjacency format:
//! an optional header `n=<vertices> k=<max colour>` followed by dense
//! colour matrices, one row per line, graphs separated by blank lines.

use std::io::BufRead;

use crate::{
    graph::{Colour, ColouredGraph, NO_EDGE},
    parse_single_line, Error,
};

pub type Input<'a> = &'a str;
pub type ParseError<'a> = nom::error::VerboseError<Input<'a>>;
pub type ParseResult<'a, O> = nom::IResult<Input<'a>, O, ParseError<'a>>;

/// Parse the header line `n=<vertices> k=<max colour>`.
fn parse_header(input: Input<'_>) -> ParseResult<'_, (usize, Colour)> {
    use nom::{
        bytes::complete::tag,
        character::complete::{space0, space1, u64, u8},
        error::context,
        sequence::tuple,
    };

    let mut header = context(
        "Graph header",
        tuple((space0, tag("n="), u64, space1, tag("k="), u8, space0)),
    );
    let (rest, (_, _, size, _, _, max_colour, _)) = header(input)?;
    Ok((rest, (size as usize, max_colour)))
}

/// Parse one row of a colour matrix, e.g. `0 1 2 1`.
fn parse_matrix_row(input: Input<'_>) -> ParseResult<'_, Vec<Colour>> {
    use nom::{
        character::complete::{space0, space1, u8},
        error::context,
        multi::separated_list1,
        sequence::delimited,
    };

    context(
        "Row of a colour matrix",
        delimited(space0, separated_list1(space1, u8), space0),
    )(input)
}

fn is_header_line(line: &str) -> bool {
    line.trim_start().starts_with("n=")
}

/// Check the shape of a colour matrix and build the graph from it.
fn graph_from_matrix(matrix: &[Vec<Colour>], max_colour: Colour) -> Result<ColouredGraph, Error> {
    let size = matrix.len();
    let mut graph = ColouredGraph::new(size, max_colour);

    for (start, row) in matrix.iter().enumerate() {
        if row.len() != size {
            return Err(Error::MalformedGraph(format!(
                "row {} has {} entries, expected {}",
                start,
                row.len(),
                size
            )));
        }
        if row[start] != NO_EDGE {
            return Err(Error::MalformedGraph(format!(
                "vertex {} has a coloured self loop",
                start
            )));
        }

        for (end, colour) in row.iter().enumerate().skip(start + 1) {
            if *colour > max_colour {
                return Err(Error::MalformedGraph(format!(
                    "colour {} of edge ({}, {}) exceeds the maximum colour {}",
                    colour, start, end, max_colour
                )));
            }
            if matrix[end].get(start) != Some(colour) {
                return Err(Error::MalformedGraph(format!(
                    "edge ({}, {}) is not symmetric",
                    start, end
                )));
            }
            graph.set_edge(start, end, *colour);
        }
    }

    Ok(graph)
}

/// Read all graphs from the input. The maximum colour is taken from the header,
/// then from `max_colour`, and as a last resort from the largest entry.
pub fn parse_bulk_input<B: BufRead>(
    input: B,
    max_colour: Option<Colour>,
) -> Result<Vec<ColouredGraph>, Error> {
    use nom::combinator::eof;

    let mut header = None;
    let mut matrices = Vec::new();
    let mut rows: Vec<Vec<Colour>> = Vec::new();

    for line in input.lines() {
        let line = line?;

        // Blank line marks the next graph.
        if line.trim().is_empty() {
            if !rows.is_empty() {
                matrices.push(std::mem::take(&mut rows));
            }
            continue;
        }

        if header.is_none() && matrices.is_empty() && rows.is_empty() && is_header_line(&line) {
            parse_single_line!(size_and_colour, parse_header(&line));
            header = Some(size_and_colour);
            continue;
        }

        parse_single_line!(row, parse_matrix_row(&line));
        rows.push(row);
    }

    if !rows.is_empty() {
        matrices.push(rows);
    }

    let max_colour = header
        .map(|(_, header_colour)| header_colour)
        .or(max_colour)
        .unwrap_or_else(|| {
            matrices
                .iter()
                .flatten()
                .flatten()
                .copied()
                .max()
                .unwrap_or(1)
                .max(1)
        });

    if max_colour == NO_EDGE {
        return Err(Error::MalformedGraph(
            "the maximum colour has to be positive".to_string(),
        ));
    }

    matrices
        .iter()
        .map(|matrix| {
            if let Some((size, _)) = header {
                if matrix.len() != size {
                    return Err(Error::MalformedGraph(format!(
                        "graph with {} vertices in a file declared for {}",
                        matrix.len(),
                        size
                    )));
                }
            }
            graph_from_matrix(matrix, max_colour)
        })
        .collect()
}
