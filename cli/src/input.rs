//! Edge list and node date loading
//!
//! Edge lines: `source target [weight]`; date lines: `node date`. Fields are
//! separated by whitespace or commas; blank lines and `#` comments are skipped.

use anyhow::{bail, Context, Result};
use mlg_walker::{Direction, Graph};
use std::path::Path;

fn fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect()
}

fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

pub fn parse_edges(text: &str, direction: Direction) -> Result<Graph> {
    let mut graph = Graph::new(direction);
    for (lineno, line) in data_lines(text) {
        match fields(line).as_slice() {
            [source, target] => {
                graph.add_edge(source, target)?;
            }
            [source, target, weight] => {
                let weight: f64 = weight
                    .parse()
                    .with_context(|| format!("line {}: invalid weight '{}'", lineno, weight))?;
                graph.add_weighted_edge(source, target, weight)?;
            }
            other => bail!("line {}: expected 2 or 3 fields, found {}", lineno, other.len()),
        }
    }
    Ok(graph)
}

/// Attach dates to existing nodes; unknown node names are an error
pub fn apply_dates(graph: &mut Graph, text: &str, attribute: &str) -> Result<()> {
    for (lineno, line) in data_lines(text) {
        match fields(line).as_slice() {
            [node, date] => {
                let date: f64 = date
                    .parse()
                    .with_context(|| format!("line {}: invalid date '{}'", lineno, date))?;
                graph
                    .set_node_property(node, attribute, date)
                    .with_context(|| format!("line {}", lineno))?;
            }
            other => bail!("line {}: expected 2 fields, found {}", lineno, other.len()),
        }
    }
    Ok(())
}

pub fn load_graph(
    edges: &Path,
    dates: Option<&Path>,
    direction: Direction,
    date_attribute: &str,
) -> Result<Graph> {
    let text = std::fs::read_to_string(edges)
        .with_context(|| format!("reading edge list {}", edges.display()))?;
    let mut graph = parse_edges(&text, direction)?;

    if let Some(dates) = dates {
        let text = std::fs::read_to_string(dates)
            .with_context(|| format!("reading dates {}", dates.display()))?;
        apply_dates(&mut graph, &text, date_attribute)?;
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators() {
        let text = "# toy graph\nA B 1.0\nB,C,0.5\n\nA C\n";
        let graph = parse_edges(text, Direction::Undirected).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        let a = graph.node_id("A").unwrap();
        assert_eq!(graph.weighted_degrees(Some("weight")).unwrap()[a.index()], 2.0);
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let err = parse_edges("A B\nA B heavy\n", Direction::Directed).unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let err = parse_edges("A\n", Direction::Directed).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_apply_dates() {
        let mut graph = parse_edges("A B 1\n", Direction::Undirected).unwrap();
        apply_dates(&mut graph, "A 5\nB 2.5\n", "date").unwrap();
        let b = graph.node_id("B").unwrap();
        assert_eq!(graph.node_number(b, "date").unwrap(), Some(2.5));
        assert!(apply_dates(&mut graph, "Z 1\n", "date").is_err());
    }

    #[test]
    fn test_load_graph_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let edges = dir.path().join("edges.txt");
        let dates = dir.path().join("dates.txt");
        std::fs::write(&edges, "A B 1.0\nB C 0.5\n").unwrap();
        std::fs::write(&dates, "A 5\nB 2\nC 3\n").unwrap();

        let graph = load_graph(&edges, Some(&dates), Direction::Undirected, "when").unwrap();
        let c = graph.node_id("C").unwrap();
        assert_eq!(graph.node_number(c, "when").unwrap(), Some(3.0));
    }
}
