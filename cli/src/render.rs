//! Plain-text rendering of steps for the terminal

use algoscope_core::algorithm::state::{CellState, EdgeState, GridView, Snapshot, Step};

/// One line per step: index, kind, note and a compact view of the structure
pub fn step_line(step: &Step) -> String {
    let mut line = format!("[{:>4}] {:<15}", step.index, format!("{:?}", step.kind));
    if let Some(note) = &step.note {
        line.push_str(note);
        line.push_str(" | ");
    }
    line.push_str(&describe(&step.snapshot));
    line
}

pub fn describe(snapshot: &Snapshot) -> String {
    match snapshot {
        Snapshot::Array(view) => view
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if view.pivot == Some(i) {
                    format!("<{}>", v)
                } else if view.focus.contains(&i) {
                    format!("[{}]", v)
                } else {
                    v.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        Snapshot::Grid(view) => {
            let mut text = format!(
                "visited {} frontier {} path {} dead ends {}",
                view.count(CellState::Visited),
                view.count(CellState::Frontier),
                view.count(CellState::Path),
                view.count(CellState::DeadEnd),
            );
            if let Some(cell) = view.current {
                text.push_str(&format!(" at {}", cell));
            }
            text
        }
        Snapshot::Graph(view) => {
            let visited = view.vertices.iter().filter(|v| v.visited).count();
            let mut text = format!(
                "tree edges {} visited {}/{}",
                view.edges_in(EdgeState::Tree).count(),
                visited,
                view.vertices.len()
            );
            if let Some(edge) = view.edges_in(EdgeState::Candidate).next() {
                text.push_str(&format!(" candidate {} ({})", edge.id, edge.weight));
            }
            text
        }
        Snapshot::Tree(view) => {
            let root = view.root().map_or_else(|| "-".to_owned(), |n| n.value.to_string());
            let mut text = format!("root {} nodes {}", root, view.nodes.len());
            if let Some(node) = view.nodes.iter().find(|n| n.highlighted) {
                text.push_str(&format!(" at {}", node.value));
            }
            text
        }
    }
}

fn cell_char(state: CellState) -> char {
    match state {
        CellState::Open => '.',
        CellState::Wall => '#',
        CellState::Start => 'S',
        CellState::End => 'E',
        CellState::Frontier => '+',
        CellState::Visited => 'o',
        CellState::Path => '*',
        CellState::DeadEnd => 'x',
    }
}

/// Character map of a grid, one string per row
pub fn grid_map(view: &GridView) -> Vec<String> {
    view.cells
        .chunks(view.cols.max(1))
        .map(|row| row.iter().map(|&s| cell_char(s)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_core::algorithm::state::ArrayView;

    #[test]
    fn test_array_marks_focus_and_pivot() {
        let view = ArrayView::new(&[4, 1, 3], &[0]).with_pivot(2);
        assert_eq!(describe(&Snapshot::Array(view)), "[4] 1 <3>");
    }

    #[test]
    fn test_grid_map_rows() {
        let view = GridView {
            rows: 2,
            cols: 3,
            cells: vec![
                CellState::Start,
                CellState::Path,
                CellState::Wall,
                CellState::DeadEnd,
                CellState::Visited,
                CellState::End,
            ],
            current: None,
        };
        assert_eq!(grid_map(&view), vec!["S*#", "xoE"]);
        assert_eq!(describe(&Snapshot::Grid(view)), "visited 1 frontier 0 path 1 dead ends 1");
    }
}
