// Grid A* over road tiles.
//
// Pure and re-entrant: each call owns its node storage and only reads the
// grid, so independent patrol tasks can path in the same frame without
// coordination. The open list is scanned for the strictly smallest f, which
// makes equal-f ties resolve to insertion order; together with the fixed
// neighbor expansion order that keeps results deterministic.

use bevy::prelude::*;

use crate::systems::grid::TileGrid;

/// Search-state record for one cell. Lives only for the duration of one
/// `find_path` call.
#[derive(Debug, Clone, Copy)]
struct PathNode {
    pos: IVec2,
    /// Cost from the start, one per orthogonal step.
    g: i32,
    /// Manhattan estimate to the goal.
    h: i32,
    /// g + h.
    f: i32,
    /// Index of the predecessor in the closed list.
    parent: Option<usize>,
}

fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Expansion order: down, right, up, left.
const STEPS: [IVec2; 4] = [
    IVec2::new(0, 1),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
    IVec2::new(-1, 0),
];

/// Shortest 4-directional path along road tiles, start and goal inclusive.
/// Returns an empty vector when the goal is unreachable. Start and goal are
/// assumed caller-valid; the search itself only expands road cells.
pub fn find_path(grid: &TileGrid, start: IVec2, goal: IVec2) -> Vec<IVec2> {
    let mut open: Vec<PathNode> = vec![PathNode {
        pos: start,
        g: 0,
        h: manhattan(start, goal),
        f: manhattan(start, goal),
        parent: None,
    }];
    let mut closed: Vec<PathNode> = Vec::new();

    while !open.is_empty() {
        let mut best = 0;
        for (i, node) in open.iter().enumerate().skip(1) {
            if node.f < open[best].f {
                best = i;
            }
        }

        let current = open.remove(best);
        let current_idx = closed.len();
        closed.push(current);

        if current.pos == goal {
            return reconstruct(&closed, current_idx);
        }

        for step in STEPS {
            let npos = current.pos + step;
            if !grid.is_road(npos.x, npos.y) {
                continue;
            }
            if closed.iter().any(|node| node.pos == npos) {
                continue;
            }
            if open.iter().any(|node| node.pos == npos) {
                continue;
            }
            let g = current.g + 1;
            let h = manhattan(npos, goal);
            open.push(PathNode {
                pos: npos,
                g,
                h,
                f: g + h,
                parent: Some(current_idx),
            });
        }
    }

    Vec::new()
}

fn reconstruct(closed: &[PathNode], goal_idx: usize) -> Vec<IVec2> {
    let mut path = Vec::new();
    let mut cursor = Some(goal_idx);
    while let Some(idx) = cursor {
        path.push(closed[idx].pos);
        cursor = closed[idx].parent;
    }
    path.reverse();
    path
}
