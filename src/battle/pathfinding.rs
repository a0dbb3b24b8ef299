//! A* pathfinding on the hex board
//!
//! Every step costs 1. Occupied cells are impassable except the goal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};

use crate::battle::hex::{HexGrid, Position};

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    coord: Position,
    f_cost: u32, // g_cost + heuristic
    h_cost: u32,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; ties resolve to the lower (r, q) cell so
        // equal-length paths are always chosen the same way
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path using A*
///
/// Returns None if no path exists. The path includes both `start` and `goal`.
/// `obstacles` never blocks the goal itself; callers exclude the mover.
pub fn find_path(
    grid: &HexGrid,
    start: Position,
    goal: Position,
    obstacles: &AHashSet<Position>,
) -> Option<Vec<Position>> {
    if start == goal {
        return Some(vec![start]);
    }
    if !grid.contains(goal) {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Position, Position> = AHashMap::new();
    let mut g_scores: AHashMap<Position, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    let h = start.distance(&goal);
    open_set.push(PathNode {
        coord: start,
        f_cost: h,
        h_cost: h,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct_path(&came_from, current.coord));
        }

        let current_g = *g_scores.get(&current.coord).unwrap_or(&u32::MAX);
        // Stale heap entry
        if current.f_cost > current_g.saturating_add(current.h_cost) {
            continue;
        }

        for neighbor in grid.neighbors(current.coord) {
            if neighbor != goal && obstacles.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                let h_cost = neighbor.distance(&goal);
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + h_cost,
                    h_cost,
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &AHashMap<Position, Position>,
    mut current: Position,
) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
