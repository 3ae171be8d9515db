//! A* pathfinding for tactical movement
//!
//! Eight-way movement with orthogonal steps costing 1.0 and diagonal steps
//! sqrt(2). The Euclidean heuristic is admissible for these costs. Occupied
//! tiles are obstacles, except the goal tile itself when routing toward a
//! unit we intend to engage.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::f32::consts::SQRT_2;

use crate::battle::grid::Grid;
use crate::core::types::GridPos;

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    pos: GridPos,
    f_cost: f32, // g_cost + heuristic
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cost of one step between adjacent tiles
fn step_cost(from: GridPos, to: GridPos) -> f32 {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    if dx + dy == 2 {
        SQRT_2
    } else {
        1.0
    }
}

/// Find the cheapest path from `start` to `goal`, inclusive of both.
///
/// Returns None if no path exists, if the goal tile is occupied, or if
/// `max_distance` is set and every route exceeds it. Occupied tiles other
/// than the goal are never stepped on.
pub fn find_path(
    grid: &Grid,
    start: GridPos,
    goal: GridPos,
    max_distance: Option<f32>,
) -> Option<Vec<GridPos>> {
    if !grid.is_valid_position(start.x, start.y) || !grid.is_valid_position(goal.x, goal.y) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }
    if grid.get_tile(goal.x, goal.y)?.is_occupied() {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
    let mut g_scores: HashMap<GridPos, f32> = HashMap::new();

    g_scores.insert(start, 0.0);
    open_set.push(PathNode {
        pos: start,
        f_cost: start.distance(&goal),
    });

    while let Some(current) = open_set.pop() {
        if current.pos == goal {
            return Some(reconstruct_path(&came_from, current.pos));
        }

        let current_g = *g_scores.get(&current.pos).unwrap_or(&f32::INFINITY);

        for neighbor in grid.get_neighbors(current.pos.x, current.pos.y, true) {
            let Some(tile) = grid.get_tile(neighbor.x, neighbor.y) else {
                continue;
            };
            if tile.terrain.blocks_movement() {
                continue;
            }
            // Other units are obstacles; the goal tile was already checked
            if tile.is_occupied() && neighbor != goal {
                continue;
            }

            let tentative_g = current_g + step_cost(current.pos, neighbor);

            if let Some(max) = max_distance {
                if tentative_g > max {
                    continue;
                }
            }

            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f32::INFINITY);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.pos);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    pos: neighbor,
                    f_cost: tentative_g + neighbor.distance(&goal),
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &HashMap<GridPos, GridPos>, mut current: GridPos) -> Vec<GridPos> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Total cost of a path (sum of step costs)
pub fn path_cost(path: &[GridPos]) -> f32 {
    path.windows(2).map(|pair| step_cost(pair[0], pair[1])).sum()
}

/// All tiles reachable within `movement_range` cost from `start`.
///
/// Dijkstra flood fill with proper relaxation, so every tile reported here
/// is reachable by `find_path` under the same budget and vice versa.
/// Excludes the start tile and occupied tiles.
pub fn get_reachable_tiles(grid: &Grid, start: GridPos, movement_range: f32) -> HashSet<GridPos> {
    let mut costs: HashMap<GridPos, f32> = HashMap::new();
    let mut frontier = BinaryHeap::new();

    costs.insert(start, 0.0);
    frontier.push(PathNode { pos: start, f_cost: 0.0 });

    while let Some(current) = frontier.pop() {
        let current_cost = *costs.get(&current.pos).unwrap_or(&f32::INFINITY);
        // Stale heap entry
        if current.f_cost > current_cost {
            continue;
        }

        for neighbor in grid.get_neighbors(current.pos.x, current.pos.y, true) {
            let Some(tile) = grid.get_tile(neighbor.x, neighbor.y) else {
                continue;
            };
            if tile.terrain.blocks_movement() || tile.is_occupied() {
                continue;
            }

            let new_cost = current_cost + step_cost(current.pos, neighbor);
            if new_cost > movement_range {
                continue;
            }

            let known = *costs.get(&neighbor).unwrap_or(&f32::INFINITY);
            if new_cost < known {
                costs.insert(neighbor, new_cost);
                frontier.push(PathNode { pos: neighbor, f_cost: new_cost });
            }
        }
    }

    costs.remove(&start);
    costs.into_keys().collect()
}

/// Furthest point along `path` reachable within `budget` movement cost.
///
/// Walks the path accumulating step costs and returns the last affordable
/// position. If that tile is occupied by a unit other than `target` (the
/// unit being approached), backs off one step. Returns None when not even
/// the first step is affordable or free.
pub fn truncate_path(
    path: &[GridPos],
    budget: f32,
    grid: &Grid,
    target: Option<GridPos>,
) -> Option<GridPos> {
    if path.len() < 2 {
        return None;
    }

    let mut spent = 0.0;
    let mut last_affordable = 0;
    for i in 1..path.len() {
        spent += step_cost(path[i - 1], path[i]);
        if spent > budget {
            break;
        }
        last_affordable = i;
    }

    if last_affordable == 0 {
        return None;
    }

    let mut index = last_affordable;
    let occupied_by_other = |pos: GridPos| {
        grid.get_tile(pos.x, pos.y)
            .map(|t| t.is_occupied() && Some(pos) != target)
            .unwrap_or(true)
    };

    if occupied_by_other(path[index]) {
        if index == 1 {
            return None;
        }
        index -= 1;
        if occupied_by_other(path[index]) {
            return None;
        }
    }

    Some(path[index])
}
