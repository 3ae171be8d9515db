//! Line of sight via Bresenham's line algorithm
//!
//! Full cover blocks sight; half cover and units never do. Endpoints are
//! exempt: standing on cover does not blind you, and the target's own tile
//! is always visible.

use crate::battle::grid::{Grid, TerrainKind};
use crate::battle::resolver::AttackError;
use crate::core::types::GridPos;
use crate::entities::unit::{Team, UnitRoster};

/// All grid cells a shot passes through, including both endpoints.
///
/// Classic integer Bresenham; the traced cells are part of the combat
/// rules, so the stepping order must not change.
pub fn bresenham_line(start: GridPos, end: GridPos) -> Vec<GridPos> {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };

    let mut err = dx - dy;
    let mut x = start.x;
    let mut y = start.y;
    let mut points = Vec::new();

    loop {
        points.push(GridPos::new(x, y));
        if x == end.x && y == end.y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }

    points
}

/// True if nothing between `start` and `end` blocks sight. The endpoints
/// themselves are skipped; an out-of-bounds intermediate cell blocks.
pub fn has_line_of_sight(start: GridPos, end: GridPos, grid: &Grid) -> bool {
    let line = bresenham_line(start, end);
    let interior = line.get(1..line.len() - 1).unwrap_or(&[]);

    for point in interior {
        match grid.get_tile(point.x, point.y) {
            Some(tile) if tile.terrain.blocks_sight() => return false,
            Some(_) => {}
            None => return false,
        }
    }
    true
}

/// Best cover the target benefits from, scanning the intermediate cells.
/// Full beats half; adjacent units (no intermediates) get none.
pub fn get_cover_between(start: GridPos, end: GridPos, grid: &Grid) -> TerrainKind {
    let line = bresenham_line(start, end);
    let interior = line.get(1..line.len() - 1).unwrap_or(&[]);
    let mut best = TerrainKind::Empty;

    for point in interior {
        let Some(tile) = grid.get_tile(point.x, point.y) else {
            continue;
        };
        match tile.terrain {
            TerrainKind::FullCover => return TerrainKind::FullCover,
            TerrainKind::HalfCover => best = TerrainKind::HalfCover,
            TerrainKind::Empty => {}
        }
    }
    best
}

/// Range check then LOS check, with the failure reason on error
pub fn can_attack(
    attacker_pos: GridPos,
    target_pos: GridPos,
    weapon_range: i32,
    grid: &Grid,
) -> Result<(), AttackError> {
    let distance = grid.get_distance(attacker_pos, target_pos);
    if distance > weapon_range as f32 {
        return Err(AttackError::OutOfRange { distance, weapon_range });
    }
    if !has_line_of_sight(attacker_pos, target_pos, grid) {
        return Err(AttackError::NoLineOfSight);
    }
    Ok(())
}

/// Every tile visible from `start`, optionally range-limited (Euclidean)
pub fn get_tiles_with_los(start: GridPos, grid: &Grid, max_range: Option<i32>) -> Vec<GridPos> {
    let mut visible = Vec::new();

    for y in 0..grid.size {
        for x in 0..grid.size {
            let pos = GridPos::new(x, y);
            if pos == start {
                continue;
            }
            if let Some(range) = max_range {
                if grid.get_distance(start, pos) > range as f32 {
                    continue;
                }
            }
            if has_line_of_sight(start, pos, grid) {
                visible.push(pos);
            }
        }
    }
    visible
}

/// Positions of standing `target_team` units that are in range with clear
/// LOS from `attacker_pos`. Incapacitated units are not targets.
pub fn get_valid_attack_targets(
    attacker_pos: GridPos,
    weapon_range: i32,
    grid: &Grid,
    units: &UnitRoster,
    target_team: Team,
) -> Vec<GridPos> {
    units
        .active_on_team(target_team)
        .filter_map(|unit| unit.position)
        .filter(|&pos| can_attack(attacker_pos, pos, weapon_range, grid).is_ok())
        .collect()
}
