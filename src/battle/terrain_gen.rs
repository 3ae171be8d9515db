//! Procedural terrain layouts
//!
//! Six themed patterns, each producing a list of `(x, y, kind)` cover
//! placements for `Grid::apply_terrain`. Every pattern is filtered through
//! the spawn-zone guard: the leftmost and rightmost `SPAWN_ZONE_WIDTH`
//! columns always stay clear so both squads can deploy.

use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::SPAWN_ZONE_WIDTH;
use crate::battle::grid::TerrainKind;
use crate::core::error::TacticsError;

pub type Placement = (i32, i32, TerrainKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainPattern {
    /// Mirror-symmetric cover, identical opportunities for both sides
    Symmetric,
    /// Random scatter across the middle columns
    Scattered,
    /// Wall segments and debris, corridor fighting
    UrbanRuins,
    /// Central altar ringed by low markers
    RitualSite,
    /// Nearly bare ground, favors ranged combat
    OpenField,
    /// Wall lines with a central gap
    Chokepoint,
}

impl TerrainPattern {
    pub const ALL: [TerrainPattern; 6] = [
        TerrainPattern::Symmetric,
        TerrainPattern::Scattered,
        TerrainPattern::UrbanRuins,
        TerrainPattern::RitualSite,
        TerrainPattern::OpenField,
        TerrainPattern::Chokepoint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TerrainPattern::Symmetric => "symmetric",
            TerrainPattern::Scattered => "scattered",
            TerrainPattern::UrbanRuins => "urban_ruins",
            TerrainPattern::RitualSite => "ritual_site",
            TerrainPattern::OpenField => "open_field",
            TerrainPattern::Chokepoint => "chokepoint",
        }
    }
}

impl FromStr for TerrainPattern {
    type Err = TacticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TerrainPattern::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| TacticsError::UnknownPattern(s.to_string()))
    }
}

/// Drop placements that land in either spawn zone
fn clear_spawn_zones(placements: Vec<Placement>, grid_size: i32) -> Vec<Placement> {
    placements
        .into_iter()
        .filter(|&(x, _, _)| x >= SPAWN_ZONE_WIDTH && x <= grid_size - 1 - SPAWN_ZONE_WIDTH)
        .collect()
}

fn in_bounds(x: i32, y: i32, grid_size: i32) -> bool {
    x >= 0 && x < grid_size && y >= 0 && y < grid_size
}

/// Generate a layout for `pattern`, spawn zones already cleared
pub fn generate(pattern: TerrainPattern, grid_size: i32, rng: &mut impl Rng) -> Vec<Placement> {
    let raw = match pattern {
        TerrainPattern::Symmetric => symmetric(grid_size),
        TerrainPattern::Scattered => scattered(grid_size, rng),
        TerrainPattern::UrbanRuins => urban_ruins(grid_size, rng),
        TerrainPattern::RitualSite => ritual_site(grid_size),
        TerrainPattern::OpenField => open_field(grid_size, rng),
        TerrainPattern::Chokepoint => chokepoint(grid_size),
    };
    let placements = clear_spawn_zones(raw, grid_size);
    tracing::debug!(pattern = pattern.as_str(), tiles = placements.len(), "terrain generated");
    placements
}

/// Pick a pattern at random and generate it
pub fn generate_random(grid_size: i32, rng: &mut impl Rng) -> Vec<Placement> {
    let pattern = TerrainPattern::ALL[rng.gen_range(0..TerrainPattern::ALL.len())];
    generate(pattern, grid_size, rng)
}

/// Cover on the left half mirrored onto the right
fn symmetric(grid_size: i32) -> Vec<Placement> {
    let mut left = Vec::new();
    let mid_y = grid_size / 2;

    // Central full-cover block
    for dy in [-1, 0, 1] {
        left.push((4, mid_y + dy, TerrainKind::FullCover));
    }

    // Flanking half cover
    for y in [2, grid_size - 3] {
        left.push((3, y, TerrainKind::HalfCover));
        left.push((4, y, TerrainKind::HalfCover));
    }

    // Defensive anchors
    left.push((3, 3, TerrainKind::FullCover));
    left.push((3, grid_size - 4, TerrainKind::FullCover));

    let mirrored: Vec<Placement> = left
        .iter()
        .map(|&(x, y, kind)| (grid_size - 1 - x, y, kind))
        .collect();

    left.into_iter().chain(mirrored).collect()
}

/// Random cover across the middle columns; 15% density, 40% of it full
fn scattered(grid_size: i32, rng: &mut impl Rng) -> Vec<Placement> {
    let num_cover = (grid_size * grid_size) as usize * 15 / 100;

    let mut candidates: Vec<(i32, i32)> = (SPAWN_ZONE_WIDTH..grid_size - SPAWN_ZONE_WIDTH)
        .flat_map(|x| (0..grid_size).map(move |y| (x, y)))
        .collect();
    candidates.shuffle(rng);

    let num_full = num_cover * 2 / 5;
    candidates
        .into_iter()
        .take(num_cover)
        .enumerate()
        .map(|(i, (x, y))| {
            let kind = if i < num_full {
                TerrainKind::FullCover
            } else {
                TerrainKind::HalfCover
            };
            (x, y, kind)
        })
        .collect()
}

/// Broken walls and debris piles
fn urban_ruins(grid_size: i32, rng: &mut impl Rng) -> Vec<Placement> {
    let mut placements = Vec::new();
    let left_wall = SPAWN_ZONE_WIDTH;
    let right_wall = grid_size - 1 - SPAWN_ZONE_WIDTH;

    for y in 2..grid_size - 2 {
        if rng.gen_bool(0.7) {
            placements.push((left_wall, y, TerrainKind::FullCover));
        }
        if rng.gen_bool(0.7) {
            placements.push((right_wall, y, TerrainKind::FullCover));
        }
    }

    // Fallen cross-walls
    for x in left_wall + 1..right_wall {
        if rng.gen_bool(0.6) {
            placements.push((x, 3, TerrainKind::FullCover));
        }
        if rng.gen_bool(0.6) {
            placements.push((x, grid_size - 4, TerrainKind::FullCover));
        }
    }

    // Debris in the open lanes
    for (x, y) in [(4, 2), (5, 2), (4, 7), (5, 7), (4, 4), (5, 5)] {
        if in_bounds(x, y, grid_size) && rng.gen_bool(0.5) {
            placements.push((x, y, TerrainKind::HalfCover));
        }
    }

    placements
}

/// A 2x2 altar at the center ringed by ritual markers
fn ritual_site(grid_size: i32) -> Vec<Placement> {
    let cx = grid_size / 2;
    let cy = grid_size / 2;
    let mut placements = Vec::new();

    for dx in [0, 1] {
        for dy in [0, 1] {
            placements.push((cx - 1 + dx, cy - 1 + dy, TerrainKind::FullCover));
        }
    }

    let left_ring = SPAWN_ZONE_WIDTH;
    let right_ring = grid_size - 1 - SPAWN_ZONE_WIDTH;
    let markers = [
        (cx - 1, cy - 3),
        (cx, cy - 3),
        (cx + 1, cy - 3),
        (cx - 1, cy + 3),
        (cx, cy + 3),
        (cx + 1, cy + 3),
        (left_ring, cy - 1),
        (left_ring, cy),
        (left_ring, cy + 1),
        (right_ring, cy - 1),
        (right_ring, cy),
        (right_ring, cy + 1),
    ];

    for (x, y) in markers {
        if in_bounds(x, y, grid_size) {
            placements.push((x, y, TerrainKind::HalfCover));
        }
    }

    placements
}

/// A handful of sparse pieces, most of the field bare
fn open_field(grid_size: i32, rng: &mut impl Rng) -> Vec<Placement> {
    let sparse = [
        (4, 3, TerrainKind::HalfCover),
        (5, 3, TerrainKind::HalfCover),
        (4, grid_size - 4, TerrainKind::HalfCover),
        (5, grid_size - 4, TerrainKind::HalfCover),
        (3, 4, TerrainKind::FullCover),
        (grid_size - 4, 5, TerrainKind::FullCover),
    ];

    sparse
        .into_iter()
        .filter(|&(x, y, _)| in_bounds(x, y, grid_size))
        .filter(|_| rng.gen_bool(0.6))
        .collect()
}

/// Two wall lines with a two-tile gap in the middle
fn chokepoint(grid_size: i32) -> Vec<Placement> {
    let mid_y = grid_size / 2;
    let left_wall = SPAWN_ZONE_WIDTH;
    let right_wall = grid_size - 1 - SPAWN_ZONE_WIDTH;
    let mut placements = Vec::new();

    for y in 0..grid_size {
        if y < mid_y - 1 || y > mid_y + 1 {
            placements.push((left_wall, y, TerrainKind::FullCover));
            placements.push((right_wall, y, TerrainKind::FullCover));
        }
    }

    for (x, y) in [
        (left_wall + 1, mid_y - 2),
        (left_wall + 1, mid_y + 2),
        (right_wall - 1, mid_y - 2),
        (right_wall - 1, mid_y + 2),
    ] {
        if in_bounds(x, y, grid_size) {
            placements.push((x, y, TerrainKind::HalfCover));
        }
    }

    placements
}
