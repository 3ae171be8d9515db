//! Battlefield grid and tiles
//!
//! A square grid of tiles, each carrying a terrain kind and at most one
//! occupant. The grid is the single source of truth for occupancy; a unit's
//! cached `position` is kept in sync by `place_unit`/`remove_unit`/
//! `move_unit` and must never be written directly.

use serde::{Deserialize, Serialize};

use crate::battle::constants::GRID_SIZE;
use crate::core::error::{Result, TacticsError};
use crate::core::types::{GridPos, UnitId};
use crate::entities::unit::{Unit, UnitRoster};

/// Cover occupies a tile without blocking movement: units duck behind it,
/// they do not stand in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainKind {
    #[default]
    Empty,
    /// Low obstacle: shoot over it, -20% to hit the target behind it
    HalfCover,
    /// Wall: blocks sight entirely, -40% when visible around a corner
    FullCover,
}

impl TerrainKind {
    pub fn blocks_sight(&self) -> bool {
        matches!(self, TerrainKind::FullCover)
    }

    /// All cover is passable terrain
    pub fn blocks_movement(&self) -> bool {
        false
    }

    /// Flat percentage subtracted from the attacker's hit chance
    pub fn defense_bonus(&self) -> i32 {
        match self {
            TerrainKind::Empty => 0,
            TerrainKind::HalfCover => crate::battle::constants::HALF_COVER_PENALTY,
            TerrainKind::FullCover => crate::battle::constants::FULL_COVER_PENALTY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub position: GridPos,
    pub terrain: TerrainKind,
    pub occupant: Option<UnitId>,
}

impl Tile {
    fn new(x: i32, y: i32) -> Self {
        Self {
            position: GridPos::new(x, y),
            terrain: TerrainKind::Empty,
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// A unit may enter this tile right now
    pub fn can_move_through(&self) -> bool {
        !self.terrain.blocks_movement() && !self.is_occupied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub size: i32,
    tiles: Vec<Tile>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_SIZE)
    }
}

impl Grid {
    pub fn new(size: i32) -> Self {
        let mut tiles = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                tiles.push(Tile::new(x, y));
            }
        }
        Self { size, tiles }
    }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size && y >= 0 && y < self.size
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if self.is_valid_position(x, y) {
            self.tiles.get((y * self.size + x) as usize)
        } else {
            None
        }
    }

    fn get_tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if self.is_valid_position(x, y) {
            self.tiles.get_mut((y * self.size + x) as usize)
        } else {
            None
        }
    }

    /// Place a unit on an empty tile, recording its position. False if the
    /// tile is occupied or out of bounds. The unit must not already be on
    /// the grid; use `move_unit` for that.
    pub fn place_unit(&mut self, unit: &mut Unit, x: i32, y: i32) -> bool {
        debug_assert!(
            unit.position.is_none(),
            "unit {:?} is already placed at {:?}",
            unit.id,
            unit.position
        );
        match self.get_tile_mut(x, y) {
            Some(tile) if !tile.is_occupied() => {
                tile.occupant = Some(unit.id);
                unit.position = Some(GridPos::new(x, y));
                true
            }
            _ => false,
        }
    }

    /// Take a unit off the grid (incapacitation cleanup, retreat)
    pub fn remove_unit(&mut self, unit: &mut Unit) -> bool {
        let Some(pos) = unit.position else {
            return false;
        };
        match self.get_tile_mut(pos.x, pos.y) {
            Some(tile) if tile.occupant == Some(unit.id) => {
                tile.occupant = None;
                unit.position = None;
                true
            }
            _ => false,
        }
    }

    /// Atomically relocate whichever unit occupies `from` to the empty tile
    /// `to`, updating both tiles and the unit's cached position.
    pub fn move_unit(&mut self, from: GridPos, to: GridPos, units: &mut UnitRoster) -> bool {
        let occupant = match self.get_tile(from.x, from.y) {
            Some(tile) => match tile.occupant {
                Some(id) => id,
                None => return false,
            },
            None => return false,
        };

        match self.get_tile(to.x, to.y) {
            Some(tile) if !tile.is_occupied() => {}
            _ => return false,
        }

        let Some(unit) = units.get_mut(occupant) else {
            debug_assert!(false, "tile occupant {:?} missing from roster", occupant);
            return false;
        };

        if let Some(tile) = self.get_tile_mut(from.x, from.y) {
            tile.occupant = None;
        }
        if let Some(tile) = self.get_tile_mut(to.x, to.y) {
            tile.occupant = Some(occupant);
        }
        unit.position = Some(to);
        true
    }

    /// Euclidean distance in tiles
    pub fn get_distance(&self, a: GridPos, b: GridPos) -> f32 {
        a.distance(&b)
    }

    pub fn get_manhattan_distance(&self, a: GridPos, b: GridPos) -> i32 {
        a.manhattan_distance(&b)
    }

    /// In-bounds neighbors, orthogonal first then diagonal
    pub fn get_neighbors(&self, x: i32, y: i32, diagonal: bool) -> Vec<GridPos> {
        const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
        const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

        let mut neighbors = Vec::with_capacity(8);
        for (dx, dy) in ORTHOGONAL {
            if self.is_valid_position(x + dx, y + dy) {
                neighbors.push(GridPos::new(x + dx, y + dy));
            }
        }
        if diagonal {
            for (dx, dy) in DIAGONAL {
                if self.is_valid_position(x + dx, y + dy) {
                    neighbors.push(GridPos::new(x + dx, y + dy));
                }
            }
        }
        neighbors
    }

    /// Set a tile's terrain. Overwrites any existing cover; occupancy is
    /// untouched.
    pub fn add_cover(&mut self, x: i32, y: i32, kind: TerrainKind) -> Result<()> {
        match self.get_tile_mut(x, y) {
            Some(tile) => {
                tile.terrain = kind;
                Ok(())
            }
            None => Err(TacticsError::InvalidPlacement { x, y }),
        }
    }

    /// Apply a generated terrain layout
    pub fn apply_terrain(&mut self, placements: &[(i32, i32, TerrainKind)]) -> Result<()> {
        for &(x, y, kind) in placements {
            self.add_cover(x, y, kind)?;
        }
        Ok(())
    }
}
