//! Combat system constants - all tunable values in one place
//!
//! Every penalty here is ADDITIVE and expressed in flat percentage points.

// Battlefield
pub const GRID_SIZE: i32 = 10;
/// Player spawn columns are x < SPAWN_ZONE_WIDTH; enemy columns mirror on
/// the right edge. Terrain generation never places cover there.
pub const SPAWN_ZONE_WIDTH: i32 = 3;

// Hit chance
pub const DISTANCE_PENALTY_PER_TILE: i32 = 10;
pub const HALF_COVER_PENALTY: i32 = 20;
pub const FULL_COVER_PENALTY: i32 = 40;
/// No guaranteed misses
pub const MIN_HIT_CHANCE: i32 = 5;
/// No guaranteed hits
pub const MAX_HIT_CHANCE: i32 = 95;

// Deck
pub const STANDARD_DECK_SIZE: usize = 20;
