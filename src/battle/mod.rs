//! Tactical battle systems: grid, sight, movement, resolution, AI

pub mod constants;
pub mod enemy_ai;
pub mod grid;
pub mod line_of_sight;
pub mod pathfinding;
pub mod resolver;
pub mod terrain_gen;
pub mod turn;

pub use enemy_ai::{execute_enemy_turn, select_target, EnemyTurnReport, TargetingRule};
pub use grid::{Grid, TerrainKind, Tile};
pub use line_of_sight::{
    bresenham_line, can_attack, get_cover_between, get_tiles_with_los, get_valid_attack_targets,
    has_line_of_sight,
};
pub use pathfinding::{find_path, get_reachable_tiles, path_cost, truncate_path};
pub use resolver::{
    calculate_hit_chance, format_attack_result, get_attack_preview, resolve_attack, AttackError,
    AttackPreview, AttackResult, CardDraw,
};
pub use terrain_gen::{generate_random, TerrainPattern};
pub use turn::TurnQueue;
