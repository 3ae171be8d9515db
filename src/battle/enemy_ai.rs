//! Rule-driven enemy turns
//!
//! Each archetype has a fixed targeting rule; the turn itself is always the
//! same shape: pick a target, advance along an A* path as far as the
//! movement budget allows, then attack if the target is in range with line
//! of sight. Failing to find a target, a path, or a shot are all normal
//! outcomes, not errors.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::grid::Grid;
use crate::battle::line_of_sight::can_attack;
use crate::battle::pathfinding::{find_path, truncate_path};
use crate::battle::resolver::{resolve_attack, AttackResult};
use crate::core::error::{Result, TacticsError};
use crate::core::types::{GridPos, UnitId};
use crate::entities::deck::CombatDeck;
use crate::entities::unit::{Archetype, Team, Unit, UnitRoster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingRule {
    /// Focus the healthiest opponent (cultist doctrine: bring down the
    /// strong before they whittle you away)
    HighestHealth,
    /// Run down whatever is closest (pack predator)
    Nearest,
}

pub fn targeting_rule(archetype: Archetype) -> TargetingRule {
    match archetype {
        Archetype::Cultist => TargetingRule::HighestHealth,
        Archetype::Hound => TargetingRule::Nearest,
        Archetype::Investigator => TargetingRule::Nearest,
    }
}

/// Standing opponent with the highest current health. Ties go to the unit
/// added to the roster first.
pub fn find_highest_health_target(units: &UnitRoster, target_team: Team) -> Option<UnitId> {
    units
        .active_on_team(target_team)
        .fold(None::<(UnitId, i32)>, |best, unit| match best {
            Some((_, hp)) if hp >= unit.current_health => best,
            _ => Some((unit.id, unit.current_health)),
        })
        .map(|(id, _)| id)
}

/// Standing opponent nearest to `from` by Euclidean distance. Ties go to
/// the unit added to the roster first; off-grid units are never chosen.
pub fn find_nearest_target(
    from: GridPos,
    units: &UnitRoster,
    target_team: Team,
    grid: &Grid,
) -> Option<UnitId> {
    units
        .active_on_team(target_team)
        .filter_map(|unit| unit.position.map(|pos| (unit.id, grid.get_distance(from, pos))))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

/// Apply the actor's targeting rule against the opposing team
pub fn select_target(actor: &Unit, units: &UnitRoster, grid: &Grid) -> Option<UnitId> {
    let target_team = actor.team.opponent();
    match targeting_rule(actor.archetype) {
        TargetingRule::HighestHealth => find_highest_health_target(units, target_team),
        TargetingRule::Nearest => {
            let from = actor.position?;
            find_nearest_target(from, units, target_team, grid)
        }
    }
}

/// Where the actor should move to close on the target.
///
/// The target's tile is occupied, so the path goal is the free adjacent
/// tile nearest to the actor; the path is then cut to the actor's full
/// movement budget. None when the target is unreachable, surrounded, or
/// the actor is already as close as it can get.
pub fn calculate_movement_target(actor: &Unit, target: &Unit, grid: &Grid) -> Option<GridPos> {
    let start = actor.position?;
    let target_pos = target.position?;

    let goal = grid
        .get_neighbors(target_pos.x, target_pos.y, true)
        .into_iter()
        .filter(|pos| {
            grid.get_tile(pos.x, pos.y)
                .map(|t| t.can_move_through())
                .unwrap_or(false)
        })
        .min_by(|a, b| {
            grid.get_distance(start, *a)
                .partial_cmp(&grid.get_distance(start, *b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let path = find_path(grid, start, goal, None)?;
    truncate_path(&path, actor.movement_range() as f32, grid, Some(target_pos))
}

/// What one AI turn did, for logs and the battle runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTurnReport {
    pub actor: UnitId,
    pub target: Option<UnitId>,
    pub moved_from: Option<GridPos>,
    pub moved_to: Option<GridPos>,
    pub attack: Option<AttackResult>,
}

/// Run a full AI turn for `actor_id`: target, move, attack.
///
/// Move and attack each cost one action point; a unit that is out of
/// points does neither. Works for either team, which is what lets the
/// battle runner play both sides.
pub fn execute_enemy_turn(
    actor_id: UnitId,
    units: &mut UnitRoster,
    grid: &mut Grid,
    monster_deck: Option<&mut CombatDeck>,
    rng: &mut impl Rng,
) -> Result<EnemyTurnReport> {
    let actor = units.get(actor_id).ok_or(TacticsError::UnitNotFound(actor_id))?;

    let mut report = EnemyTurnReport {
        actor: actor_id,
        target: None,
        moved_from: None,
        moved_to: None,
        attack: None,
    };

    if !actor.can_act() {
        return Ok(report);
    }

    let Some(target_id) = select_target(actor, units, grid) else {
        tracing::debug!(actor = %actor.name, "no valid targets");
        return Ok(report);
    };
    report.target = Some(target_id);

    let target = units.get(target_id).ok_or(TacticsError::UnitNotFound(target_id))?;
    tracing::debug!(actor = %actor.name, target = %target.name, "target selected");

    // Move phase; the point is spent only once the move actually happened
    let destination = calculate_movement_target(actor, target, grid);
    let origin = actor.position;
    let has_points = actor.has_actions_remaining();
    if let (Some(to), Some(from)) = (destination, origin) {
        if has_points && grid.move_unit(from, to, units) {
            if let Some(unit) = units.get_mut(actor_id) {
                unit.spend_action();
            }
            report.moved_from = Some(from);
            report.moved_to = Some(to);
            tracing::debug!(?from, ?to, "unit moved");
        }
    }

    // Attack phase: re-check from the (possibly new) position
    let actor = units.get(actor_id).ok_or(TacticsError::UnitNotFound(actor_id))?;
    let target = units.get(target_id).ok_or(TacticsError::UnitNotFound(target_id))?;
    let (Some(actor_pos), Some(target_pos)) = (actor.position, target.position) else {
        return Ok(report);
    };

    if let Err(reason) = can_attack(actor_pos, target_pos, actor.weapon_range(), grid) {
        tracing::debug!(actor = %actor.name, %reason, "cannot attack");
        return Ok(report);
    }
    if !actor.has_actions_remaining() {
        return Ok(report);
    }

    let (attacker, target) = units
        .get_pair_mut(actor_id, target_id)
        .ok_or(TacticsError::UnitNotFound(target_id))?;
    attacker.spend_action();

    if let Ok(result) = resolve_attack(attacker, target, grid, monster_deck, rng) {
        report.attack = Some(result);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn place(units: &mut UnitRoster, grid: &mut Grid, mut unit: Unit, x: i32, y: i32) -> UnitId {
        assert!(grid.place_unit(&mut unit, x, y));
        units.add(unit)
    }

    #[test]
    fn test_cultist_targets_highest_health() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let mut r = rng();

        let weak_id = {
            let mut weak = Unit::investigator("Weak", &mut r);
            weak.take_damage(10);
            place(&mut units, &mut grid, weak, 0, 0)
        };
        let healthy_id = place(&mut units, &mut grid, Unit::investigator("Healthy", &mut r), 0, 5);
        let cultist_id = place(&mut units, &mut grid, Unit::cultist("Cultist"), 9, 0);

        let cultist = units.get(cultist_id).unwrap();
        // Nearest is the weak one, but cultists pick the healthy one
        assert_eq!(select_target(cultist, &units, &grid), Some(healthy_id));
        let _ = weak_id;
    }

    #[test]
    fn test_hound_targets_nearest() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let mut r = rng();

        let near_id = place(&mut units, &mut grid, Unit::investigator("Near", &mut r), 7, 7);
        let _far_id = place(&mut units, &mut grid, Unit::investigator("Far", &mut r), 0, 0);
        let hound_id = place(&mut units, &mut grid, Unit::hound("Hound"), 9, 9);

        let hound = units.get(hound_id).unwrap();
        assert_eq!(select_target(hound, &units, &grid), Some(near_id));
    }

    #[test]
    fn test_incapacitated_units_not_targeted() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let mut r = rng();

        let downed_id = {
            let mut downed = Unit::investigator("Downed", &mut r);
            downed.take_damage(100);
            place(&mut units, &mut grid, downed, 5, 5)
        };
        let standing_id = place(&mut units, &mut grid, Unit::investigator("Standing", &mut r), 0, 0);
        let hound_id = place(&mut units, &mut grid, Unit::hound("Hound"), 5, 6);

        let hound = units.get(hound_id).unwrap();
        // The downed unit is adjacent but invisible to targeting
        assert_eq!(select_target(hound, &units, &grid), Some(standing_id));
        let _ = downed_id;
    }

    #[test]
    fn test_no_targets_is_a_clean_no_op() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let hound_id = place(&mut units, &mut grid, Unit::hound("Hound"), 5, 5);

        let report =
            execute_enemy_turn(hound_id, &mut units, &mut grid, None, &mut rng()).unwrap();
        assert_eq!(report.target, None);
        assert_eq!(report.moved_to, None);
        assert!(report.attack.is_none());
        // A turn that did nothing spent nothing
        assert_eq!(
            units.get(hound_id).unwrap().action_points,
            crate::entities::unit::MAX_ACTION_POINTS
        );
    }

    #[test]
    fn test_unknown_unit_is_an_error() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let ghost = UnitId::new();

        let result = execute_enemy_turn(ghost, &mut units, &mut grid, None, &mut rng());
        assert!(matches!(result, Err(TacticsError::UnitNotFound(_))));
    }

    #[test]
    fn test_hound_closes_distance_with_full_movement() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let mut r = rng();

        let _inv = place(&mut units, &mut grid, Unit::investigator("Prey", &mut r), 0, 0);
        let hound_id = place(&mut units, &mut grid, Unit::hound("Hound"), 9, 0);

        let report = execute_enemy_turn(hound_id, &mut units, &mut grid, None, &mut r).unwrap();

        // Movement 6: from x=9 straight toward the adjacent goal at x=1
        assert_eq!(report.moved_from, Some(GridPos::new(9, 0)));
        assert_eq!(report.moved_to, Some(GridPos::new(3, 0)));
        assert_eq!(units.get(hound_id).unwrap().position, Some(GridPos::new(3, 0)));
        // Still 3 tiles out with a range-1 weapon: no attack
        assert!(report.attack.is_none());
        // Exactly one point spent, for the move that happened
        assert_eq!(units.get(hound_id).unwrap().action_points, 1);
    }

    #[test]
    fn test_cultist_moves_and_shoots() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let mut r = rng();

        let inv_id = place(&mut units, &mut grid, Unit::investigator("Target", &mut r), 0, 0);
        let cultist_id = place(&mut units, &mut grid, Unit::cultist("Cultist"), 6, 0);
        let mut monster_deck = CombatDeck::standard(&mut r);

        let report = execute_enemy_turn(
            cultist_id,
            &mut units,
            &mut grid,
            Some(&mut monster_deck),
            &mut r,
        )
        .unwrap();

        assert_eq!(report.target, Some(inv_id));
        // Moves 4 toward the goal at x=1, landing at x=2: distance 2 <= pistol range 3
        assert_eq!(report.moved_to, Some(GridPos::new(2, 0)));
        let attack = report.attack.expect("in range, should have attacked");
        if attack.hit {
            assert_eq!(monster_deck.statistics().total_draws, 1);
        } else {
            assert_eq!(monster_deck.statistics().total_draws, 0);
        }
    }

    #[test]
    fn test_diagonal_hound_steps_orthogonal_and_strikes() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let mut r = rng();

        let _inv = place(&mut units, &mut grid, Unit::investigator("Target", &mut r), 4, 4);
        // Diagonal adjacency is 1.414 tiles, out of claw range
        let hound_id = place(&mut units, &mut grid, Unit::hound("Hound"), 5, 5);

        let report = execute_enemy_turn(hound_id, &mut units, &mut grid, None, &mut r).unwrap();
        assert_eq!(report.moved_to, Some(GridPos::new(4, 5)));
        assert!(report.attack.is_some());
        // Move and attack each cost one point
        assert_eq!(units.get(hound_id).unwrap().action_points, 0);
    }

    #[test]
    fn test_surrounded_target_yields_no_move() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let mut r = rng();

        let inv_id = place(&mut units, &mut grid, Unit::investigator("Target", &mut r), 0, 0);
        // Wall the corner target in with other units
        place(&mut units, &mut grid, Unit::cultist("Wall A"), 1, 0);
        place(&mut units, &mut grid, Unit::cultist("Wall B"), 0, 1);
        place(&mut units, &mut grid, Unit::cultist("Wall C"), 1, 1);
        let hound_id = place(&mut units, &mut grid, Unit::hound("Hound"), 9, 9);

        let actor = units.get(hound_id).unwrap().clone();
        let target = units.get(inv_id).unwrap();
        assert_eq!(calculate_movement_target(&actor, target, &grid), None);
    }

    #[test]
    fn test_spent_unit_does_nothing() {
        let mut grid = Grid::new(10);
        let mut units = UnitRoster::new();
        let mut r = rng();

        let _inv = place(&mut units, &mut grid, Unit::investigator("Target", &mut r), 4, 4);
        let hound_id = place(&mut units, &mut grid, Unit::hound("Hound"), 4, 5);
        units.get_mut(hound_id).unwrap().action_points = 0;

        let report = execute_enemy_turn(hound_id, &mut units, &mut grid, None, &mut r).unwrap();
        assert_eq!(report.moved_to, None);
        assert!(report.attack.is_none());
    }
}
