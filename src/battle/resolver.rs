//! Attack resolution
//!
//! The full pipeline for one attack: position and range validation, line of
//! sight, cover, hit chance, the d100 roll, and - only on a hit - a combat
//! card draw that modifies damage. A miss never consumes a card, so every
//! draw the player sees corresponds to a landed hit.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::constants::{DISTANCE_PENALTY_PER_TILE, MAX_HIT_CHANCE, MIN_HIT_CHANCE};
use crate::battle::grid::{Grid, TerrainKind};
use crate::battle::line_of_sight::{get_cover_between, has_line_of_sight};
use crate::entities::deck::CombatDeck;
use crate::entities::unit::Unit;

/// Why an attack could not be attempted. These are preconditions, not
/// outcomes - a miss is a valid result, not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttackError {
    #[error("attacker or target is not on the grid")]
    NotOnGrid,

    #[error("target out of range (distance {distance:.1}, weapon range {weapon_range})")]
    OutOfRange { distance: f32, weapon_range: i32 },

    #[error("no line of sight to target")]
    NoLineOfSight,
}

/// The card that modified a hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDraw {
    pub label: String,
    pub is_crit: bool,
    pub is_null: bool,
}

/// Everything that happened during one resolved attack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackResult {
    pub hit: bool,
    pub hit_chance: i32,
    pub roll: i32,
    pub distance: f32,
    pub cover: TerrainKind,
    /// Present only on a hit, and only when the attacker had a deck
    pub card: Option<CardDraw>,
    pub base_damage: i32,
    /// Damage after the card modifier
    pub final_damage: i32,
    /// Damage actually removed from the target (no overkill)
    pub damage_dealt: i32,
    pub sanity_damage_dealt: i32,
    pub target_incapacitated: bool,
}

/// Side-effect-free projection of an attack, for UI confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackPreview {
    pub hit_chance: i32,
    pub distance: f32,
    pub cover: TerrainKind,
    pub base_damage: i32,
    /// Worst card in a standard deck short of the Null: -1
    pub min_damage: i32,
    /// Best card: x2
    pub max_damage: i32,
}

/// `accuracy - 10 per full tile of distance - cover penalty`, clamped to
/// the 5-95 band. Distance truncates: 2.83 tiles is a 20-point penalty.
pub fn calculate_hit_chance(attacker: &Unit, distance: f32, cover: TerrainKind) -> i32 {
    let distance_penalty = distance.trunc() as i32 * DISTANCE_PENALTY_PER_TILE;
    (attacker.accuracy() - distance_penalty - cover.defense_bonus())
        .clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE)
}

fn validate(attacker: &Unit, target: &Unit, grid: &Grid) -> Result<(f32, TerrainKind), AttackError> {
    let (Some(attacker_pos), Some(target_pos)) = (attacker.position, target.position) else {
        return Err(AttackError::NotOnGrid);
    };

    let distance = grid.get_distance(attacker_pos, target_pos);
    let weapon_range = attacker.weapon_range();
    if distance > weapon_range as f32 {
        return Err(AttackError::OutOfRange { distance, weapon_range });
    }

    if !has_line_of_sight(attacker_pos, target_pos, grid) {
        return Err(AttackError::NoLineOfSight);
    }

    Ok((distance, get_cover_between(attacker_pos, target_pos, grid)))
}

/// Resolve one attack end to end.
///
/// The attacker's personal deck is preferred; `shared_deck` (the monster
/// deck) is used when the attacker has none. With neither, damage is
/// unmodified weapon damage. A drawn Null card is still a hit - it deals
/// zero damage but counts as a landed attack.
pub fn resolve_attack(
    attacker: &mut Unit,
    target: &mut Unit,
    grid: &Grid,
    shared_deck: Option<&mut CombatDeck>,
    rng: &mut impl Rng,
) -> Result<AttackResult, AttackError> {
    let (distance, cover) = validate(attacker, target, grid)?;
    let hit_chance = calculate_hit_chance(attacker, distance, cover);

    let roll = rng.gen_range(1..=100);
    let hit = roll <= hit_chance;
    let base_damage = attacker.weapon_damage();

    tracing::debug!(
        attacker = %attacker.name,
        target = %target.name,
        roll,
        hit_chance,
        hit,
        "attack roll"
    );

    if !hit {
        // A miss consumes nothing: no card, no damage
        return Ok(AttackResult {
            hit: false,
            hit_chance,
            roll,
            distance,
            cover,
            card: None,
            base_damage,
            final_damage: 0,
            damage_dealt: 0,
            sanity_damage_dealt: 0,
            target_incapacitated: target.is_incapacitated,
        });
    }

    let card = attacker
        .deck
        .as_mut()
        .or(shared_deck)
        .and_then(|deck| deck.draw(rng).ok());

    let final_damage = match &card {
        Some(card) => card.apply_to_damage(base_damage),
        None => base_damage,
    };

    let damage_dealt = target.take_damage(final_damage);

    let sanity = attacker.weapon_sanity_damage();
    let sanity_damage_dealt = if sanity > 0 {
        target.take_sanity_damage(sanity)
    } else {
        0
    };

    Ok(AttackResult {
        hit: true,
        hit_chance,
        roll,
        distance,
        cover,
        card: card.map(|c| CardDraw {
            label: c.label(),
            is_crit: c.is_multiply(),
            is_null: c.is_null(),
        }),
        base_damage,
        final_damage,
        damage_dealt,
        sanity_damage_dealt,
        target_incapacitated: target.is_incapacitated,
    })
}

/// Validate and project an attack without rolling, drawing, or dealing
/// damage. The damage band assumes a standard deck: worst non-Null card is
/// -1, best is x2.
pub fn get_attack_preview(
    attacker: &Unit,
    target: &Unit,
    grid: &Grid,
) -> Result<AttackPreview, AttackError> {
    let (distance, cover) = validate(attacker, target, grid)?;
    let base_damage = attacker.weapon_damage();

    Ok(AttackPreview {
        hit_chance: calculate_hit_chance(attacker, distance, cover),
        distance,
        cover,
        base_damage,
        min_damage: (base_damage - 1).max(0),
        max_damage: base_damage * 2,
    })
}

/// Human-readable summary of a resolved attack, for logs and UIs
pub fn format_attack_result(attacker: &Unit, target: &Unit, result: &AttackResult) -> String {
    let cover_str = match result.cover {
        TerrainKind::Empty => "no cover",
        TerrainKind::HalfCover => "half cover",
        TerrainKind::FullCover => "full cover",
    };

    let mut lines = vec![format!(
        "{} attacks {} ({:.1} tiles, {})",
        attacker.name, target.name, result.distance, cover_str
    )];

    if !result.hit {
        lines.push(format!(
            "  MISS (roll {} vs {}% chance)",
            result.roll, result.hit_chance
        ));
        return lines.join("\n");
    }

    if let Some(card) = &result.card {
        if card.is_null {
            lines.push(format!("  Drew {} - the blow glances off!", card.label));
        } else if card.is_crit {
            lines.push(format!("  Drew {} - CRITICAL HIT!", card.label));
        } else {
            lines.push(format!("  Drew {}", card.label));
        }
    }

    lines.push(format!(
        "  HIT! (roll {} vs {}% chance)",
        result.roll, result.hit_chance
    ));

    match &result.card {
        Some(card) if !card.is_crit && !card.is_null => {
            let modifier = result.final_damage - result.base_damage;
            if modifier != 0 {
                lines.push(format!(
                    "  Dealt {} damage ({} base {:+} card)",
                    result.damage_dealt, result.base_damage, modifier
                ));
            } else {
                lines.push(format!("  Dealt {} damage", result.damage_dealt));
            }
        }
        _ => lines.push(format!("  Dealt {} damage", result.damage_dealt)),
    }

    if result.sanity_damage_dealt > 0 {
        lines.push(format!("  + {} sanity damage!", result.sanity_damage_dealt));
    }

    if result.target_incapacitated {
        lines.push(format!("  {} INCAPACITATED!", target.name));
    } else {
        lines.push(format!(
            "  {}: {}/{} HP",
            target.name,
            target.current_health,
            target.max_health()
        ));
    }

    lines.join("\n")
}
