//! Units: investigators and the horrors they fight
//!
//! Every unit shares one model: dual health/sanity pools, a base stat block
//! plus an additive modifier stack, a weapon slot, and two action points per
//! turn. Investigators additionally carry a personal combat deck; enemies
//! draw from a shared monster deck owned by the battle.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, UnitId};
use crate::entities::deck::CombatDeck;
use crate::entities::equipment::Weapon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    pub fn opponent(&self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

/// Drives AI targeting and default loadouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Investigator,
    Cultist,
    Hound,
}

/// Stats fixed at unit creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_health: i32,
    pub max_sanity: i32,
    pub accuracy: i32,
    pub will: i32,
    pub movement_range: i32,
}

/// Additive adjustments from equipment, traits, and injuries. Stacks: each
/// application adds to the running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifiers {
    pub max_health: i32,
    pub max_sanity: i32,
    pub accuracy: i32,
    pub will: i32,
    pub movement: i32,
}

pub const MAX_ACTION_POINTS: i32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub archetype: Archetype,
    base: StatBlock,
    modifiers: StatModifiers,
    pub current_health: i32,
    pub current_sanity: i32,
    /// Set by the grid when placed; None while off the battlefield
    pub position: Option<GridPos>,
    pub is_incapacitated: bool,
    pub action_points: i32,
    pub weapon: Option<Weapon>,
    /// Personal deck (investigators). Enemies leave this None and share a
    /// monster deck supplied at resolution time.
    pub deck: Option<CombatDeck>,
}

impl Unit {
    pub fn new(name: impl Into<String>, team: Team, archetype: Archetype, base: StatBlock) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
            team,
            archetype,
            base,
            modifiers: StatModifiers::default(),
            current_health: base.max_health,
            current_sanity: base.max_sanity,
            position: None,
            is_incapacitated: false,
            action_points: MAX_ACTION_POINTS,
            weapon: None,
            deck: None,
        }
    }

    // --- Archetype factories ---

    /// Standard investigator: revolver plus a personal 20-card deck
    pub fn investigator(name: impl Into<String>, rng: &mut impl Rng) -> Self {
        let mut unit = Self::new(
            name,
            Team::Player,
            Archetype::Investigator,
            StatBlock {
                max_health: 15,
                max_sanity: 10,
                accuracy: 75,
                will: 5,
                movement_range: 4,
            },
        );
        unit.equip_weapon(Weapon::revolver());
        unit.deck = Some(CombatDeck::standard(rng));
        unit
    }

    /// Ranged human enemy; weak but fights from cover
    pub fn cultist(name: impl Into<String>) -> Self {
        let mut unit = Self::new(
            name,
            Team::Enemy,
            Archetype::Cultist,
            StatBlock {
                max_health: 10,
                max_sanity: 8,
                accuracy: 60,
                will: 3,
                movement_range: 4,
            },
        );
        unit.equip_weapon(Weapon::cultist_pistol());
        unit
    }

    /// Hound of Tindalos: fast melee horror that savages the mind
    pub fn hound(name: impl Into<String>) -> Self {
        let mut unit = Self::new(
            name,
            Team::Enemy,
            Archetype::Hound,
            StatBlock {
                max_health: 8,
                max_sanity: 15,
                accuracy: 75,
                will: 10,
                movement_range: 6,
            },
        );
        unit.equip_weapon(Weapon::eldritch_claws());
        unit
    }

    // --- Effective stats (base + modifiers, clamped) ---

    /// Never below 1, even under severe injury
    pub fn max_health(&self) -> i32 {
        (self.base.max_health + self.modifiers.max_health).max(1)
    }

    pub fn max_sanity(&self) -> i32 {
        (self.base.max_sanity + self.modifiers.max_sanity).max(1)
    }

    /// Clamped to 5-95: no guaranteed hits, no guaranteed misses
    pub fn accuracy(&self) -> i32 {
        (self.base.accuracy + self.modifiers.accuracy).clamp(5, 95)
    }

    /// Sanity armor; never negative
    pub fn will(&self) -> i32 {
        (self.base.will + self.modifiers.will).max(0)
    }

    /// A unit can always limp at least 1 tile
    pub fn movement_range(&self) -> i32 {
        (self.base.movement_range + self.modifiers.movement).max(1)
    }

    /// Additive: repeated applications stack
    pub fn apply_modifiers(&mut self, delta: StatModifiers) {
        self.modifiers.max_health += delta.max_health;
        self.modifiers.max_sanity += delta.max_sanity;
        self.modifiers.accuracy += delta.accuracy;
        self.modifiers.will += delta.will;
        self.modifiers.movement += delta.movement;
    }

    pub fn has_modifiers(&self) -> bool {
        self.modifiers != StatModifiers::default()
    }

    // --- Equipment ---

    /// Equip a weapon, folding its accuracy modifier into the stack. Any
    /// previous weapon's modifier is removed first.
    pub fn equip_weapon(&mut self, weapon: Weapon) {
        self.unequip_weapon();
        self.modifiers.accuracy += weapon.accuracy_modifier;
        self.weapon = Some(weapon);
    }

    pub fn unequip_weapon(&mut self) -> Option<Weapon> {
        let weapon = self.weapon.take()?;
        self.modifiers.accuracy -= weapon.accuracy_modifier;
        Some(weapon)
    }

    pub fn weapon_damage(&self) -> i32 {
        self.weapon.as_ref().map_or(0, |w| w.damage)
    }

    /// Unarmed units can still strike an adjacent tile
    pub fn weapon_range(&self) -> i32 {
        self.weapon.as_ref().map_or(1, |w| w.range)
    }

    pub fn weapon_sanity_damage(&self) -> i32 {
        self.weapon.as_ref().map_or(0, |w| w.sanity_damage)
    }

    // --- Damage and recovery ---

    /// Apply health damage. Returns the damage actually dealt, capped at
    /// remaining health (no overkill). Reaching 0 incapacitates.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.current_health);
        self.current_health -= actual;
        if self.current_health == 0 {
            self.is_incapacitated = true;
        }
        actual
    }

    /// Apply sanity damage, reduced by will. Sanity hitting 0 incapacitates
    /// just like health does.
    pub fn take_sanity_damage(&mut self, amount: i32) -> i32 {
        let actual = (amount - self.will()).clamp(0, self.current_sanity);
        self.current_sanity -= actual;
        if self.current_sanity == 0 && actual > 0 {
            self.is_incapacitated = true;
        }
        actual
    }

    /// Returns the health actually restored (capped at effective max)
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_health;
        self.current_health = (self.current_health + amount.max(0)).min(self.max_health());
        self.current_health - before
    }

    pub fn restore_sanity(&mut self, amount: i32) -> i32 {
        let before = self.current_sanity;
        self.current_sanity = (self.current_sanity + amount.max(0)).min(self.max_sanity());
        self.current_sanity - before
    }

    pub fn health_fraction(&self) -> f32 {
        self.current_health as f32 / self.max_health() as f32
    }

    pub fn can_act(&self) -> bool {
        !self.is_incapacitated
    }

    // --- Action economy: 2 points per turn, Move and Attack cost 1 each ---

    pub fn reset_turn(&mut self) {
        self.action_points = MAX_ACTION_POINTS;
    }

    pub fn has_actions_remaining(&self) -> bool {
        self.action_points > 0
    }

    /// Consume one action point; false if none remain
    pub fn spend_action(&mut self) -> bool {
        if self.action_points >= 1 {
            self.action_points -= 1;
            true
        } else {
            false
        }
    }
}

/// Owning collection of every unit in a battle, addressed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRoster {
    units: Vec<Unit>,
}

impl UnitRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, unit: Unit) -> UnitId {
        let id = unit.id;
        self.units.push(unit);
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Disjoint mutable borrows of two different units, for attacker/target
    /// pairs. None if either id is missing or the ids are equal.
    pub fn get_pair_mut(&mut self, a: UnitId, b: UnitId) -> Option<(&mut Unit, &mut Unit)> {
        if a == b {
            return None;
        }
        let ia = self.units.iter().position(|u| u.id == a)?;
        let ib = self.units.iter().position(|u| u.id == b)?;
        if ia < ib {
            let (left, right) = self.units.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.units.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    pub fn team(&self, team: Team) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.team == team)
    }

    /// Units on `team` that are still standing
    pub fn active_on_team(&self, team: Team) -> impl Iterator<Item = &Unit> {
        self.team(team).filter(|u| u.can_act())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

// --- Squad factories ---

/// Four investigators in the classic roles: balanced, sniper, tank, scout
pub fn investigator_squad(rng: &mut impl Rng) -> Vec<Unit> {
    let templates = [
        ("Dr. Armitage", 15, 10, 75, 5, 4, Weapon::revolver()),
        ("Carter", 12, 12, 80, 6, 4, Weapon::hunting_rifle()),
        ("O'Bannon", 18, 8, 70, 4, 3, Weapon::shotgun()),
        ("Reyes", 14, 11, 75, 7, 5, Weapon::revolver()),
    ];

    templates
        .into_iter()
        .map(|(name, hp, san, acc, will, mv, weapon)| {
            let mut unit = Unit::new(
                name,
                Team::Player,
                Archetype::Investigator,
                StatBlock {
                    max_health: hp,
                    max_sanity: san,
                    accuracy: acc,
                    will,
                    movement_range: mv,
                },
            );
            unit.equip_weapon(weapon);
            unit.deck = Some(CombatDeck::standard(rng));
            unit
        })
        .collect()
}

pub fn balanced_squad() -> Vec<Unit> {
    vec![
        Unit::cultist("Cultist Alpha"),
        Unit::cultist("Cultist Beta"),
        Unit::hound("Hound Alpha"),
        Unit::hound("Hound Beta"),
    ]
}

pub fn cultist_squad() -> Vec<Unit> {
    vec![
        Unit::cultist("Cultist Alpha"),
        Unit::cultist("Cultist Beta"),
        Unit::cultist("Cultist Gamma"),
        Unit::cultist("Cultist Delta"),
    ]
}

pub fn hound_pack() -> Vec<Unit> {
    vec![
        Unit::hound("Hound Alpha"),
        Unit::hound("Hound Beta"),
        Unit::hound("Hound Gamma"),
    ]
}

pub fn mixed_squad() -> Vec<Unit> {
    vec![
        Unit::cultist("Cultist Alpha"),
        Unit::cultist("Cultist Beta"),
        Unit::cultist("Cultist Gamma"),
        Unit::hound("Hound Alpha"),
    ]
}

/// Pick one of the four enemy squad compositions at random
pub fn random_enemy_squad(rng: &mut impl Rng) -> Vec<Unit> {
    match rng.gen_range(0..4) {
        0 => balanced_squad(),
        1 => cultist_squad(),
        2 => hound_pack(),
        _ => mixed_squad(),
    }
}
