//! Unit model, equipment, and the combat deck

pub mod deck;
pub mod equipment;
pub mod unit;

pub use deck::{Card, CardKind, CombatDeck, DeckStatistics};
pub use equipment::{AttackType, Weapon};
pub use unit::{
    balanced_squad, cultist_squad, hound_pack, investigator_squad, mixed_squad,
    random_enemy_squad, Archetype, StatBlock, StatModifiers, Team, Unit, UnitRoster,
    MAX_ACTION_POINTS,
};
