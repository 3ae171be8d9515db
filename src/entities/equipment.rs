//! Weapons carried by investigators and enemies
//!
//! A weapon supplies damage, range, attack type, an accuracy modifier that
//! folds into the wielder's additive modifier stack, and optional sanity
//! damage for eldritch armaments.

use serde::{Deserialize, Serialize};

/// Melee weapons require adjacency in practice (range 1); ranged weapons
/// reach further but suffer the same distance penalty either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: i32,
    pub range: i32,
    pub attack_type: AttackType,
    pub accuracy_modifier: i32,
    pub sanity_damage: i32,
}

impl Weapon {
    pub fn new(
        name: impl Into<String>,
        damage: i32,
        range: i32,
        attack_type: AttackType,
        accuracy_modifier: i32,
        sanity_damage: i32,
    ) -> Self {
        Self {
            name: name.into(),
            damage,
            range,
            attack_type,
            accuracy_modifier,
            sanity_damage,
        }
    }

    // --- Investigator armory ---

    /// Standard .38 sidearm, the default investigator weapon
    pub fn revolver() -> Self {
        Self::new("Revolver", 5, 3, AttackType::Ranged, 0, 0)
    }

    /// Long range, scoped (+10% accuracy)
    pub fn hunting_rifle() -> Self {
        Self::new("Hunting Rifle", 6, 5, AttackType::Ranged, 10, 0)
    }

    /// Devastating up close, wild at distance
    pub fn shotgun() -> Self {
        Self::new("Shotgun", 8, 2, AttackType::Ranged, -10, 0)
    }

    /// High rate of fire, heavy recoil
    pub fn tommy_gun() -> Self {
        Self::new("Tommy Gun", 4, 3, AttackType::Ranged, -5, 0)
    }

    pub fn combat_knife() -> Self {
        Self::new("Combat Knife", 4, 1, AttackType::Melee, 5, 0)
    }

    pub fn fire_axe() -> Self {
        Self::new("Fire Axe", 7, 1, AttackType::Melee, -5, 0)
    }

    pub fn crowbar() -> Self {
        Self::new("Crowbar", 3, 1, AttackType::Melee, 0, 0)
    }

    /// Warded silver dagger; bites at the mind as well as the flesh
    pub fn blessed_blade() -> Self {
        Self::new("Blessed Blade", 5, 1, AttackType::Melee, 0, 3)
    }

    /// Cursed artifact channeling eldritch power, hard to control
    pub fn elder_sign_amulet() -> Self {
        Self::new("Elder Sign Amulet", 3, 4, AttackType::Ranged, -10, 5)
    }

    // --- Enemy armory ---

    pub fn cultist_pistol() -> Self {
        Self::new("Cultist Pistol", 4, 3, AttackType::Ranged, -5, 0)
    }

    pub fn eldritch_claws() -> Self {
        Self::new("Eldritch Claws", 6, 1, AttackType::Melee, 10, 5)
    }

    pub fn tentacle_strike() -> Self {
        Self::new("Tentacle Strike", 5, 2, AttackType::Melee, 0, 4)
    }

    /// Look up a weapon from the armory by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        let weapon = match name.to_ascii_lowercase().as_str() {
            "revolver" => Self::revolver(),
            "hunting rifle" | "rifle" => Self::hunting_rifle(),
            "shotgun" => Self::shotgun(),
            "tommy gun" => Self::tommy_gun(),
            "combat knife" | "knife" => Self::combat_knife(),
            "fire axe" | "axe" => Self::fire_axe(),
            "crowbar" => Self::crowbar(),
            "blessed blade" => Self::blessed_blade(),
            "elder sign amulet" => Self::elder_sign_amulet(),
            "cultist pistol" => Self::cultist_pistol(),
            "eldritch claws" | "hound claws" => Self::eldritch_claws(),
            "tentacle strike" => Self::tentacle_strike(),
            _ => return None,
        };
        Some(weapon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melee_weapons_have_short_reach() {
        for weapon in [Weapon::combat_knife(), Weapon::fire_axe(), Weapon::crowbar()] {
            assert_eq!(weapon.attack_type, AttackType::Melee);
            assert_eq!(weapon.range, 1);
        }
    }

    #[test]
    fn test_eldritch_weapons_carry_sanity_damage() {
        assert!(Weapon::eldritch_claws().sanity_damage > 0);
        assert!(Weapon::blessed_blade().sanity_damage > 0);
        assert_eq!(Weapon::revolver().sanity_damage, 0);
    }

    #[test]
    fn test_armory_lookup() {
        assert_eq!(Weapon::by_name("Shotgun"), Some(Weapon::shotgun()));
        assert_eq!(Weapon::by_name("rifle"), Some(Weapon::hunting_rifle()));
        assert_eq!(Weapon::by_name("rubber chicken"), None);
    }
}
