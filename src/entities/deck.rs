//! Combat deck - a shuffled, stateful source of damage modifiers
//!
//! Each investigator owns a personal deck; enemies share a single monster
//! deck. A card is drawn on every successful hit, never on a miss, so the
//! deck is a scarce resource the player can reason about. The deck holds
//! two ordered piles (draw and discard); when the draw pile runs dry the
//! discard pile is reshuffled into a fresh draw pile.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::STANDARD_DECK_SIZE;
use crate::core::error::{Result, TacticsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Zero damage regardless of base (still a hit, still consumed)
    Null,
    /// Double damage (critical)
    Multiply,
    Plus,
    Minus,
    Zero,
}

/// Immutable damage-modifier card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub kind: CardKind,
    pub modifier: i32,
}

impl Card {
    pub fn null() -> Self {
        Self { kind: CardKind::Null, modifier: 0 }
    }

    pub fn multiply() -> Self {
        Self { kind: CardKind::Multiply, modifier: 2 }
    }

    pub fn plus(modifier: i32) -> Self {
        Self { kind: CardKind::Plus, modifier }
    }

    pub fn minus(modifier: i32) -> Self {
        Self { kind: CardKind::Minus, modifier: -modifier.abs() }
    }

    pub fn zero() -> Self {
        Self { kind: CardKind::Zero, modifier: 0 }
    }

    pub fn is_null(&self) -> bool {
        self.kind == CardKind::Null
    }

    pub fn is_multiply(&self) -> bool {
        self.kind == CardKind::Multiply
    }

    /// Deterministic damage transform. Damage never goes negative.
    pub fn apply_to_damage(&self, base_damage: i32) -> i32 {
        match self.kind {
            CardKind::Null => 0,
            CardKind::Multiply => base_damage * 2,
            CardKind::Plus | CardKind::Minus | CardKind::Zero => {
                (base_damage + self.modifier).max(0)
            }
        }
    }

    /// Display label: "NULL", "x2", "+2", "-1", "+0"
    pub fn label(&self) -> String {
        match self.kind {
            CardKind::Null => "NULL".to_string(),
            CardKind::Multiply => "x2".to_string(),
            CardKind::Zero => "+0".to_string(),
            CardKind::Plus => format!("+{}", self.modifier),
            CardKind::Minus => format!("{}", self.modifier),
        }
    }
}

/// Lifetime draw statistics; persist across `reset()`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeckStatistics {
    pub total_draws: u32,
    pub crit_rate: f32,
    pub null_rate: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatDeck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    total_drawn: u32,
    nulls_drawn: u32,
    crits_drawn: u32,
}

impl CombatDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard 20-card deck: 1x NULL, 1x x2, 1x +2, 5x +1, 5x -1, 7x +0
    pub fn standard(rng: &mut impl Rng) -> Self {
        let mut deck = Self::new();
        deck.add_card(Card::null());
        deck.add_card(Card::multiply());
        deck.add_card(Card::plus(2));
        for _ in 0..5 {
            deck.add_card(Card::plus(1));
        }
        for _ in 0..5 {
            deck.add_card(Card::minus(1));
        }
        for _ in 0..7 {
            deck.add_card(Card::zero());
        }
        debug_assert_eq!(deck.size(), STANDARD_DECK_SIZE);
        deck.shuffle(rng);
        deck
    }

    /// Veteran deck with some -1 cards removed
    pub fn improved(rng: &mut impl Rng, remove_negatives: usize) -> Self {
        let mut deck = Self::standard(rng);
        for _ in 0..remove_negatives {
            deck.remove_card("-1");
        }
        deck
    }

    /// Extra +1s and a second crit, one -1 removed
    pub fn blessed(rng: &mut impl Rng) -> Self {
        let mut deck = Self::standard(rng);
        deck.add_card(Card::plus(1));
        deck.add_card(Card::plus(1));
        deck.add_card(Card::multiply());
        deck.remove_card("-1");
        deck.shuffle(rng);
        deck
    }

    /// Extra -1s and a second NULL
    pub fn cursed(rng: &mut impl Rng) -> Self {
        let mut deck = Self::standard(rng);
        deck.add_card(Card::minus(1));
        deck.add_card(Card::minus(1));
        deck.add_card(Card::null());
        deck.shuffle(rng);
        deck
    }

    /// Add a card to the bottom of the draw pile
    pub fn add_card(&mut self, card: Card) {
        self.draw_pile.push(card);
    }

    /// Remove the first card matching `label` from either pile (deck
    /// improvement). Returns false if no such card exists.
    pub fn remove_card(&mut self, label: &str) -> bool {
        if let Some(i) = self.draw_pile.iter().position(|c| c.label() == label) {
            self.draw_pile.remove(i);
            return true;
        }
        if let Some(i) = self.discard_pile.iter().position(|c| c.label() == label) {
            self.discard_pile.remove(i);
            return true;
        }
        false
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.draw_pile.shuffle(rng);
    }

    /// Draw the top card, moving it to the discard pile. Reshuffles the
    /// discard pile into a fresh draw pile first if the draw pile is empty.
    /// Both piles empty means cards were removed without replacement; that
    /// is `DeckExhausted`, the only way a draw can fail.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Result<Card> {
        if self.draw_pile.is_empty() {
            if self.discard_pile.is_empty() {
                tracing::warn!("combat deck exhausted");
                return Err(TacticsError::DeckExhausted);
            }
            self.reshuffle_discard(rng);
        }

        let card = self.draw_pile.remove(0);
        self.discard_pile.push(card);

        self.total_drawn += 1;
        if card.is_null() {
            self.nulls_drawn += 1;
        } else if card.is_multiply() {
            self.crits_drawn += 1;
        }

        Ok(card)
    }

    fn reshuffle_discard(&mut self, rng: &mut impl Rng) {
        self.draw_pile = std::mem::take(&mut self.discard_pile);
        self.shuffle(rng);
        tracing::debug!(cards = self.draw_pile.len(), "deck reshuffled");
    }

    /// Look at the top of the draw pile without drawing
    pub fn peek(&self, count: usize) -> &[Card] {
        &self.draw_pile[..count.min(self.draw_pile.len())]
    }

    /// Total cards across both piles
    pub fn size(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }

    /// Cards left before the next reshuffle
    pub fn cards_remaining(&self) -> usize {
        self.draw_pile.len()
    }

    /// Card label -> count over both piles
    pub fn composition(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for card in self.draw_pile.iter().chain(self.discard_pile.iter()) {
            *counts.entry(card.label()).or_insert(0) += 1;
        }
        counts
    }

    /// Merge the discard pile back into the draw pile and reshuffle, for a
    /// new battle. Lifetime statistics are kept.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        let discard = std::mem::take(&mut self.discard_pile);
        self.draw_pile.extend(discard);
        self.shuffle(rng);
    }

    pub fn statistics(&self) -> DeckStatistics {
        if self.total_drawn == 0 {
            return DeckStatistics::default();
        }
        DeckStatistics {
            total_draws: self.total_drawn,
            crit_rate: self.crits_drawn as f32 / self.total_drawn as f32,
            null_rate: self.nulls_drawn as f32 / self.total_drawn as f32,
        }
    }
}
