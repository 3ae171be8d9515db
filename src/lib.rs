//! Eldritch Tactics - grid-based tactical combat resolution engine
//!
//! The engine is consumed by a presentation/turn-orchestration layer: it
//! accepts unit stats and commands, resolves moves and attacks on a shared
//! grid, and returns structured result data with no rendering concerns.

pub mod battle;
pub mod core;
pub mod entities;
