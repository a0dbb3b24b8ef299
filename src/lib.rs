//! Hex Skirmish - deterministic tick-based hex battle engine

pub mod battle;
pub mod core;
