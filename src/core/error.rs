use thiserror::Error;

use crate::battle::character::CharacterId;
use crate::battle::hex::Position;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid skill '{skill_id}' on {character_id}: {reason}")]
    InvalidSkill {
        character_id: CharacterId,
        skill_id: String,
        reason: String,
    },

    #[error("Duplicate character id: {0}")]
    DuplicateCharacter(CharacterId),

    #[error("Cell {position:?} is occupied by more than one character ({character_id})")]
    OccupiedCell {
        character_id: CharacterId,
        position: Position,
    },

    #[error("Character {character_id} placed off the board at {position:?}")]
    OffGrid {
        character_id: CharacterId,
        position: Position,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
