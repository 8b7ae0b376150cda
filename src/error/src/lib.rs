//! Game-wide error taxonomy.
//!
//! Covers the save system, serialization, IO, and identifier lookups. Local
//! gameplay failures (full inventory, not enough mana) are modelled as
//! per-crate error enums next to the code that produces them; this crate only
//! holds the errors that cross subsystem boundaries.

use thiserror::Error;

/// Errors that can surface while running the game.
#[derive(Debug, Error)]
pub enum GameError {
    /// Save system error
    #[error("Save system error: {0}")]
    SaveError(#[from] anyhow::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Invalid save slot
    #[error("Invalid save slot")]
    InvalidSlot,

    /// No save exists in the requested slot. Distinct from corruption so the
    /// caller can offer "new game" instead of masking a bug.
    #[error("No save found")]
    SaveNotFound,

    /// Save data failed structural validation after decoding
    #[error("Corrupted save data: {0}")]
    CorruptedSave(String),

    /// Save format version this build does not understand
    #[error("Incompatible save version: {0}")]
    VersionMismatch(u32),

    /// Unknown content identifier (scene, item, enemy, skill, quest)
    #[error("Unknown {kind} id: {id}")]
    UnknownId { kind: &'static str, id: String },

    /// Game state that should be unreachable through normal play
    #[error("Invalid game state: {0}")]
    InvalidGameState(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json reports missing fields and type mismatches through the
        // same error type as pure syntax errors; both mean the snapshot on
        // disk is not trustworthy.
        if err.is_data() {
            GameError::CorruptedSave(err.to_string())
        } else {
            GameError::DeserializationError(err.to_string())
        }
    }
}

impl GameError {
    pub fn unknown(kind: &'static str, id: impl Into<String>) -> Self {
        GameError::UnknownId {
            kind,
            id: id.into(),
        }
    }
}

/// Convert a game error into a short player-facing message.
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::SaveNotFound => "No saved game found".to_string(),
        GameError::CorruptedSave(_) => "The save file is damaged and cannot be loaded".to_string(),
        GameError::InvalidSlot => "Invalid save slot".to_string(),
        GameError::VersionMismatch(v) => format!("Save version {v} is not supported"),
        GameError::IoError(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "No saved game found".to_string(),
            std::io::ErrorKind::PermissionDenied => "Cannot access the save file".to_string(),
            _ => format!("IO error: {e}"),
        },
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_save_and_corrupt_save_are_distinct() {
        let missing = GameError::SaveNotFound;
        let corrupt = GameError::CorruptedSave("player.stats missing".into());
        assert_ne!(handle_error(&missing), handle_error(&corrupt));
    }

    #[test]
    fn serde_data_errors_map_to_corruption() {
        let err = serde_json::from_str::<u32>("\"not a number\"").unwrap_err();
        assert!(matches!(GameError::from(err), GameError::CorruptedSave(_)));

        let err = serde_json::from_str::<u32>("{{{").unwrap_err();
        assert!(matches!(
            GameError::from(err),
            GameError::DeserializationError(_)
        ));
    }
}
