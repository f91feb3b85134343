use thiserror::Error;

use super::entity::{EnemyType, EntityHandle, EntityKind};

/// Engine failures. None of them are fatal: callers log and skip the operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{kind:?} pool exhausted (capacity {capacity})")]
    PoolExhausted { kind: EntityKind, capacity: usize },

    #[error("{handle} is not an active entity")]
    NotActive { handle: EntityHandle },

    #[error("{enemy:?} spawn needs {needed} enemy slots, only {acquired} were free")]
    PartialCompositeSpawn { enemy: EnemyType, needed: usize, acquired: usize },
}
