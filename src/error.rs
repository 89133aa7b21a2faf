//! Error taxonomy
//!
//! Configuration errors are fatal and surface immediately. Running out of
//! steps is not an error; it is reported through the episode status.

use thiserror::Error;

use crate::sim::SessionPhase;

/// Errors produced while loading, validating, building or driving a level.
#[derive(Debug, Error)]
pub enum PhyreError {
    // === Configuration ===
    #[error("object `{0}` is not a valid type (expected `basket`, `*ball*` or `*platform*`)")]
    UnknownObjectKind(String),
    #[error("object `{name}` is a {actual} but its name reads as a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("no objects found in level")]
    EmptyLevel,
    #[error("basket not found in level")]
    MissingBasket,
    #[error("no target found in level")]
    MissingTarget,
    #[error("target `{0}` not found in level")]
    UnknownTarget(String),
    #[error("the basket cannot be the target")]
    TargetIsBasket,
    #[error("no action found in level")]
    NoActions,
    #[error("action `{0}` not found in level")]
    UnknownAction(String),
    #[error("`{0}` cannot be both an action and the target or basket")]
    InvalidAction(String),
    #[error("cannot remove `{name}`: it is the {role}")]
    ProtectedObject { name: String, role: &'static str },
    #[error("object `{0}` already exists in level")]
    DuplicateObject(String),
    #[error("cannot add `{0}`: name is reserved")]
    ReservedName(String),
    #[error("expected {expected} action positions, got {got}")]
    ActionCount { expected: usize, got: usize },
    #[error("cannot step while {0:?}; call reset first")]
    NotSteppable(SessionPhase),

    // === Lookup ===
    #[error("object `{0}` not found in level")]
    ObjectNotFound(String),
    #[error("no body tagged `{0}` in the physics world")]
    BodyNotFound(String),

    // === I/O ===
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PhyreError>;
