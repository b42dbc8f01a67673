use thiserror::Error;

use crate::domain::models::TrackKind;

/// Errors raised by positional lookups on a [`StreamCatalog`](crate::domain::catalog::StreamCatalog).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Track {id} not found in catalog")]
    NotFound { id: u64 },

    #[error("Position {position} is out of range (1-{total})")]
    OutOfRange { position: usize, total: usize },

    #[error("Position {position} holds no {expected} track")]
    WrongKind { position: usize, expected: TrackKind },
}
