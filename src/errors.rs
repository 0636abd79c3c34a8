//! Typed errors for the inventory service.
//!
//! Running out of mirror-number attempts is not an error here; it comes
//! back as [`crate::inventory::mint::MintOutcome::Exhausted`].

use prime_common::{ListingError, SelectionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Phone number {id} not found")]
    ListingNotFound { id: i64 },

    #[error(transparent)]
    InvalidListing(#[from] ListingError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Nothing to update for phone number {id}")]
    EmptyUpdate { id: i64 },

    #[error("Database error: {0}")]
    Database(#[source] anyhow::Error),
}

impl InventoryError {
    /// Whether the caller sent something unusable, as opposed to a fault on
    /// our side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidListing(_) | Self::Selection(_) | Self::EmptyUpdate { .. }
        )
    }
}
