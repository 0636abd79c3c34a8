use std::sync::Arc;

use anyhow::Context;
use prime_common::{
    ListingPatch, ListingQuery, MirrorGenerator, NewListing, PhoneListing, PromoSheet, Selection,
};

use super::db::{DbHandle, InventoryDb};
use super::feed::{StoreEvent, StoreFeed};
use super::mint::{MintOutcome, MirrorMinter};
use super::models::MirrorRecord;
use crate::config::PrimeConfig;
use crate::errors::InventoryError;

/// Every mutation goes through here so that the store and the feed never
/// disagree.
#[derive(Clone)]
pub struct Inventory {
    db: DbHandle,
    feed: StoreFeed,
    minter: Arc<MirrorMinter>,
    max_selected: usize,
}

impl Inventory {
    pub fn new(db: InventoryDb, generator: MirrorGenerator, max_selected: usize) -> Self {
        let db = DbHandle::new(db);
        Self {
            minter: Arc::new(MirrorMinter::new(db.clone(), generator)),
            db,
            feed: StoreFeed::default(),
            max_selected,
        }
    }

    /// Open the configured database, creating its directory if needed.
    pub fn open(config: &PrimeConfig) -> anyhow::Result<Self> {
        let db_path = config.db_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }
        let db = InventoryDb::new(&db_path).context("Failed to initialize inventory database")?;
        tracing::debug!(path = %db_path.display(), "Opened inventory database");
        Ok(Self::new(
            db,
            MirrorGenerator::with_max_attempts(config.max_attempts()),
            config.max_selected(),
        ))
    }

    pub fn feed(&self) -> &StoreFeed {
        &self.feed
    }

    pub fn minter(&self) -> &MirrorMinter {
        &self.minter
    }

    pub fn max_selected(&self) -> usize {
        self.max_selected
    }

    async fn db_call<F, R>(&self, f: F) -> Result<R, InventoryError>
    where
        F: FnOnce(&InventoryDb) -> anyhow::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        self.db.call(f).await.map_err(InventoryError::Database)
    }

    // ── Listings ──────────────────────────────────────────────────────

    pub async fn add_listing(&self, new: NewListing) -> Result<PhoneListing, InventoryError> {
        let new = new.validate()?;
        let listing = self.db_call(move |db| db.create_listing(&new)).await?;
        tracing::info!(id = listing.id, phone_number = %listing.phone_number, "Added phone number");
        self.feed.publish(StoreEvent::ListingCreated {
            listing: listing.clone(),
        });
        Ok(listing)
    }

    pub async fn list_listings(&self, query: &ListingQuery) -> Result<Vec<PhoneListing>, InventoryError> {
        let all = self.db_call(|db| db.list_listings()).await?;
        Ok(query.apply(&all).into_iter().cloned().collect())
    }

    pub async fn get_listing(&self, id: i64) -> Result<PhoneListing, InventoryError> {
        self.db_call(move |db| db.get_listing(id))
            .await?
            .ok_or(InventoryError::ListingNotFound { id })
    }

    pub async fn update_listing(
        &self,
        id: i64,
        patch: ListingPatch,
    ) -> Result<PhoneListing, InventoryError> {
        if patch.is_empty() {
            return Err(InventoryError::EmptyUpdate { id });
        }
        let patch = patch.validate()?;
        let listing = self
            .db_call(move |db| db.update_listing(id, &patch))
            .await?
            .ok_or(InventoryError::ListingNotFound { id })?;
        tracing::info!(id, "Updated phone number");
        self.feed.publish(StoreEvent::ListingUpdated {
            listing: listing.clone(),
        });
        Ok(listing)
    }

    pub async fn mark_sold(&self, id: i64) -> Result<PhoneListing, InventoryError> {
        self.update_listing(id, ListingPatch::mark_sold()).await
    }

    pub async fn delete_listing(&self, id: i64) -> Result<(), InventoryError> {
        let deleted = self.db_call(move |db| db.delete_listing(id)).await?;
        if !deleted {
            return Err(InventoryError::ListingNotFound { id });
        }
        tracing::info!(id, "Deleted phone number");
        self.feed.publish(StoreEvent::ListingDeleted { listing_id: id });
        Ok(())
    }

    // ── Promo sheet ───────────────────────────────────────────────────

    /// Build the promo sheet for `ids`, in the order given.
    pub async fn promo_sheet(&self, ids: Vec<i64>) -> Result<PromoSheet, InventoryError> {
        let selection = Selection::from_ids(ids, self.max_selected)?;
        let wanted = selection.ids().to_vec();
        let found = self
            .db_call(move |db| {
                let mut found = Vec::with_capacity(wanted.len());
                for id in wanted {
                    found.push((id, db.get_listing(id)?));
                }
                Ok(found)
            })
            .await?;

        let mut listings = Vec::with_capacity(found.len());
        for (id, listing) in found {
            listings.push(listing.ok_or(InventoryError::ListingNotFound { id })?);
        }
        Ok(PromoSheet::from_listings(&listings))
    }

    // ── Mirror numbers ────────────────────────────────────────────────

    pub async fn mint_mirror(&self) -> Result<MintOutcome, InventoryError> {
        let outcome = self.minter.mint().await?;
        self.publish_minted(&outcome);
        Ok(outcome)
    }

    pub async fn mint_mirror_with<S>(&self, source: S) -> Result<MintOutcome, InventoryError>
    where
        S: prime_common::RandomSource + Send + 'static,
    {
        let outcome = self.minter.mint_with(source).await?;
        self.publish_minted(&outcome);
        Ok(outcome)
    }

    fn publish_minted(&self, outcome: &MintOutcome) {
        if let MintOutcome::Minted { record } = outcome {
            self.feed.publish(StoreEvent::MirrorMinted {
                record: record.clone(),
            });
        }
    }

    pub async fn mirror_history(&self) -> Result<Vec<MirrorRecord>, InventoryError> {
        self.db_call(|db| db.list_mirror_numbers()).await
    }
}
