//! Issues mirror numbers that have never been handed out before.
//!
//! Loading the issued set, generating, and inserting happen under one async
//! lock, so two requests in this process cannot both pick the same number.
//! The unique index on `mirror_numbers` covers writers in other processes: if
//! an insert loses that race, the number joins the known set and generation
//! continues.

use prime_common::mirror::{Generation, MirrorGenerator, RandomSource, RngSource};
use serde::Serialize;
use tokio::sync::Mutex;

use super::db::DbHandle;
use super::models::{MirrorRecord, now_millis};
use crate::errors::InventoryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MintOutcome {
    Minted { record: MirrorRecord },
    /// Every attempt collided with an issued number.
    Exhausted { attempts: u32, issued: usize },
}

pub struct MirrorMinter {
    db: DbHandle,
    generator: MirrorGenerator,
    lock: Mutex<()>,
}

impl MirrorMinter {
    pub fn new(db: DbHandle, generator: MirrorGenerator) -> Self {
        Self {
            db,
            generator,
            lock: Mutex::new(()),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.generator.max_attempts()
    }

    /// Mint with an entropy-seeded generator.
    pub async fn mint(&self) -> Result<MintOutcome, InventoryError> {
        self.mint_with(RngSource::from_entropy()).await
    }

    pub async fn mint_with<S>(&self, mut source: S) -> Result<MintOutcome, InventoryError>
    where
        S: RandomSource + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let generator = self.generator;

        let outcome = self
            .db
            .call(move |db| {
                let mut issued = db.mirror_codes()?;
                loop {
                    match generator.generate(&issued, &mut source) {
                        Generation::Accepted(code) => {
                            if let Some(record) = db.insert_mirror_number(&code, now_millis())? {
                                return Ok(MintOutcome::Minted { record });
                            }
                            tracing::warn!(code = %code, "Mirror number taken by another writer; retrying");
                            issued.insert(code);
                        }
                        Generation::Exhausted => {
                            return Ok(MintOutcome::Exhausted {
                                attempts: generator.max_attempts(),
                                issued: issued.len(),
                            });
                        }
                    }
                }
            })
            .await
            .map_err(InventoryError::Database)?;

        match &outcome {
            MintOutcome::Minted { record } => {
                tracing::info!(mirror_number = %record.mirror_number, "Minted mirror number");
            }
            MintOutcome::Exhausted { attempts, issued } => {
                tracing::warn!(attempts, issued, "Mirror number generation exhausted");
            }
        }
        Ok(outcome)
    }
}
