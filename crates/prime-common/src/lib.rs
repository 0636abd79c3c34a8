//! Domain types shared by the Prime Numbers store, API and CLI.
//!
//! Nothing in this crate performs I/O.

pub mod error;
pub mod listing;
pub mod mirror;
pub mod price;
pub mod promo;
pub mod query;
pub mod selection;

pub use error::{ListingError, SelectionError};
pub use listing::{ListingPatch, NewListing, PhoneListing};
pub use mirror::{Generation, MirrorGenerator, RandomSource, RngSource, ScriptedSource};
pub use price::format_price;
pub use promo::PromoSheet;
pub use query::{ListingQuery, SortOrder};
pub use selection::Selection;
