//! Phone-number inventory back-end.
//!
//! ## Overview
//!
//! Listings and issued mirror numbers live in one SQLite database. Both the
//! CLI and the HTTP server go through [`service::Inventory`], which validates
//! input, writes to the store, and announces every change on a
//! [`feed::StoreFeed`] so open views can refresh.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐   HTTP   ┌──────────────────────────────────────────────────┐
//! │  Client  │ ───────> │  server.rs  (axum Router, ServerConfig)          │
//! │          │ <─────── │    └─ api.rs  (route handlers, AppState)         │
//! └──────────┘ WebSocket│         │                                        │
//!      ^                │         v                                        │
//!      │                │  service.rs  (Inventory)                         │
//!      │                │         │                │                       │
//!      │                │         v                v                       │
//!      │                │  db.rs (InventoryDb)   mint.rs (MirrorMinter)    │
//!      │                │         │                                        │
//!      │                │         v                                        │
//!      └─────────────── │  feed.rs (StoreFeed) ──> ws.rs                   │
//!                       └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Supporting Modules
//!
//! | Module    | Responsibility                                            |
//! |-----------|-----------------------------------------------------------|
//! | `models`  | `MirrorRecord`, timestamp helper                          |
//! | `db`      | SQLite access via `DbHandle` (thin `Arc<Mutex<_>>`)       |
//! | `feed`    | `StoreEvent` broadcast + `subscribe` / `Unsubscribe`      |
//! | `mint`    | Serialized load-generate-insert for mirror numbers        |
//! | `ws`      | Pushes `StoreEvent`s to WebSocket clients                 |
//!
//! ## Typical Request Flow (generate a mirror number)
//!
//! 1. `POST /api/mirror` → `api::mint_mirror()`
//! 2. `Inventory::mint_mirror()` → `MirrorMinter::mint()` takes the mint
//!    lock, loads every issued number, and runs the bounded generator.
//! 3. An accepted number is inserted; the unique index rejects a number that
//!    another process issued first, and generation continues without it.
//! 4. The new `MirrorRecord` is published as `StoreEvent::MirrorMinted` and
//!    the handler answers `201`. Exhaustion answers `503` and stores nothing.

pub mod api;
pub mod db;
pub mod feed;
pub mod mint;
pub mod models;
pub mod server;
pub mod service;
pub mod ws;

pub use service::Inventory;
