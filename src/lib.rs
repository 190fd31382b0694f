//! # Lumbung Architecture
//!
//! Lumbung is a **UI-agnostic record store** for a single-village
//! agriculture dashboard. It keeps farmers, paddy plots, marketplace
//! listings, and map settings as JSON record lists and hands them to
//! whatever front end sits on top. The crate owns the data; rendering,
//! forms, and navigation belong to the client.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Layer (services/)                                  │
//! │  - One service per entity kind, bound to a fixed namespace  │
//! │  - Seed data, search fields, derived aggregates             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record Store (store/record_store.rs)                       │
//! │  - Namespace-scoped CRUD over JSON record arrays            │
//! │  - Id assignment, search, snapshots, lossy read recovery    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Backend (store/backend.rs)                         │
//! │  - Abstract StorageBackend trait                            │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principles
//!
//! - **One writer, whole-list writes.** The store assumes a single
//!   process. Every mutation rewrites the affected namespace in one
//!   backend write, so a namespace is never half-updated.
//! - **Reads never fail.** Missing, corrupt, or non-array data is
//!   logged through [`tracing`] and treated as an empty namespace.
//!   Writes return [`error::Result`] and surface every failure.
//! - **No I/O assumptions in the core.** The store and services never
//!   print, never exit, and never assume a terminal. A dashboard, a
//!   REST API, or a test harness can all drive the same code.
//!
//! ## Testing Strategy
//!
//! 1. **Store** (`store/record_store.rs`): thorough unit tests against
//!    [`store::MemBackend`]. This is where the lion's share of testing
//!    lives.
//! 2. **Services** (`services/*.rs`): seed, aggregate, and filter tests
//!    per entity kind.
//! 3. **Integration** (`tests/`): the full stack against a real
//!    directory via [`store::FsBackend`].
//!
//! ## Module Overview
//!
//! - [`store`]: Storage abstraction, backends, and the record store
//! - [`services`]: Domain services for each entity kind
//! - [`model`]: Record types (`Farmer`, `Plot`, `Product`, settings)
//! - [`config`]: Data directory resolution and store configuration
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod model;
pub mod services;
pub mod store;
