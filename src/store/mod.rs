//! Persistence layer for village records.
//!
//! The layer is split into "how bytes are stored" and "what the records
//! mean". [`StorageBackend`] answers the first question with a minimal
//! read/write/remove contract over string keys; [`RecordStore`] answers
//! the second by treating each key as a namespace holding one JSON array
//! of records and layering ids, search, and snapshots on top. Domain
//! code talks to the store and never to a backend directly, so tests run
//! against [`MemBackend`] while the application runs against
//! [`FsBackend`].
//!
//! On disk (with [`FsBackend`]) a data directory looks like:
//!
//! ```text
//! <data dir>/
//! ├── config.json
//! ├── farmers.json
//! ├── plots.json
//! ├── products.json
//! ├── coordinates.json
//! ├── demographic_layers.json
//! └── legend_items.json
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use record_store::{ExportData, RecordStore};

/// Namespace for farmer records.
pub const FARMERS: &str = "farmers";
/// Namespace for plot records.
pub const PLOTS: &str = "plots";
/// Namespace for product listings.
pub const PRODUCTS: &str = "products";
/// Namespace for map coordinate markers.
pub const COORDINATES: &str = "coordinates";
/// Namespace for demographic map layers.
pub const DEMOGRAPHIC_LAYERS: &str = "demographic_layers";
/// Namespace for map legend entries.
pub const LEGEND_ITEMS: &str = "legend_items";

/// Every namespace the crate manages, in seeding order.
pub const ALL_NAMESPACES: [&str; 6] = [
    FARMERS,
    PLOTS,
    PRODUCTS,
    COORDINATES,
    DEMOGRAPHIC_LAYERS,
    LEGEND_ITEMS,
];
