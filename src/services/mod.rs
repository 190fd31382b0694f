//! Domain services over the record store.
//!
//! Each service binds one entity kind to its namespace and adds the
//! seed data and derived aggregates the dashboard needs. Services
//! borrow the store they are given and hold no state of their own, so
//! constructing one is free and several can share a store.

pub mod farmer;
pub mod plot;
pub mod product;
pub mod settings;

pub use farmer::FarmerService;
pub use plot::PlotService;
pub use product::ProductService;
pub use settings::SettingsService;

use crate::error::Result;
use crate::store::{RecordStore, StorageBackend, ALL_NAMESPACES};

/// Seed every namespace that is still empty with its default records.
/// Safe to call on every start.
pub fn initialize_all<B: StorageBackend>(store: &RecordStore<B>) -> Result<()> {
    FarmerService::new(store).initialize_default_data()?;
    PlotService::new(store).initialize_default_data()?;
    ProductService::new(store).initialize_default_data()?;

    let settings = SettingsService::new(store);
    settings.initialize_coordinates()?;
    settings.initialize_layers()?;
    settings.initialize_legend()?;

    tracing::debug!("Village data initialized");
    Ok(())
}

/// Drop every namespace and re-seed from the defaults.
pub fn reset_all<B: StorageBackend>(store: &RecordStore<B>) -> Result<()> {
    store.clear_all(&ALL_NAMESPACES)?;
    initialize_all(store)
}
