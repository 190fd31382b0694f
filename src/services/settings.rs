use crate::error::Result;
use crate::model::{Coordinate, DemographicLayer, LegendItem, Record};
use crate::store::{
    ExportData, RecordStore, StorageBackend, COORDINATES, DEMOGRAPHIC_LAYERS, LEGEND_ITEMS,
};
use serde_json::Value;

/// Namespaces owned by the settings service.
const SETTINGS_NAMESPACES: [&str; 3] = [COORDINATES, DEMOGRAPHIC_LAYERS, LEGEND_ITEMS];

/// Map presentation settings: marker coordinates, demographic layers,
/// and the legend shown next to the village map.
pub struct SettingsService<'a, B: StorageBackend> {
    store: &'a RecordStore<B>,
}

impl<'a, B: StorageBackend> SettingsService<'a, B> {
    pub fn new(store: &'a RecordStore<B>) -> Self {
        Self { store }
    }

    // --- Coordinates ---

    /// Seed the default map markers if none are stored.
    pub fn initialize_coordinates(&self) -> Result<()> {
        if !self.coordinates().is_empty() {
            return Ok(());
        }
        let seeded = self.store.bulk_create(COORDINATES, &default_coordinates())?;
        tracing::debug!("Seeded {} default coordinates", seeded.len());
        Ok(())
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.store.get_all(COORDINATES)
    }

    pub fn coordinate(&self, id: u64) -> Option<Coordinate> {
        self.store.get_by_id(COORDINATES, id)
    }

    pub fn create_coordinate(&self, coordinate: &Coordinate) -> Result<Coordinate> {
        self.store.create(COORDINATES, coordinate)
    }

    pub fn update_coordinate(&self, coordinate: &Coordinate) -> Result<Coordinate> {
        self.store.update(COORDINATES, coordinate)
    }

    pub fn delete_coordinate(&self, id: u64) -> Result<bool> {
        self.store.delete(COORDINATES, id)
    }

    // --- Demographic layers ---

    /// Seed the default demographic layers if none are stored.
    pub fn initialize_layers(&self) -> Result<()> {
        if !self.layers().is_empty() {
            return Ok(());
        }
        let seeded = self
            .store
            .bulk_create(DEMOGRAPHIC_LAYERS, &default_layers())?;
        tracing::debug!("Seeded {} default demographic layers", seeded.len());
        Ok(())
    }

    pub fn layers(&self) -> Vec<DemographicLayer> {
        self.store.get_all(DEMOGRAPHIC_LAYERS)
    }

    pub fn layer(&self, id: u64) -> Option<DemographicLayer> {
        self.store.get_by_id(DEMOGRAPHIC_LAYERS, id)
    }

    pub fn create_layer(&self, layer: &DemographicLayer) -> Result<DemographicLayer> {
        self.store.create(DEMOGRAPHIC_LAYERS, layer)
    }

    pub fn update_layer(&self, layer: &DemographicLayer) -> Result<DemographicLayer> {
        self.store.update(DEMOGRAPHIC_LAYERS, layer)
    }

    pub fn delete_layer(&self, id: u64) -> Result<bool> {
        self.store.delete(DEMOGRAPHIC_LAYERS, id)
    }

    // --- Legend ---

    /// Seed the default legend if none is stored.
    pub fn initialize_legend(&self) -> Result<()> {
        if !self.legend_items().is_empty() {
            return Ok(());
        }
        let seeded = self.store.bulk_create(LEGEND_ITEMS, &default_legend())?;
        tracing::debug!("Seeded {} default legend items", seeded.len());
        Ok(())
    }

    pub fn legend_items(&self) -> Vec<LegendItem> {
        self.store.get_all(LEGEND_ITEMS)
    }

    pub fn legend_item(&self, id: u64) -> Option<LegendItem> {
        self.store.get_by_id(LEGEND_ITEMS, id)
    }

    pub fn create_legend_item(&self, item: &LegendItem) -> Result<LegendItem> {
        self.store.create(LEGEND_ITEMS, item)
    }

    pub fn update_legend_item(&self, item: &LegendItem) -> Result<LegendItem> {
        self.store.update(LEGEND_ITEMS, item)
    }

    pub fn delete_legend_item(&self, id: u64) -> Result<bool> {
        self.store.delete(LEGEND_ITEMS, id)
    }

    // --- Snapshots ---

    /// Snapshot of the three settings namespaces, keyed by namespace so
    /// the result round-trips through [`import_all`](Self::import_all)
    /// and the store-level import alike.
    pub fn export_all(&self) -> ExportData {
        self.store.export_all(&SETTINGS_NAMESPACES)
    }

    /// Restore a settings snapshot. Namespaces the service does not own
    /// are ignored. With `overwrite` the stored lists are replaced as
    /// they are; otherwise each record is re-created and therefore gets
    /// a fresh id. Records that no longer parse are skipped with a
    /// warning.
    pub fn import_all(&self, data: &ExportData, overwrite: bool) -> Result<()> {
        if overwrite {
            let subset: ExportData = data
                .iter()
                .filter(|(namespace, _)| SETTINGS_NAMESPACES.contains(&namespace.as_str()))
                .map(|(namespace, records)| (namespace.clone(), records.clone()))
                .collect();
            return self.store.import_all(&subset, true);
        }

        if let Some(records) = data.get(COORDINATES) {
            self.append_records::<Coordinate>(COORDINATES, records)?;
        }
        if let Some(records) = data.get(DEMOGRAPHIC_LAYERS) {
            self.append_records::<DemographicLayer>(DEMOGRAPHIC_LAYERS, records)?;
        }
        if let Some(records) = data.get(LEGEND_ITEMS) {
            self.append_records::<LegendItem>(LEGEND_ITEMS, records)?;
        }
        Ok(())
    }

    fn append_records<T: Record>(&self, namespace: &str, records: &[Value]) -> Result<()> {
        for value in records {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(record) => {
                    self.store.create(namespace, &record)?;
                }
                Err(err) => {
                    tracing::warn!("Skipping unreadable record for '{}': {}", namespace, err);
                }
            }
        }
        Ok(())
    }
}

fn default_coordinates() -> Vec<Coordinate> {
    vec![
        Coordinate {
            id: 0,
            name: "Balai Desa Sumberagung".to_string(),
            latitude: -7.0521,
            longitude: 110.7987,
            category: "Public facility".to_string(),
            description: "Village hall and administration center of Desa Sumberagung".to_string(),
        },
        Coordinate {
            id: 0,
            name: "Pasar Tradisional Sumberagung".to_string(),
            latitude: -7.0525,
            longitude: 110.7995,
            category: "Commerce".to_string(),
            description: "Traditional market for farm produce and daily goods".to_string(),
        },
        Coordinate {
            id: 0,
            name: "Masjid Al-Ikhlas Sumberagung".to_string(),
            latitude: -7.0518,
            longitude: 110.7985,
            category: "Public facility".to_string(),
            description: "Main village mosque for religious and community activities".to_string(),
        },
        Coordinate {
            id: 0,
            name: "SD Negeri Sumberagung 1".to_string(),
            latitude: -7.0515,
            longitude: 110.7992,
            category: "Education".to_string(),
            description: "State primary school of Desa Sumberagung".to_string(),
        },
        Coordinate {
            id: 0,
            name: "Puskesmas Pembantu Sumberagung".to_string(),
            latitude: -7.0528,
            longitude: 110.798,
            category: "Health".to_string(),
            description: "Community health post of the village".to_string(),
        },
        Coordinate {
            id: 0,
            name: "Wilayah Persawahan Utara Sumberagung".to_string(),
            latitude: -7.051,
            longitude: 110.7975,
            category: "Agriculture".to_string(),
            description: "Technically irrigated paddies in the north of Desa Sumberagung"
                .to_string(),
        },
        Coordinate {
            id: 0,
            name: "Wilayah Persawahan Selatan Sumberagung".to_string(),
            latitude: -7.0535,
            longitude: 110.8,
            category: "Agriculture".to_string(),
            description: "Rain-fed paddies in the south of Desa Sumberagung".to_string(),
        },
        Coordinate {
            id: 0,
            name: "Wilayah Persawahan Timur Sumberagung".to_string(),
            latitude: -7.052,
            longitude: 110.801,
            category: "Agriculture".to_string(),
            description: "Semi-technically irrigated paddies in the east of Desa Sumberagung"
                .to_string(),
        },
        Coordinate {
            id: 0,
            name: "Wilayah Persawahan Barat Sumberagung".to_string(),
            latitude: -7.0525,
            longitude: 110.7965,
            category: "Agriculture".to_string(),
            description: "Traditionally irrigated paddies in the west of Desa Sumberagung"
                .to_string(),
        },
    ]
}

fn default_layers() -> Vec<DemographicLayer> {
    vec![
        DemographicLayer {
            id: 0,
            name: "Population density of Desa Sumberagung".to_string(),
            color: "#3B82F6".to_string(),
            property: "population".to_string(),
            value_range: "150-400 people/km²".to_string(),
            visible: true,
        },
        DemographicLayer {
            id: 0,
            name: "Paddy field distribution".to_string(),
            color: "#22C55E".to_string(),
            property: "agriculture".to_string(),
            value_range: "Irrigated - rain-fed paddies".to_string(),
            visible: true,
        },
        DemographicLayer {
            id: 0,
            name: "Education level".to_string(),
            color: "#10B981".to_string(),
            property: "education".to_string(),
            value_range: "Primary school - university".to_string(),
            visible: true,
        },
        DemographicLayer {
            id: 0,
            name: "Main occupation".to_string(),
            color: "#F59E0B".to_string(),
            property: "occupation".to_string(),
            value_range: "Farmers - traders".to_string(),
            visible: true,
        },
    ]
}

fn default_legend() -> Vec<LegendItem> {
    vec![
        LegendItem {
            id: 0,
            label: "Technically irrigated paddy".to_string(),
            color: "#22C55E".to_string(),
            symbol: "polygon".to_string(),
            category: "Agriculture".to_string(),
        },
        LegendItem {
            id: 0,
            label: "Rain-fed paddy".to_string(),
            color: "#84CC16".to_string(),
            symbol: "polygon".to_string(),
            category: "Agriculture".to_string(),
        },
        LegendItem {
            id: 0,
            label: "Semi-technically irrigated paddy".to_string(),
            color: "#65A30D".to_string(),
            symbol: "polygon".to_string(),
            category: "Agriculture".to_string(),
        },
        LegendItem {
            id: 0,
            label: "Residential area".to_string(),
            color: "#F59E0B".to_string(),
            symbol: "polygon".to_string(),
            category: "Demographics".to_string(),
        },
        LegendItem {
            id: 0,
            label: "Public facility".to_string(),
            color: "#3B82F6".to_string(),
            symbol: "marker".to_string(),
            category: "Infrastructure".to_string(),
        },
        LegendItem {
            id: 0,
            label: "Commercial area".to_string(),
            color: "#8B5CF6".to_string(),
            symbol: "marker".to_string(),
            category: "Commerce".to_string(),
        },
        LegendItem {
            id: 0,
            label: "Education facility".to_string(),
            color: "#06B6D4".to_string(),
            symbol: "marker".to_string(),
            category: "Infrastructure".to_string(),
        },
        LegendItem {
            id: 0,
            label: "Health facility".to_string(),
            color: "#EF4444".to_string(),
            symbol: "marker".to_string(),
            category: "Infrastructure".to_string(),
        },
    ]
}
