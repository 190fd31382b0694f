use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A flat entity stored in one namespace: a unique integer id plus
/// entity-specific fields. Ids are assigned by the store on creation
/// (one above the current maximum) and never change afterwards.
pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

/// A registered farmer (petani).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Farmer {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub address: String,
    pub plot_count: u32,
    /// Cultivated area in hectares.
    pub total_area: f64,
    /// Harvest across all plots in tons.
    pub total_yield: f64,
    pub status: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub education: Option<String>,
    pub years_farming: Option<u32>,
}

/// A rice-field plot (sawah). The owning farmer is referenced by name
/// only; there is no foreign key between namespaces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plot {
    pub id: u64,
    pub name: String,
    pub farmer: String,
    /// Plot area in hectares.
    pub area: f64,
    /// Free-text "lat, lng" pair as entered on the map picker.
    pub coordinates: String,
    pub variety: String,
    pub season: String,
    /// Harvested amount in tons.
    pub harvest: f64,
    /// Growth stage, validated only by the form's option list.
    pub status: String,
    pub planted_at: Option<NaiveDate>,
    pub harvested_at: Option<NaiveDate>,
    pub irrigation: Option<String>,
    pub land_type: Option<String>,
    pub notes: Option<String>,
}

/// A marketplace listing (produk), sold by a farmer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub farmer: String,
    pub location: String,
    /// Price per unit in rupiah.
    pub price: u64,
    pub stock: u32,
    pub unit: String,
    pub grade: String,
    pub description: String,
    pub contact: String,
}

/// A named point of interest shown on the village map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub id: u64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub description: String,
}

/// A thematic map overlay (demographics, land use, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DemographicLayer {
    pub id: u64,
    pub name: String,
    /// Hex color used by the overlay, e.g. "#3B82F6".
    pub color: String,
    pub property: String,
    pub value_range: String,
    pub visible: bool,
}

/// One entry of the map legend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegendItem {
    pub id: u64,
    pub label: String,
    pub color: String,
    /// "polygon" or "marker".
    pub symbol: String,
    pub category: String,
}

impl Record for Farmer {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Record for Plot {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Record for Product {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Record for Coordinate {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Record for DemographicLayer {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Record for LegendItem {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}
