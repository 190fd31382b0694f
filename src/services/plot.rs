use crate::error::Result;
use crate::model::Plot;
use crate::store::{RecordStore, StorageBackend, PLOTS};
use chrono::NaiveDate;

/// Fields consulted by [`PlotService::search`].
const SEARCH_FIELDS: [&str; 5] = ["name", "farmer", "variety", "status", "season"];

/// Paddy plot registry bound to the [`PLOTS`] namespace.
pub struct PlotService<'a, B: StorageBackend> {
    store: &'a RecordStore<B>,
}

impl<'a, B: StorageBackend> PlotService<'a, B> {
    pub fn new(store: &'a RecordStore<B>) -> Self {
        Self { store }
    }

    /// Seed the registry with the default plots if it is empty.
    pub fn initialize_default_data(&self) -> Result<()> {
        if !self.all().is_empty() {
            return Ok(());
        }
        let seeded = self.store.bulk_create(PLOTS, &default_plots())?;
        tracing::debug!("Seeded {} default plots", seeded.len());
        Ok(())
    }

    pub fn all(&self) -> Vec<Plot> {
        self.store.get_all(PLOTS)
    }

    pub fn get(&self, id: u64) -> Option<Plot> {
        self.store.get_by_id(PLOTS, id)
    }

    pub fn create(&self, plot: &Plot) -> Result<Plot> {
        self.store.create(PLOTS, plot)
    }

    pub fn update(&self, plot: &Plot) -> Result<Plot> {
        self.store.update(PLOTS, plot)
    }

    pub fn delete(&self, id: u64) -> Result<bool> {
        self.store.delete(PLOTS, id)
    }

    pub fn search(&self, term: &str) -> Vec<Plot> {
        self.store.search(PLOTS, term, &SEARCH_FIELDS)
    }

    pub fn by_farmer(&self, farmer: &str) -> Vec<Plot> {
        self.store.filter(PLOTS, |plot: &Plot| plot.farmer == farmer)
    }

    pub fn by_status(&self, status: &str) -> Vec<Plot> {
        self.store.filter(PLOTS, |plot: &Plot| plot.status == status)
    }

    pub fn by_variety(&self, variety: &str) -> Vec<Plot> {
        self.store.filter(PLOTS, |plot: &Plot| plot.variety == variety)
    }

    /// Sum of plot areas, in hectares.
    pub fn total_area(&self) -> f64 {
        self.all().iter().map(|plot| plot.area).sum()
    }

    /// Sum of recorded harvests, in tons.
    pub fn total_harvest(&self) -> f64 {
        self.all().iter().map(|plot| plot.harvest).sum()
    }

    /// Harvest per hectare over the whole registry. Zero when there are
    /// no plots or no area to divide by.
    pub fn average_yield_per_hectare(&self) -> f64 {
        let plots = self.all();
        if plots.is_empty() {
            return 0.0;
        }
        let total_area: f64 = plots.iter().map(|plot| plot.area).sum();
        if total_area > 0.0 {
            plots.iter().map(|plot| plot.harvest).sum::<f64>() / total_area
        } else {
            0.0
        }
    }
}

fn default_plots() -> Vec<Plot> {
    vec![
        Plot {
            id: 0,
            name: "Sawah Pak Budi - Blok A".to_string(),
            farmer: "Budi Santoso".to_string(),
            area: 2.5,
            coordinates: "-7.2575, 112.7521".to_string(),
            variety: "IR64".to_string(),
            season: "Gadu 2024".to_string(),
            harvest: 8.2,
            status: "Harvested".to_string(),
            planted_at: NaiveDate::from_ymd_opt(2024, 1, 15),
            harvested_at: NaiveDate::from_ymd_opt(2024, 5, 20),
            irrigation: Some("Technical".to_string()),
            land_type: Some("Irrigated paddy".to_string()),
            notes: Some("Good harvest, grain quality high".to_string()),
        },
        Plot {
            id: 0,
            name: "Sawah Bu Sari - Blok B".to_string(),
            farmer: "Sari Wati".to_string(),
            area: 1.8,
            coordinates: "-7.2585, 112.7531".to_string(),
            variety: "Ciherang".to_string(),
            season: "Rendeng 2024".to_string(),
            harvest: 6.5,
            status: "Planting".to_string(),
            planted_at: NaiveDate::from_ymd_opt(2024, 11, 1),
            harvested_at: NaiveDate::from_ymd_opt(2025, 3, 15),
            irrigation: Some("Semi-technical".to_string()),
            land_type: Some("Irrigated paddy".to_string()),
            notes: Some("Normal growth, needs extra fertilizer".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemBackend;

    fn seeded_service(store: &RecordStore<MemBackend>) -> PlotService<'_, MemBackend> {
        let service = PlotService::new(store);
        service.initialize_default_data().unwrap();
        service
    }

    #[test]
    fn seeding_is_idempotent() {
        let store = RecordStore::with_backend(MemBackend::new());
        let service = seeded_service(&store);
        assert_eq!(service.all().len(), 2);

        service.initialize_default_data().unwrap();
        assert_eq!(service.all().len(), 2);
    }

    #[test]
    fn planting_dates_survive_persistence() {
        let store = RecordStore::with_backend(MemBackend::new());
        let service = seeded_service(&store);

        let plot = service.get(1).unwrap();
        assert_eq!(plot.planted_at, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(plot.harvested_at, NaiveDate::from_ymd_opt(2024, 5, 20));
    }

    #[test]
    fn average_yield_divides_harvest_by_area() {
        let store = RecordStore::with_backend(MemBackend::new());
        let service = seeded_service(&store);

        assert!((service.total_area() - 4.3).abs() < 1e-9);
        assert!((service.total_harvest() - 14.7).abs() < 1e-9);
        assert!((service.average_yield_per_hectare() - 14.7 / 4.3).abs() < 1e-9);
    }

    #[test]
    fn average_yield_is_zero_without_plots_or_area() {
        let store = RecordStore::with_backend(MemBackend::new());
        let service = PlotService::new(&store);
        assert_eq!(service.average_yield_per_hectare(), 0.0);

        service
            .create(&Plot {
                name: "Petak kosong".to_string(),
                area: 0.0,
                ..Plot::default()
            })
            .unwrap();
        assert_eq!(service.average_yield_per_hectare(), 0.0);
    }

    #[test]
    fn equality_filters_select_by_field() {
        let store = RecordStore::with_backend(MemBackend::new());
        let service = seeded_service(&store);

        assert_eq!(service.by_farmer("Budi Santoso").len(), 1);
        assert_eq!(service.by_status("Planting").len(), 1);
        assert_eq!(service.by_variety("IR64")[0].name, "Sawah Pak Budi - Blok A");
        assert!(service.by_variety("Inpari 32").is_empty());
    }

    #[test]
    fn search_matches_variety_and_season() {
        let store = RecordStore::with_backend(MemBackend::new());
        let service = seeded_service(&store);

        assert_eq!(service.search("ir64").len(), 1);
        assert_eq!(service.search("rendeng").len(), 1);
        assert_eq!(service.search("blok").len(), 2);
    }
}
