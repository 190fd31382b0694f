use crate::error::Result;
use crate::model::Farmer;
use crate::store::{RecordStore, StorageBackend, FARMERS};

/// Fields consulted by [`FarmerService::search`].
const SEARCH_FIELDS: [&str; 5] = ["name", "address", "status", "email", "phone"];

/// Farmer registry bound to the [`FARMERS`] namespace.
pub struct FarmerService<'a, B: StorageBackend> {
    store: &'a RecordStore<B>,
}

impl<'a, B: StorageBackend> FarmerService<'a, B> {
    pub fn new(store: &'a RecordStore<B>) -> Self {
        Self { store }
    }

    /// Seed the registry with the default farmers if it is empty.
    pub fn initialize_default_data(&self) -> Result<()> {
        if !self.all().is_empty() {
            return Ok(());
        }
        let seeded = self.store.bulk_create(FARMERS, &default_farmers())?;
        tracing::debug!("Seeded {} default farmers", seeded.len());
        Ok(())
    }

    pub fn all(&self) -> Vec<Farmer> {
        self.store.get_all(FARMERS)
    }

    pub fn get(&self, id: u64) -> Option<Farmer> {
        self.store.get_by_id(FARMERS, id)
    }

    pub fn create(&self, farmer: &Farmer) -> Result<Farmer> {
        self.store.create(FARMERS, farmer)
    }

    pub fn update(&self, farmer: &Farmer) -> Result<Farmer> {
        self.store.update(FARMERS, farmer)
    }

    pub fn delete(&self, id: u64) -> Result<bool> {
        self.store.delete(FARMERS, id)
    }

    pub fn search(&self, term: &str) -> Vec<Farmer> {
        self.store.search(FARMERS, term, &SEARCH_FIELDS)
    }

    pub fn by_status(&self, status: &str) -> Vec<Farmer> {
        self.store.filter(FARMERS, |farmer: &Farmer| farmer.status == status)
    }

    pub fn by_education(&self, education: &str) -> Vec<Farmer> {
        self.store.filter(FARMERS, |farmer: &Farmer| {
            farmer.education.as_deref() == Some(education)
        })
    }

    pub fn count(&self) -> usize {
        self.all().len()
    }

    /// Sum of the cultivated area over all farmers, in hectares.
    pub fn total_area(&self) -> f64 {
        self.all().iter().map(|farmer| farmer.total_area).sum()
    }

    /// Sum of the recorded harvest over all farmers, in tons.
    pub fn total_yield(&self) -> f64 {
        self.all().iter().map(|farmer| farmer.total_yield).sum()
    }
}

fn default_farmers() -> Vec<Farmer> {
    vec![
        Farmer {
            id: 0,
            name: "Budi Santoso".to_string(),
            age: 45,
            address: "Desa Sukamaju RT 02/03".to_string(),
            plot_count: 2,
            total_area: 2.5,
            total_yield: 20.5,
            status: "Active".to_string(),
            phone: Some("081234567890".to_string()),
            email: Some("budi.santoso@email.com".to_string()),
            gender: Some("Male".to_string()),
            education: Some("SMA".to_string()),
            years_farming: Some(20),
        },
        Farmer {
            id: 0,
            name: "Sari Wati".to_string(),
            age: 38,
            address: "Desa Sukamaju RT 01/02".to_string(),
            plot_count: 1,
            total_area: 1.8,
            total_yield: 11.7,
            status: "Active".to_string(),
            phone: Some("081234567891".to_string()),
            email: Some("sari.wati@email.com".to_string()),
            gender: Some("Female".to_string()),
            education: Some("SMP".to_string()),
            years_farming: Some(15),
        },
    ]
}
