use crate::error::Result;
use crate::model::Product;
use crate::store::{RecordStore, StorageBackend, PRODUCTS};

/// Fields consulted by [`ProductService::search`].
const SEARCH_FIELDS: [&str; 5] = ["name", "farmer", "location", "grade", "description"];

/// Marketplace listing registry bound to the [`PRODUCTS`] namespace.
pub struct ProductService<'a, B: StorageBackend> {
    store: &'a RecordStore<B>,
}

impl<'a, B: StorageBackend> ProductService<'a, B> {
    pub fn new(store: &'a RecordStore<B>) -> Self {
        Self { store }
    }

    /// Seed the registry with the default listings if it is empty.
    pub fn initialize_default_data(&self) -> Result<()> {
        if !self.all().is_empty() {
            return Ok(());
        }
        let seeded = self.store.bulk_create(PRODUCTS, &default_products())?;
        tracing::debug!("Seeded {} default products", seeded.len());
        Ok(())
    }

    pub fn all(&self) -> Vec<Product> {
        self.store.get_all(PRODUCTS)
    }

    pub fn get(&self, id: u64) -> Option<Product> {
        self.store.get_by_id(PRODUCTS, id)
    }

    pub fn create(&self, product: &Product) -> Result<Product> {
        self.store.create(PRODUCTS, product)
    }

    pub fn update(&self, product: &Product) -> Result<Product> {
        self.store.update(PRODUCTS, product)
    }

    pub fn delete(&self, id: u64) -> Result<bool> {
        self.store.delete(PRODUCTS, id)
    }

    pub fn search(&self, term: &str) -> Vec<Product> {
        self.store.search(PRODUCTS, term, &SEARCH_FIELDS)
    }

    pub fn by_farmer(&self, farmer: &str) -> Vec<Product> {
        self.store
            .filter(PRODUCTS, |product: &Product| product.farmer == farmer)
    }

    pub fn by_grade(&self, grade: &str) -> Vec<Product> {
        self.store
            .filter(PRODUCTS, |product: &Product| product.grade == grade)
    }

    pub fn in_stock(&self) -> Vec<Product> {
        self.store
            .filter(PRODUCTS, |product: &Product| product.stock > 0)
    }

    /// Listings priced within `[min, max]`, both ends inclusive.
    pub fn by_price_range(&self, min: u64, max: u64) -> Vec<Product> {
        self.store.filter(PRODUCTS, |product: &Product| {
            product.price >= min && product.price <= max
        })
    }

    /// Set the stock level of one listing. Returns whether a listing
    /// with that id existed.
    pub fn update_stock(&self, id: u64, stock: u32) -> Result<bool> {
        let mut product = match self.get(id) {
            Some(product) => product,
            None => return Ok(false),
        };
        product.stock = stock;
        self.update(&product)?;
        Ok(true)
    }

    /// Total value of everything on offer, price times stock.
    pub fn total_inventory_value(&self) -> u64 {
        self.all()
            .iter()
            .map(|product| product.price * u64::from(product.stock))
            .sum()
    }

    pub fn total_stock(&self) -> u64 {
        self.all().iter().map(|product| u64::from(product.stock)).sum()
    }
}

fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: 0,
            name: "Beras Premium".to_string(),
            farmer: "Budi Santoso".to_string(),
            location: "Desa Sukamaju RT 02/03".to_string(),
            price: 12000,
            stock: 500,
            unit: "kg".to_string(),
            grade: "A".to_string(),
            description: "Premium quality rice from organic paddies".to_string(),
            contact: "081234567890".to_string(),
        },
        Product {
            id: 0,
            name: "Beras Merah Organik".to_string(),
            farmer: "Sari Wati".to_string(),
            location: "Desa Sukamaju RT 01/02".to_string(),
            price: 15000,
            stock: 250,
            unit: "kg".to_string(),
            grade: "Premium".to_string(),
            description: "Organic red rice grown without pesticides".to_string(),
            contact: "081234567891".to_string(),
        },
    ]
}
