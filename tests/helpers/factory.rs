pub use super::factories::{FlatRowFactory, SeedFactory};

pub struct Factory;

impl Factory {
    pub fn flat_row() -> FlatRowFactory {
        FlatRowFactory::new()
    }

    pub fn seed() -> SeedFactory {
        SeedFactory::new()
    }

    pub fn empty_seed() -> SeedFactory {
        SeedFactory::empty()
    }
}
