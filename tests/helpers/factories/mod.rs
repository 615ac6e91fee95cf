pub mod flat_row_factory;
pub mod seed_factory;

pub use flat_row_factory::FlatRowFactory;
pub use seed_factory::SeedFactory;

#[cfg(test)]
mod flat_row_factory_test;
#[cfg(test)]
mod seed_factory_test;
