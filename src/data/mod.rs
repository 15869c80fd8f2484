pub mod dataset;
pub mod loader;

pub use dataset::{Batch, Dataset};
pub use loader::{DataLoader, DataSource};
