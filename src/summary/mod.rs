pub mod scalar_writer;

pub use scalar_writer::{ScalarPoint, ScalarWriter};
