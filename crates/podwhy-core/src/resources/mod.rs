pub mod quantities;

pub use quantities::{parse_quantity, ResourceQuantities};
