//! Attribution stage of the campaign insights pipeline: the event store,
//! first-touch attribution and conversion simulation.

pub mod conversion;
pub mod engine;
pub mod store;

pub use conversion::{simulate_conversions, ConversionParams};
pub use engine::{attribute, total_reached, AttributedClicks};
pub use store::EventStore;
