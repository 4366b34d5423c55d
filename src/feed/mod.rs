//! Synthetic demand, renewable, and price series.

/// Hourly demand model.
pub mod demand;
/// Time-of-use price model.
pub mod price;
/// Solar generation model.
pub mod solar;
pub mod synthetic;
pub mod types;
/// Wind generation model.
pub mod wind;

pub use demand::DemandProfile;
pub use price::PriceProfile;
pub use solar::SolarProfile;
pub use synthetic::SyntheticFeed;
pub use types::{DataFeed, SeriesKind, SeriesPoint};
pub use wind::WindProfile;
