pub mod facade;
pub mod filter;
pub mod http;
pub mod request;
pub mod response;
pub mod splitter;
pub mod units;
pub mod xml;

pub use facade::UspsService;
pub use splitter::ShipmentScope;
pub use units::{CarrierNativeMeasures, UnitConverter};
