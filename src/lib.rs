pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{ServiceAllowList, UspsSettings};
pub use core::{CarrierNativeMeasures, UspsService};
pub use domain::model::{
    BoxDimensions, CartItem, Country, RateOptions, RateQuery, ShipmentEvent, ShippingOption,
};
pub use domain::ports::{MeasureService, RateProvider, ShipmentTracker};
pub use utils::error::{Result, ShippingError};
