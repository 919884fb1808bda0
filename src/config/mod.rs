pub mod settings;

pub use settings::{ServiceAllowList, UspsSettings};
