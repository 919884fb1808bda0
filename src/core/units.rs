use crate::domain::ports::MeasureService;
use crate::utils::error::{Result, ShippingError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Carrier unit keywords looked up in the host's measure table.
pub const MEASURE_WEIGHT_UNIT: &str = "ounce";
pub const MEASURE_DIMENSION_UNIT: &str = "inches";

/// Converts host-unit weights and dimensions into whole carrier units
/// (ounces, inches), rounding up with a configurable floor.
pub struct UnitConverter {
    weight_ratio: Decimal,
    dimension_ratio: Decimal,
}

impl UnitConverter {
    /// Resolves the carrier units from the host's measure table. A missing
    /// unit definition is a configuration error, never silently defaulted.
    pub fn for_carrier(measures: &dyn MeasureService) -> Result<Self> {
        let weight_ratio =
            measures
                .weight_ratio(MEASURE_WEIGHT_UNIT)
                .ok_or_else(|| ShippingError::ConfigError {
                    message: format!(
                        "USPS shipping service: could not load \"{MEASURE_WEIGHT_UNIT}\" measure weight"
                    ),
                })?;
        let dimension_ratio = measures.dimension_ratio(MEASURE_DIMENSION_UNIT).ok_or_else(|| {
            ShippingError::ConfigError {
                message: format!(
                    "USPS shipping service: could not load \"{MEASURE_DIMENSION_UNIT}\" measure dimension"
                ),
            }
        })?;

        Ok(Self {
            weight_ratio,
            dimension_ratio,
        })
    }

    /// Total weight in whole ounces, rounded up and clamped to `floor`.
    pub fn convert_weight(&self, raw: Decimal, floor: i32) -> i32 {
        convert(raw, self.weight_ratio, floor)
    }

    /// One linear dimension in whole inches, rounded up and clamped to `floor`.
    pub fn convert_dimension(&self, raw: Decimal, floor: i32) -> i32 {
        convert(raw, self.dimension_ratio, floor)
    }
}

fn convert(raw: Decimal, ratio: Decimal, floor: i32) -> i32 {
    let rounded = (raw * ratio).ceil();
    rounded.to_i32().unwrap_or(i32::MAX).max(floor)
}

/// Measure table for hosts whose primary units already are the carrier's
/// ounces and inches.
pub struct CarrierNativeMeasures;

impl MeasureService for CarrierNativeMeasures {
    fn weight_ratio(&self, unit: &str) -> Option<Decimal> {
        (unit == MEASURE_WEIGHT_UNIT).then_some(Decimal::ONE)
    }

    fn dimension_ratio(&self, unit: &str) -> Option<Decimal> {
        (unit == MEASURE_DIMENSION_UNIT).then_some(Decimal::ONE)
    }
}
