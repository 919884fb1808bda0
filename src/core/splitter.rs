use crate::domain::model::{PackageDescriptor, PackageSizeClass};

/// Heaviest single package USPS accepts, in pounds.
pub const MAX_PACKAGE_WEIGHT_LB: i32 = 70;

/// A package whose girth plus length exceeds this is oversize.
const MAX_GIRTH_PLUS_LENGTH: i32 = 130;

/// Target girth-plus-length per sub-package when an oversize shipment is
/// divided.
const SPLIT_GIRTH_PLUS_LENGTH: i32 = 108;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentScope {
    Domestic,
    International,
}

/// Splits a measured shipment into carrier-legal packages.
///
/// Within the weight and size limits the shipment ships as one package.
/// Otherwise it is divided into equal sub-packages, enough to satisfy
/// whichever limit demands more. International packages always report
/// 12x12x12 dimensions, a long-standing carrier-side accommodation, so only
/// weight ever splits an international shipment. Ounce remainders are
/// floored at 1 for domestic splits and 0 for international ones; both are
/// carrier-contract quirks to keep as-is.
pub fn split_packages(
    scope: ShipmentScope,
    total_ounces: i32,
    length: i32,
    width: i32,
    height: i32,
) -> Vec<PackageDescriptor> {
    let pounds = total_ounces / 16;
    let ounces = total_ounces % 16;

    let (length, width, height) = match scope {
        ShipmentScope::Domestic => (length, width, height),
        ShipmentScope::International => (12, 12, 12),
    };

    if !too_heavy(pounds) && !too_large(length, height, width) {
        return vec![descriptor(0, pounds, ounces, length, width, height)];
    }

    let by_weight = if too_heavy(pounds) {
        ceil_div(pounds, MAX_PACKAGE_WEIGHT_LB)
    } else {
        1
    };
    let by_dims = if too_large(length, height, width) {
        ceil_div(girth_plus_length(length, height, width), SPLIT_GIRTH_PLUS_LENGTH)
    } else {
        1
    };
    let total_packages = by_weight.max(by_dims).max(1);

    let split_pounds = (pounds / total_packages).max(1);
    let split_ounces = match scope {
        ShipmentScope::Domestic => (ounces / total_packages).max(1),
        ShipmentScope::International => ounces / total_packages,
    };
    let (split_length, split_width, split_height) = match scope {
        ShipmentScope::Domestic => (
            (length / total_packages).max(1),
            (width / total_packages).max(1),
            (height / total_packages).max(1),
        ),
        ShipmentScope::International => (12, 12, 12),
    };

    (0..total_packages as u32)
        .map(|id| {
            descriptor(
                id,
                split_pounds,
                split_ounces,
                split_length,
                split_width,
                split_height,
            )
        })
        .collect()
}

fn descriptor(
    id: u32,
    pounds: i32,
    ounces: i32,
    length: i32,
    width: i32,
    height: i32,
) -> PackageDescriptor {
    PackageDescriptor {
        id,
        pounds,
        ounces,
        length,
        width,
        height,
        girth: height * 2 + width * 2,
        size_class: PackageSizeClass::classify(length, height, width),
        machinable: false,
    }
}

fn too_heavy(pounds: i32) -> bool {
    pounds > MAX_PACKAGE_WEIGHT_LB
}

fn too_large(length: i32, height: i32, width: i32) -> bool {
    girth_plus_length(length, height, width) > MAX_GIRTH_PLUS_LENGTH
}

fn girth_plus_length(length: i32, height: i32, width: i32) -> i32 {
    height * 2 + width * 2 + length
}

fn ceil_div(value: i32, divisor: i32) -> i32 {
    (value + divisor - 1) / divisor
}
