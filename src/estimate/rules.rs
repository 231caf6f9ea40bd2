//! Static rule tables. Every lookup is an exhaustive match, so adding a
//! variant to an input enum fails to compile until its adjustment is defined.

use super::input::{CustomerLocation, DeliveryType, PackageSize, ShippingMethod, Weather};

/// Urgent shipments never take longer than this.
pub const URGENT_CAP_DAYS: f64 = 2.0;

/// No estimate goes below this.
pub const MIN_DAYS: f64 = 1.0;

/// Threshold bucket: applies `days` when the measured value is strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub above: f64,
    pub days: f64,
}

/// Package weight buckets (kg).
pub const WEIGHT_BUCKETS: &[Bucket] = &[Bucket {
    above: 10.0,
    days: 1.0,
}];

/// Distance buckets (km), highest threshold first.
pub const DISTANCE_BUCKETS: &[Bucket] = &[
    Bucket {
        above: 1000.0,
        days: 2.0,
    },
    Bucket {
        above: 500.0,
        days: 1.0,
    },
];

/// First bucket whose threshold the value exceeds. First match wins.
pub fn match_bucket(value: f64, buckets: &[Bucket]) -> Option<&Bucket> {
    buckets.iter().find(|b| value > b.above)
}

pub fn base_days(method: ShippingMethod) -> f64 {
    match method {
        ShippingMethod::Standard => 3.0,
        ShippingMethod::Express => 2.0,
        ShippingMethod::SameDay => 1.0,
    }
}

pub fn location_days(location: CustomerLocation) -> f64 {
    match location {
        CustomerLocation::Urban => 0.0,
        CustomerLocation::Suburban => 1.0,
        CustomerLocation::Rural => 2.0,
    }
}

pub fn weather_days(weather: Weather) -> f64 {
    match weather {
        Weather::Sunny => 0.0,
        Weather::Rainy | Weather::Snowy | Weather::Stormy => 1.0,
    }
}

pub fn size_days(size: PackageSize) -> f64 {
    match size {
        PackageSize::Small => 0.0,
        PackageSize::Medium => 0.5,
        PackageSize::Large => 1.0,
    }
}

pub fn warehouse_days(near_warehouse: bool) -> f64 {
    if near_warehouse {
        -1.0
    } else {
        0.0
    }
}

pub fn delivery_days(delivery_type: DeliveryType) -> f64 {
    match delivery_type {
        DeliveryType::Residential => 0.0,
        DeliveryType::Business => -1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_bucket_first_match_wins() {
        // 1200 exceeds both thresholds; the higher one is listed first
        assert_eq!(match_bucket(1200.0, DISTANCE_BUCKETS).unwrap().days, 2.0);
        assert_eq!(match_bucket(501.0, DISTANCE_BUCKETS).unwrap().days, 1.0);
    }

    #[test]
    fn test_bucket_thresholds_are_exclusive() {
        assert!(match_bucket(500.0, DISTANCE_BUCKETS).is_none());
        assert_eq!(match_bucket(1000.0, DISTANCE_BUCKETS).unwrap().days, 1.0);
        assert!(match_bucket(10.0, WEIGHT_BUCKETS).is_none());
        assert_eq!(match_bucket(10.1, WEIGHT_BUCKETS).unwrap().days, 1.0);
    }

    #[test]
    fn test_base_days_table() {
        assert_eq!(base_days(ShippingMethod::Standard), 3.0);
        assert_eq!(base_days(ShippingMethod::Express), 2.0);
        assert_eq!(base_days(ShippingMethod::SameDay), 1.0);
    }

    #[test]
    fn test_weather_days() {
        assert_eq!(weather_days(Weather::Sunny), 0.0);
        assert_eq!(weather_days(Weather::Rainy), 1.0);
        assert_eq!(weather_days(Weather::Snowy), 1.0);
        assert_eq!(weather_days(Weather::Stormy), 1.0);
    }

    #[test]
    fn test_reductions_are_negative() {
        assert_eq!(warehouse_days(true), -1.0);
        assert_eq!(warehouse_days(false), 0.0);
        assert_eq!(delivery_days(DeliveryType::Business), -1.0);
        assert_eq!(delivery_days(DeliveryType::Residential), 0.0);
    }
}
