use super::input::{proximity_label, InputSpec, ShippingPriority};
use super::rules;

/// The factors that make up an estimate, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    BaseTime,
    Location,
    Weather,
    Weight,
    Size,
    Distance,
    Warehouse,
    DeliveryType,
}

impl Factor {
    pub fn label(self) -> &'static str {
        match self {
            Factor::BaseTime => "Base Time",
            Factor::Location => "Location Adjustment",
            Factor::Weather => "Weather Adjustment",
            Factor::Weight => "Weight Adjustment",
            Factor::Size => "Size Adjustment",
            Factor::Distance => "Distance Adjustment",
            Factor::Warehouse => "Warehouse Adjustment",
            Factor::DeliveryType => "Delivery Type Adjustment",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub factor: Factor,
    pub days: f64,        // signed, e.g. +2.0 for Rural, -1.0 near a warehouse
    pub reason: String,   // e.g. "Rural", "1200 km > 1000 km"
}

/// Per-factor contributions to the total before the urgent cap and the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub adjustments: Vec<Adjustment>,
}

impl Breakdown {
    /// Sum of all contributions. Equals `Estimate::total`.
    pub fn total(&self) -> f64 {
        self.adjustments.iter().map(|a| a.days).sum()
    }

    /// `(label, days)` pairs in display order.
    pub fn pairs(&self) -> Vec<(&'static str, f64)> {
        self.adjustments
            .iter()
            .map(|a| (a.factor.label(), a.days))
            .collect()
    }

    pub fn get(&self, factor: Factor) -> Option<f64> {
        self.adjustments
            .iter()
            .find(|a| a.factor == factor)
            .map(|a| a.days)
    }

    /// Largest absolute contribution, for scaling bar charts.
    pub fn max_magnitude(&self) -> f64 {
        self.adjustments
            .iter()
            .map(|a| a.days.abs())
            .fold(0.0_f64, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Final estimate in days, after the urgent cap and the floor.
    pub days: f64,
    /// Sum of the breakdown, before the urgent cap and the floor.
    pub total: f64,
    pub breakdown: Breakdown,
    pub urgent_cap_applied: bool,
    pub floor_applied: bool,
}

/// Estimate delivery time for one shipment.
///
/// The breakdown always reports the uncapped contributions, so for urgent or
/// very favourable shipments `days` can differ from `breakdown.total()`.
pub fn estimate(input: &InputSpec) -> Estimate {
    let mut adjustments = Vec::with_capacity(8);

    adjustments.push(Adjustment {
        factor: Factor::BaseTime,
        days: rules::base_days(input.shipping_method),
        reason: format!("{} shipping", input.shipping_method),
    });

    adjustments.push(Adjustment {
        factor: Factor::Location,
        days: rules::location_days(input.customer_location),
        reason: input.customer_location.to_string(),
    });

    adjustments.push(Adjustment {
        factor: Factor::Weather,
        days: rules::weather_days(input.weather),
        reason: input.weather.to_string(),
    });

    let kg = input.package_weight.kg();
    let (days, reason) = match rules::match_bucket(kg, rules::WEIGHT_BUCKETS) {
        Some(bucket) => (bucket.days, format!("{} kg > {} kg", input.package_weight, bucket.above)),
        None => (0.0, format!("{} kg, not heavy", input.package_weight)),
    };
    adjustments.push(Adjustment {
        factor: Factor::Weight,
        days,
        reason,
    });

    adjustments.push(Adjustment {
        factor: Factor::Size,
        days: rules::size_days(input.package_size),
        reason: input.package_size.to_string(),
    });

    let km = input.distance.km();
    let (days, reason) = match rules::match_bucket(km as f64, rules::DISTANCE_BUCKETS) {
        Some(bucket) => (bucket.days, format!("{} km > {} km", km, bucket.above)),
        None => (0.0, format!("{} km, short haul", km)),
    };
    adjustments.push(Adjustment {
        factor: Factor::Distance,
        days,
        reason,
    });

    adjustments.push(Adjustment {
        factor: Factor::Warehouse,
        days: rules::warehouse_days(input.warehouse_proximity),
        reason: format!(
            "near warehouse: {}",
            proximity_label(input.warehouse_proximity)
        ),
    });

    adjustments.push(Adjustment {
        factor: Factor::DeliveryType,
        days: rules::delivery_days(input.delivery_type),
        reason: input.delivery_type.to_string(),
    });

    let breakdown = Breakdown { adjustments };
    let total = breakdown.total();

    let mut days = total;
    let mut urgent_cap_applied = false;
    if input.shipping_priority == ShippingPriority::Urgent && days > rules::URGENT_CAP_DAYS {
        days = rules::URGENT_CAP_DAYS;
        urgent_cap_applied = true;
    }

    // Floor
    let floor_applied = days < rules::MIN_DAYS;
    let days = days.max(rules::MIN_DAYS);

    Estimate {
        days,
        total,
        breakdown,
        urgent_cap_applied,
        floor_applied,
    }
}
