use serde::{Serialize, Serializer};
use std::fmt;

use super::validation::{FieldError, Problem};

/// The ten shipment attributes, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ProductCategory,
    CustomerLocation,
    ShippingMethod,
    ShippingPriority,
    Weather,
    PackageWeight,
    PackageSize,
    Distance,
    WarehouseProximity,
    DeliveryType,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::ProductCategory,
        Field::CustomerLocation,
        Field::ShippingMethod,
        Field::ShippingPriority,
        Field::Weather,
        Field::PackageWeight,
        Field::PackageSize,
        Field::Distance,
        Field::WarehouseProximity,
        Field::DeliveryType,
    ];

    /// Wire name used in JSON bodies, config files and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Field::ProductCategory => "productCategory",
            Field::CustomerLocation => "customerLocation",
            Field::ShippingMethod => "shippingMethod",
            Field::ShippingPriority => "shippingPriority",
            Field::Weather => "weather",
            Field::PackageWeight => "packageWeight",
            Field::PackageSize => "packageSize",
            Field::Distance => "distance",
            Field::WarehouseProximity => "warehouseProximity",
            Field::DeliveryType => "deliveryType",
        }
    }

    /// Human label shown next to the value in tables and the form.
    pub fn label(self) -> &'static str {
        match self {
            Field::ProductCategory => "Product Category",
            Field::CustomerLocation => "Customer Location",
            Field::ShippingMethod => "Shipping Method",
            Field::ShippingPriority => "Shipping Priority",
            Field::Weather => "Weather Conditions",
            Field::PackageWeight => "Package Weight (kg)",
            Field::PackageSize => "Package Size",
            Field::Distance => "Distance (km)",
            Field::WarehouseProximity => "Warehouse Proximity",
            Field::DeliveryType => "Delivery Type",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::PackageWeight | Field::Distance)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase alphanumerics only, so "Same-Day", "same day" and "SAME_DAY" compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// An enumerated input field with a fixed, ordered set of values.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    const FIELD: Field;
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }

    /// Lenient parse: case, whitespace and punctuation are ignored.
    fn parse(s: &str) -> Result<Self, FieldError> {
        let wanted = normalize(s);
        Self::ALL
            .iter()
            .copied()
            .find(|c| normalize(c.label()) == wanted)
            .ok_or_else(|| {
                FieldError::new(
                    Self::FIELD,
                    Problem::NotInDomain {
                        value: s.trim().to_string(),
                        allowed: Self::labels(),
                    },
                )
            })
    }

    /// Next (or previous) value, wrapping around.
    fn cycle(self, forward: bool) -> Self {
        let all = Self::ALL;
        let idx = all.iter().position(|c| *c == self).unwrap_or(0);
        let next = if forward {
            (idx + 1) % all.len()
        } else {
            (idx + all.len() - 1) % all.len()
        };
        all[next]
    }
}

macro_rules! choice {
    ($(#[$meta:meta])* $name:ident, $field:expr, { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const FIELD: Field = $field;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as Choice>::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

choice!(
    /// Informational only; never changes the estimate.
    ProductCategory, Field::ProductCategory, {
        Electronics => "Electronics",
        Clothing => "Clothing",
        HomeKitchen => "Home & Kitchen",
        Books => "Books",
        Other => "Other",
    }
);

choice!(CustomerLocation, Field::CustomerLocation, {
    Urban => "Urban",
    Suburban => "Suburban",
    Rural => "Rural",
});

choice!(ShippingMethod, Field::ShippingMethod, {
    Standard => "Standard",
    Express => "Express",
    SameDay => "Same-Day",
});

choice!(ShippingPriority, Field::ShippingPriority, {
    Normal => "Normal",
    High => "High",
    Urgent => "Urgent",
});

choice!(Weather, Field::Weather, {
    Sunny => "Sunny",
    Rainy => "Rainy",
    Snowy => "Snowy",
    Stormy => "Stormy",
});

choice!(PackageSize, Field::PackageSize, {
    Small => "Small",
    Medium => "Medium",
    Large => "Large",
});

choice!(DeliveryType, Field::DeliveryType, {
    Residential => "Residential",
    Business => "Business",
});

pub fn proximity_label(near: bool) -> &'static str {
    if near {
        "Yes"
    } else {
        "No"
    }
}

/// Parse a Yes/No answer for warehouse proximity.
pub fn parse_proximity(s: &str) -> Result<bool, FieldError> {
    match normalize(s).as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        _ => Err(FieldError::new(
            Field::WarehouseProximity,
            Problem::NotInDomain {
                value: s.trim().to_string(),
                allowed: vec!["Yes", "No"],
            },
        )),
    }
}

/// Package weight in kilograms, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PackageWeight(f64);

impl PackageWeight {
    pub const MIN: f64 = 0.1;
    pub const MAX: f64 = 100.0;
    pub const STEP: f64 = 0.1;

    pub fn new(kg: f64) -> Result<Self, FieldError> {
        if kg.is_finite() && (Self::MIN..=Self::MAX).contains(&kg) {
            Ok(Self(kg))
        } else {
            Err(FieldError::new(
                Field::PackageWeight,
                Problem::OutOfRange {
                    value: kg.to_string(),
                    min: "0.1".to_string(),
                    max: "100.0".to_string(),
                },
            ))
        }
    }

    pub(crate) const fn new_unchecked(kg: f64) -> Self {
        Self(kg)
    }

    pub fn kg(self) -> f64 {
        self.0
    }

    /// Move one step up or down, rounded to a tenth and clamped to bounds.
    pub fn step(self, forward: bool) -> Self {
        let delta = if forward { Self::STEP } else { -Self::STEP };
        let next = ((self.0 + delta) * 10.0).round() / 10.0;
        Self(next.clamp(Self::MIN, Self::MAX))
    }
}

/// Shortest form of the stored value with at least one decimal: "5.0", "10.04".
impl fmt::Display for PackageWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.to_string();
        if text.contains('.') {
            f.write_str(&text)
        } else {
            write!(f, "{}.0", text)
        }
    }
}

/// Distance to destination in whole kilometres, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Distance(u32);

impl Distance {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 5000;

    /// Accepts any number that is a whole kilometre count in range.
    pub fn new(km: f64) -> Result<Self, FieldError> {
        if !km.is_finite() || km.fract() != 0.0 {
            return Err(FieldError::new(
                Field::Distance,
                Problem::NotWholeNumber { value: km },
            ));
        }
        if km < Self::MIN as f64 || km > Self::MAX as f64 {
            return Err(FieldError::new(
                Field::Distance,
                Problem::OutOfRange {
                    value: km.to_string(),
                    min: Self::MIN.to_string(),
                    max: Self::MAX.to_string(),
                },
            ));
        }
        Ok(Self(km as u32))
    }

    pub(crate) const fn new_unchecked(km: u32) -> Self {
        Self(km)
    }

    pub fn km(self) -> u32 {
        self.0
    }

    pub fn step(self, forward: bool) -> Self {
        let next = if forward {
            self.0.saturating_add(1)
        } else {
            self.0.saturating_sub(1)
        };
        Self(next.clamp(Self::MIN, Self::MAX))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One complete, validated set of shipment attributes.
///
/// Values are never mutated in place; form edits build a new `InputSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSpec {
    pub product_category: ProductCategory,
    pub customer_location: CustomerLocation,
    pub shipping_method: ShippingMethod,
    pub shipping_priority: ShippingPriority,
    pub weather: Weather,
    pub package_weight: PackageWeight,
    pub package_size: PackageSize,
    pub distance: Distance,
    pub warehouse_proximity: bool,
    pub delivery_type: DeliveryType,
}

impl InputSpec {
    /// Initial values of the input form.
    pub const FORM_DEFAULTS: InputSpec = InputSpec {
        product_category: ProductCategory::Electronics,
        customer_location: CustomerLocation::Urban,
        shipping_method: ShippingMethod::Standard,
        shipping_priority: ShippingPriority::Normal,
        weather: Weather::Sunny,
        package_weight: PackageWeight::new_unchecked(5.0),
        package_size: PackageSize::Small,
        distance: Distance::new_unchecked(100),
        warehouse_proximity: true,
        delivery_type: DeliveryType::Residential,
    };

    /// Display text for a single field's value.
    pub fn value_label(&self, field: Field) -> String {
        match field {
            Field::ProductCategory => self.product_category.to_string(),
            Field::CustomerLocation => self.customer_location.to_string(),
            Field::ShippingMethod => self.shipping_method.to_string(),
            Field::ShippingPriority => self.shipping_priority.to_string(),
            Field::Weather => self.weather.to_string(),
            Field::PackageWeight => self.package_weight.to_string(),
            Field::PackageSize => self.package_size.to_string(),
            Field::Distance => self.distance.to_string(),
            Field::WarehouseProximity => proximity_label(self.warehouse_proximity).to_string(),
            Field::DeliveryType => self.delivery_type.to_string(),
        }
    }

    /// `(label, value)` pairs in form order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        Field::ALL
            .iter()
            .map(|field| (field.label(), self.value_label(*field)))
            .collect()
    }

    /// Copy with one field moved to its next/previous value.
    /// Enums wrap around, numbers step and clamp, the Yes/No field toggles.
    pub fn cycled(self, field: Field, forward: bool) -> Self {
        match field {
            Field::ProductCategory => Self {
                product_category: self.product_category.cycle(forward),
                ..self
            },
            Field::CustomerLocation => Self {
                customer_location: self.customer_location.cycle(forward),
                ..self
            },
            Field::ShippingMethod => Self {
                shipping_method: self.shipping_method.cycle(forward),
                ..self
            },
            Field::ShippingPriority => Self {
                shipping_priority: self.shipping_priority.cycle(forward),
                ..self
            },
            Field::Weather => Self {
                weather: self.weather.cycle(forward),
                ..self
            },
            Field::PackageWeight => Self {
                package_weight: self.package_weight.step(forward),
                ..self
            },
            Field::PackageSize => Self {
                package_size: self.package_size.cycle(forward),
                ..self
            },
            Field::Distance => Self {
                distance: self.distance.step(forward),
                ..self
            },
            Field::WarehouseProximity => Self {
                warehouse_proximity: !self.warehouse_proximity,
                ..self
            },
            Field::DeliveryType => Self {
                delivery_type: self.delivery_type.cycle(forward),
                ..self
            },
        }
    }
}

impl Default for InputSpec {
    fn default() -> Self {
        Self::FORM_DEFAULTS
    }
}
