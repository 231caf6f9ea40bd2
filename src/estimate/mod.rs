pub mod engine;
pub mod input;
pub mod rules;
pub mod sample;
pub mod validation;

pub use engine::{estimate, Adjustment, Breakdown, Estimate, Factor};
pub use input::{
    Choice, CustomerLocation, DeliveryType, Distance, Field, InputSpec, PackageSize,
    PackageWeight, ProductCategory, ShippingMethod, ShippingPriority, Weather,
};
pub use sample::SAMPLE_DATASET;
pub use validation::{validate, validate_with, FieldError, Problem, ProximityValue, RawInput};
