use super::input::{
    CustomerLocation, DeliveryType, Distance, InputSpec, PackageSize, PackageWeight,
    ProductCategory, ShippingMethod, ShippingPriority, Weather,
};

/// Fixed illustrative rows shown next to the estimator. They are display data
/// only and are never fed into an estimate.
pub const SAMPLE_DATASET: [InputSpec; 3] = [
    InputSpec {
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
    },
    InputSpec {
        product_category: ProductCategory::Clothing,
        customer_location: CustomerLocation::Suburban,
        shipping_method: ShippingMethod::Express,
        shipping_priority: ShippingPriority::High,
        weather: Weather::Rainy,
        package_weight: PackageWeight::new_unchecked(12.0),
        package_size: PackageSize::Large,
        distance: Distance::new_unchecked(1200),
        warehouse_proximity: false,
        delivery_type: DeliveryType::Business,
    },
    InputSpec {
        product_category: ProductCategory::HomeKitchen,
        customer_location: CustomerLocation::Rural,
        shipping_method: ShippingMethod::SameDay,
        shipping_priority: ShippingPriority::Urgent,
        weather: Weather::Snowy,
        package_weight: PackageWeight::new_unchecked(8.0),
        package_size: PackageSize::Medium,
        distance: Distance::new_unchecked(500),
        warehouse_proximity: true,
        delivery_type: DeliveryType::Residential,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rows_are_within_bounds() {
        for row in &SAMPLE_DATASET {
            assert!(PackageWeight::new(row.package_weight.kg()).is_ok());
            assert!(Distance::new(row.distance.km() as f64).is_ok());
        }
    }

    #[test]
    fn test_sample_row_values() {
        assert_eq!(SAMPLE_DATASET[1].package_weight.kg(), 12.0);
        assert_eq!(SAMPLE_DATASET[2].product_category, ProductCategory::HomeKitchen);
        assert_eq!(SAMPLE_DATASET[2].distance.km(), 500);
    }
}
