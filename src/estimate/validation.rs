use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::input::{
    parse_proximity, proximity_label, Choice, CustomerLocation, DeliveryType, Distance, Field,
    InputSpec, PackageSize, PackageWeight, ProductCategory, ShippingMethod, ShippingPriority,
    Weather,
};

/// What is wrong with a single field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Problem {
    #[error("is required")]
    Missing,

    #[error("'{value}' is not one of {}", .allowed.join(", "))]
    NotInDomain {
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("{value} is outside {min}..={max}")]
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },

    #[error("{value} is not a whole number")]
    NotWholeNumber { value: f64 },

    #[error("'{value}' is not a number")]
    NotANumber { value: String },

    #[error("expected {expected}, got {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {problem}")]
pub struct FieldError {
    pub field: Field,
    pub problem: Problem,
}

impl FieldError {
    pub fn new(field: Field, problem: Problem) -> Self {
        Self { field, problem }
    }
}

/// Warehouse proximity arrives either as a JSON/YAML boolean or as "Yes"/"No".
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ProximityValue {
    Flag(bool),
    Label(String),
}

/// Unvalidated input as it comes from CLI flags, request bodies or config files.
///
/// Every field is optional so that missing values can be reported (or filled
/// from defaults) instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_proximity: Option<ProximityValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<String>,
}

impl RawInput {
    /// Fill every missing field from `fallback`.
    pub fn or(self, fallback: &RawInput) -> RawInput {
        RawInput {
            product_category: self
                .product_category
                .or_else(|| fallback.product_category.clone()),
            customer_location: self
                .customer_location
                .or_else(|| fallback.customer_location.clone()),
            shipping_method: self
                .shipping_method
                .or_else(|| fallback.shipping_method.clone()),
            shipping_priority: self
                .shipping_priority
                .or_else(|| fallback.shipping_priority.clone()),
            weather: self.weather.or_else(|| fallback.weather.clone()),
            package_weight: self.package_weight.or(fallback.package_weight),
            package_size: self.package_size.or_else(|| fallback.package_size.clone()),
            distance: self.distance.or(fallback.distance),
            warehouse_proximity: self
                .warehouse_proximity
                .or_else(|| fallback.warehouse_proximity.clone()),
            delivery_type: self.delivery_type.or_else(|| fallback.delivery_type.clone()),
        }
    }

    /// Current raw text of a field, if set.
    pub fn get(&self, field: Field) -> Option<String> {
        match field {
            Field::ProductCategory => self.product_category.clone(),
            Field::CustomerLocation => self.customer_location.clone(),
            Field::ShippingMethod => self.shipping_method.clone(),
            Field::ShippingPriority => self.shipping_priority.clone(),
            Field::Weather => self.weather.clone(),
            Field::PackageWeight => self.package_weight.map(|kg| kg.to_string()),
            Field::PackageSize => self.package_size.clone(),
            Field::Distance => self.distance.map(|km| km.to_string()),
            Field::WarehouseProximity => self.warehouse_proximity.as_ref().map(|p| match p {
                ProximityValue::Flag(near) => proximity_label(*near).to_string(),
                ProximityValue::Label(s) => s.clone(),
            }),
            Field::DeliveryType => self.delivery_type.clone(),
        }
    }

    /// Set a field from user-typed text. Numeric fields must parse as numbers;
    /// everything else is stored as-is and checked by [`validate`].
    pub fn set_text(&mut self, field: Field, text: &str) -> Result<(), FieldError> {
        let text = text.trim();
        let number = || {
            text.parse::<f64>().map_err(|_| {
                FieldError::new(
                    field,
                    Problem::NotANumber {
                        value: text.to_string(),
                    },
                )
            })
        };
        match field {
            Field::ProductCategory => self.product_category = Some(text.to_string()),
            Field::CustomerLocation => self.customer_location = Some(text.to_string()),
            Field::ShippingMethod => self.shipping_method = Some(text.to_string()),
            Field::ShippingPriority => self.shipping_priority = Some(text.to_string()),
            Field::Weather => self.weather = Some(text.to_string()),
            Field::PackageWeight => self.package_weight = Some(number()?),
            Field::PackageSize => self.package_size = Some(text.to_string()),
            Field::Distance => self.distance = Some(number()?),
            Field::WarehouseProximity => {
                self.warehouse_proximity = Some(ProximityValue::Label(text.to_string()))
            }
            Field::DeliveryType => self.delivery_type = Some(text.to_string()),
        }
        Ok(())
    }
}

/// JSON type name for error messages
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn wrong_type(field: Field, expected: &'static str, value: &Value) -> FieldError {
    FieldError::new(
        field,
        Problem::WrongType {
            expected,
            found: json_type(value),
        },
    )
}

fn json_text(field: Field, value: &Value) -> Result<Option<String>, FieldError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(wrong_type(field, "a string", other)),
    }
}

fn json_number(field: Field, value: &Value) -> Result<Option<f64>, FieldError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            FieldError::new(field, Problem::NotANumber { value: s.clone() })
        }),
        other => Err(wrong_type(field, "a number", other)),
    }
}

fn json_proximity(field: Field, value: &Value) -> Result<Option<ProximityValue>, FieldError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(near) => Ok(Some(ProximityValue::Flag(*near))),
        Value::String(s) => Ok(Some(ProximityValue::Label(s.clone()))),
        other => Err(wrong_type(field, "Yes/No or a boolean", other)),
    }
}

impl RawInput {
    /// Read a JSON object key by key.
    ///
    /// A value of the wrong JSON type is reported on its own field and left
    /// unset. Unknown keys fail the whole body with `Err`.
    pub fn from_json(map: &Map<String, Value>) -> Result<(RawInput, Vec<FieldError>), String> {
        if let Some(key) = map
            .keys()
            .find(|key| !Field::ALL.iter().any(|f| f.name() == key.as_str()))
        {
            return Err(format!("unknown field `{}`", key));
        }

        let mut raw = RawInput::default();
        let mut errors = Vec::new();

        for field in Field::ALL {
            let Some(value) = map.get(field.name()) else {
                continue;
            };
            let outcome = match field {
                Field::PackageWeight => json_number(field, value).map(|v| raw.package_weight = v),
                Field::Distance => json_number(field, value).map(|v| raw.distance = v),
                Field::WarehouseProximity => {
                    json_proximity(field, value).map(|v| raw.warehouse_proximity = v)
                }
                _ => json_text(field, value).and_then(|v| match v {
                    Some(text) => raw.set_text(field, &text),
                    None => Ok(()),
                }),
            };
            if let Err(e) = outcome {
                errors.push(e);
            }
        }

        Ok((raw, errors))
    }
}

impl From<&InputSpec> for RawInput {
    fn from(input: &InputSpec) -> Self {
        RawInput {
            product_category: Some(input.product_category.to_string()),
            customer_location: Some(input.customer_location.to_string()),
            shipping_method: Some(input.shipping_method.to_string()),
            shipping_priority: Some(input.shipping_priority.to_string()),
            weather: Some(input.weather.to_string()),
            package_weight: Some(input.package_weight.kg()),
            package_size: Some(input.package_size.to_string()),
            distance: Some(input.distance.km() as f64),
            warehouse_proximity: Some(ProximityValue::Flag(input.warehouse_proximity)),
            delivery_type: Some(input.delivery_type.to_string()),
        }
    }
}

fn required<T>(field: Field, value: Option<T>) -> Result<T, FieldError> {
    value.ok_or_else(|| FieldError::new(field, Problem::Missing))
}

fn choice<C: Choice>(value: &Option<String>) -> Result<C, FieldError> {
    C::parse(required(C::FIELD, value.as_deref())?)
}

/// Validate raw input into an [`InputSpec`].
/// Returns all validation errors at once (not just the first), in form order.
pub fn validate(raw: &RawInput) -> Result<InputSpec, Vec<FieldError>> {
    let mut errors = Vec::new();

    let product_category = choice::<ProductCategory>(&raw.product_category);
    let customer_location = choice::<CustomerLocation>(&raw.customer_location);
    let shipping_method = choice::<ShippingMethod>(&raw.shipping_method);
    let shipping_priority = choice::<ShippingPriority>(&raw.shipping_priority);
    let weather = choice::<Weather>(&raw.weather);
    let package_weight =
        required(Field::PackageWeight, raw.package_weight).and_then(PackageWeight::new);
    let package_size = choice::<PackageSize>(&raw.package_size);
    let distance = required(Field::Distance, raw.distance).and_then(Distance::new);
    let warehouse_proximity = required(Field::WarehouseProximity, raw.warehouse_proximity.as_ref())
        .and_then(|p| match p {
            ProximityValue::Flag(near) => Ok(*near),
            ProximityValue::Label(s) => parse_proximity(s),
        });
    let delivery_type = choice::<DeliveryType>(&raw.delivery_type);

    fn take<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
        result.map_err(|e| errors.push(e)).ok()
    }

    let product_category = take(product_category, &mut errors);
    let customer_location = take(customer_location, &mut errors);
    let shipping_method = take(shipping_method, &mut errors);
    let shipping_priority = take(shipping_priority, &mut errors);
    let weather = take(weather, &mut errors);
    let package_weight = take(package_weight, &mut errors);
    let package_size = take(package_size, &mut errors);
    let distance = take(distance, &mut errors);
    let warehouse_proximity = take(warehouse_proximity, &mut errors);
    let delivery_type = take(delivery_type, &mut errors);

    match (
        product_category,
        customer_location,
        shipping_method,
        shipping_priority,
        weather,
        package_weight,
        package_size,
        distance,
        warehouse_proximity,
        delivery_type,
    ) {
        (
            Some(product_category),
            Some(customer_location),
            Some(shipping_method),
            Some(shipping_priority),
            Some(weather),
            Some(package_weight),
            Some(package_size),
            Some(distance),
            Some(warehouse_proximity),
            Some(delivery_type),
        ) => Ok(InputSpec {
            product_category,
            customer_location,
            shipping_method,
            shipping_priority,
            weather,
            package_weight,
            package_size,
            distance,
            warehouse_proximity,
            delivery_type,
        }),
        _ => Err(errors),
    }
}

/// Validate `raw` together with errors found while reading it.
///
/// `earlier` errors win over whatever `validate` reports for the same field
/// (a mistyped value is left unset and would otherwise read as missing).
/// Errors come back in form order.
pub fn validate_with(
    raw: &RawInput,
    earlier: Vec<FieldError>,
) -> Result<InputSpec, Vec<FieldError>> {
    match validate(raw) {
        Ok(input) if earlier.is_empty() => Ok(input),
        outcome => {
            let mut errors = earlier;
            if let Err(found) = outcome {
                for e in found {
                    if !errors.iter().any(|known| known.field == e.field) {
                        errors.push(e);
                    }
                }
            }
            errors.sort_by_key(|e| Field::ALL.iter().position(|f| *f == e.field));
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_raw() -> RawInput {
        RawInput::from(&InputSpec::default())
    }

    #[test]
    fn test_valid_input() {
        let input = validate(&complete_raw()).unwrap();
        assert_eq!(input, InputSpec::default());
    }

    #[test]
    fn test_empty_input_reports_every_field() {
        let errors = validate(&RawInput::default()).unwrap_err();
        assert_eq!(errors.len(), 10);
        assert!(errors.iter().all(|e| e.problem == Problem::Missing));
        assert_eq!(errors[0].field, Field::ProductCategory);
        assert_eq!(errors[9].field, Field::DeliveryType);
        assert_eq!(errors[0].to_string(), "productCategory: is required");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut raw = complete_raw();
        raw.shipping_method = Some("Overnight".to_string()); // Error 1
        raw.package_weight = Some(150.0); // Error 2
        raw.distance = Some(12.5); // Error 3
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, Field::ShippingMethod);
        assert_eq!(errors[1].field, Field::PackageWeight);
        assert_eq!(errors[2].field, Field::Distance);
        assert_eq!(
            errors[1].to_string(),
            "packageWeight: 150 is outside 0.1..=100.0"
        );
        assert_eq!(errors[2].to_string(), "distance: 12.5 is not a whole number");
    }

    #[test]
    fn test_proximity_accepts_flag_and_label() {
        let mut raw = complete_raw();
        raw.warehouse_proximity = Some(ProximityValue::Flag(false));
        assert!(!validate(&raw).unwrap().warehouse_proximity);

        raw.warehouse_proximity = Some(ProximityValue::Label("Yes".to_string()));
        assert!(validate(&raw).unwrap().warehouse_proximity);

        raw.warehouse_proximity = Some(ProximityValue::Label("sometimes".to_string()));
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors[0].field, Field::WarehouseProximity);
    }

    #[test]
    fn test_or_fills_only_missing_fields() {
        let partial = RawInput {
            shipping_method: Some("Express".to_string()),
            distance: Some(700.0),
            ..Default::default()
        };
        let merged = partial.or(&complete_raw());
        let input = validate(&merged).unwrap();
        assert_eq!(input.shipping_method, ShippingMethod::Express);
        assert_eq!(input.distance.km(), 700);
        assert_eq!(input.weather, Weather::Sunny);
    }

    #[test]
    fn test_set_text_parses_numbers() {
        let mut raw = RawInput::default();
        raw.set_text(Field::PackageWeight, " 12.5 ").unwrap();
        assert_eq!(raw.package_weight, Some(12.5));

        let err = raw.set_text(Field::Distance, "far").unwrap_err();
        assert_eq!(err.to_string(), "distance: 'far' is not a number");
        assert_eq!(raw.distance, None);
    }

    #[test]
    fn test_get_round_trips_set_text() {
        let mut raw = RawInput::default();
        raw.set_text(Field::WarehouseProximity, "No").unwrap();
        assert_eq!(raw.get(Field::WarehouseProximity), Some("No".to_string()));
        assert_eq!(raw.get(Field::Weather), None);
        assert_eq!(
            complete_raw().get(Field::WarehouseProximity),
            Some("Yes".to_string())
        );
    }

    #[test]
    fn test_deserialize_camel_case_json() {
        let json = r#"{
            "productCategory": "Books",
            "customerLocation": "Rural",
            "shippingMethod": "Same-Day",
            "shippingPriority": "Urgent",
            "weather": "Stormy",
            "packageWeight": 12.0,
            "packageSize": "Large",
            "distance": 1200,
            "warehouseProximity": "No",
            "deliveryType": "Residential"
        }"#;
        let raw: RawInput = serde_json::from_str(json).unwrap();
        let input = validate(&raw).unwrap();
        assert_eq!(input.product_category, ProductCategory::Books);
        assert_eq!(input.distance.km(), 1200);
        assert!(!input.warehouse_proximity);
    }

    #[test]
    fn test_from_json_reports_wrong_types_per_field() {
        let body = serde_json::json!({
            "productCategory": "Books",
            "weather": 5,
            "packageWeight": "heavy",
            "distance": "250",
            "warehouseProximity": true
        });
        let (raw, errors) = RawInput::from_json(body.as_object().unwrap()).unwrap();
        assert_eq!(raw.product_category.as_deref(), Some("Books"));
        assert_eq!(raw.distance, Some(250.0));
        assert_eq!(raw.warehouse_proximity, Some(ProximityValue::Flag(true)));
        assert_eq!(raw.weather, None);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "weather: expected a string, got a number");
        assert_eq!(errors[1].to_string(), "packageWeight: 'heavy' is not a number");
    }

    #[test]
    fn test_from_json_rejects_unknown_key() {
        let body = serde_json::json!({"shippingSpeed": "fast"});
        let err = RawInput::from_json(body.as_object().unwrap()).unwrap_err();
        assert_eq!(err, "unknown field `shippingSpeed`");
    }

    #[test]
    fn test_validate_with_prefers_earlier_errors() {
        let mut raw = complete_raw();
        raw.weather = None;
        raw.shipping_method = Some("Teleport".to_string());
        let earlier = vec![FieldError::new(
            Field::Weather,
            Problem::WrongType {
                expected: "a string",
                found: "a number",
            },
        )];

        let errors = validate_with(&raw, earlier).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, Field::ShippingMethod);
        assert_eq!(errors[1].field, Field::Weather);
        assert!(matches!(errors[1].problem, Problem::WrongType { .. }));

        assert_eq!(
            validate_with(&complete_raw(), Vec::new()).unwrap(),
            InputSpec::default()
        );
    }

    #[test]
    fn test_deserialize_rejects_unknown_field() {
        let json = r#"{"shippingSpeed": "fast"}"#;
        assert!(serde_json::from_str::<RawInput>(json).is_err());
    }
}
