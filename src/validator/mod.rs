use std::{fmt, sync::LazyLock};

use regex::Regex;
use rust_decimal::Decimal;

use crate::{
    car::{Car, Color, RawCar},
    error::ValidationError,
};

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+( [A-Z]+)?$").expect("label pattern must compile"));

/// One rejected field of a raw car.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn is_valid(record: Option<&RawCar>) -> Result<bool, ValidationError> {
    let record = record.ok_or(ValidationError::MissingRecord)?;
    Ok(violations(record).is_empty())
}

pub fn violations(record: &RawCar) -> Vec<Violation> {
    [
        check_model(record.model.as_deref()),
        check_price(record.price),
        parse_color(record.color.as_deref()).err(),
        parse_mileage(record.mileage).err(),
        check_components(record.components.as_deref()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Turns an accepted raw record into a typed [`Car`], or lists every rule it breaks.
pub fn validate(record: RawCar) -> Result<Car, Vec<Violation>> {
    let model = parse_model(record.model.as_deref());
    let price = parse_price(record.price);
    let color = parse_color(record.color.as_deref());
    let mileage = parse_mileage(record.mileage);
    let components = parse_components(record.components.as_deref());

    match (model, price, color, mileage, components) {
        (Ok(model), Ok(price), Ok(color), Ok(mileage), Ok(())) => Ok(Car::from_checked_parts(
            model.to_string(),
            price,
            color,
            mileage,
            record.components.unwrap_or_default(),
        )),
        (model, price, color, mileage, components) => Err([
            model.err(),
            price.err(),
            color.err(),
            mileage.err(),
            components.err(),
        ]
        .into_iter()
        .flatten()
        .collect()),
    }
}

pub(crate) fn check_model(model: Option<&str>) -> Option<Violation> {
    parse_model(model).err()
}

pub(crate) fn check_price(price: Option<Decimal>) -> Option<Violation> {
    parse_price(price).err()
}

pub(crate) fn check_components(components: Option<&[String]>) -> Option<Violation> {
    parse_components(components).err()
}

fn parse_model(model: Option<&str>) -> Result<&str, Violation> {
    match model {
        None => Err(Violation::new("model", "model is missing")),
        Some(model) if !is_label(model) => Err(Violation::new(
            "model",
            format!("model '{model}' is not one or two uppercase words"),
        )),
        Some(model) => Ok(model),
    }
}

fn parse_price(price: Option<Decimal>) -> Result<Decimal, Violation> {
    match price {
        None => Err(Violation::new("price", "price is missing")),
        Some(price) if price <= Decimal::ZERO => Err(Violation::new(
            "price",
            format!("price {price} is not positive"),
        )),
        Some(price) => Ok(price),
    }
}

fn parse_color(color: Option<&str>) -> Result<Color, Violation> {
    let color = color.ok_or_else(|| Violation::new("color", "color is missing"))?;
    color
        .parse()
        .map_err(|error: String| Violation::new("color", error))
}

fn parse_mileage(mileage: Option<i64>) -> Result<u64, Violation> {
    let mileage = mileage.ok_or_else(|| Violation::new("mileage", "mileage is missing"))?;
    u64::try_from(mileage)
        .map_err(|_| Violation::new("mileage", format!("mileage {mileage} is negative")))
}

fn parse_components(components: Option<&[String]>) -> Result<(), Violation> {
    let components =
        components.ok_or_else(|| Violation::new("components", "components are missing"))?;
    if components.is_empty() {
        return Err(Violation::new("components", "components are empty"));
    }

    let invalid: Vec<&str> = components
        .iter()
        .map(String::as_str)
        .filter(|component| !is_label(component))
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(Violation::new(
            "components",
            format!("components {invalid:?} are not one or two uppercase words"),
        ))
    }
}

fn is_label(value: &str) -> bool {
    LABEL_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::{car::RawCar, error::ValidationError};

    use super::{is_valid, validate, violations};

    fn raw() -> RawCar {
        RawCar {
            model: Some("MAZDA".to_string()),
            price: Some(Decimal::TEN),
            color: Some("BLACK".to_string()),
            mileage: Some(5),
            components: Some(vec!["ABS".to_string()]),
        }
    }

    #[test]
    fn accepts_well_formed_record() {
        assert_eq!(is_valid(Some(&raw())), Ok(true));
    }

    #[test]
    fn missing_record_is_an_error_not_false() {
        assert_eq!(is_valid(None), Err(ValidationError::MissingRecord));
    }

    #[test]
    fn zero_mileage_is_valid_negative_is_not() {
        let new_car = RawCar {
            mileage: Some(0),
            ..raw()
        };
        assert_eq!(is_valid(Some(&new_car)), Ok(true));

        let rolled_back = RawCar {
            mileage: Some(-1),
            ..raw()
        };
        assert_eq!(is_valid(Some(&rolled_back)), Ok(false));
    }

    #[test]
    fn rejects_non_positive_price() {
        for price in [Decimal::ZERO, Decimal::NEGATIVE_ONE] {
            let record = RawCar {
                price: Some(price),
                ..raw()
            };
            assert_eq!(is_valid(Some(&record)), Ok(false));
        }
    }

    #[test]
    fn model_pattern_allows_at_most_two_words() {
        let cases = [
            ("ALFA ROMEO", true),
            ("BMW", true),
            ("Bmw", false),
            ("LAND ROVER SPORT", false),
            ("ALFA  ROMEO", false),
            ("BMW ", false),
            ("", false),
            ("X5", false),
        ];

        for (model, expected) in cases {
            let record = RawCar {
                model: Some(model.to_string()),
                ..raw()
            };
            assert_eq!(is_valid(Some(&record)), Ok(expected), "model {model:?}");
        }
    }

    #[test]
    fn rejects_unknown_color() {
        let record = RawCar {
            color: Some("PURPLE".to_string()),
            ..raw()
        };
        let found = violations(&record);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, "color");
    }

    #[test]
    fn rejects_empty_or_malformed_components() {
        let empty = RawCar {
            components: Some(Vec::new()),
            ..raw()
        };
        assert_eq!(is_valid(Some(&empty)), Ok(false));

        let malformed = RawCar {
            components: Some(vec!["ABS".to_string(), "air bags".to_string()]),
            ..raw()
        };
        let found = violations(&malformed);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("air bags"));
    }

    #[test]
    fn reports_every_broken_field() {
        let found = violations(&RawCar::default());
        let fields: Vec<_> = found.iter().map(|violation| violation.field).collect();
        assert_eq!(
            fields,
            vec!["model", "price", "color", "mileage", "components"]
        );
    }

    #[test]
    fn validate_builds_typed_car() {
        let car = validate(raw()).expect("record must be accepted");
        assert_eq!(car.model(), "MAZDA");
        assert_eq!(car.mileage(), 5);
        assert_eq!(car.components(), ["ABS"]);
    }

    #[test]
    fn validate_returns_violations_for_rejected_record() {
        let record = RawCar {
            price: None,
            mileage: Some(-3),
            ..raw()
        };
        let found = validate(record).expect_err("record must be rejected");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].to_string(), "price: price is missing");
        assert_eq!(found[1].to_string(), "mileage: mileage -3 is negative");
    }
}
