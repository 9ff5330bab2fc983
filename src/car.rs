use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validator::{self, Violation};

/// Paint colors, ordered by declaration rather than by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Black,
    White,
    Silver,
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Black,
        Color::White,
        Color::Silver,
        Color::Red,
        Color::Green,
        Color::Blue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Black => "BLACK",
            Self::White => "WHITE",
            Self::Silver => "SILVER",
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == value)
            .ok_or_else(|| format!("unknown color '{value}'"))
    }
}

/// A car record as it comes out of the document, before validation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawCar {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub components: Option<Vec<String>>,
}

/// A validated car. Fields can only be set through [`Car::new`] or the validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Car {
    model: String,
    price: Decimal,
    color: Color,
    mileage: u64,
    components: Vec<String>,
}

impl Car {
    pub fn new<I, S>(
        model: &str,
        price: Decimal,
        color: Color,
        mileage: u64,
        components: I,
    ) -> Result<Self, Vec<Violation>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components: Vec<String> = components.into_iter().map(Into::into).collect();
        let violations: Vec<Violation> = [
            validator::check_model(Some(model)),
            validator::check_price(Some(price)),
            validator::check_components(Some(components.as_slice())),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(Self::from_checked_parts(
            model.to_string(),
            price,
            color,
            mileage,
            components,
        ))
    }

    /// Only the validator builds cars from parts; it has already checked them.
    pub(crate) fn from_checked_parts(
        model: String,
        price: Decimal,
        color: Color,
        mileage: u64,
        components: Vec<String>,
    ) -> Self {
        let mut unique = Vec::with_capacity(components.len());
        for component in components {
            if !unique.contains(&component) {
                unique.push(component);
            }
        }

        Self {
            model,
            price,
            color,
            mileage,
            components: unique,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn mileage(&self) -> u64 {
        self.mileage
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn has_component(
        &self,
        component: &str,
    ) -> bool {
        self.components.iter().any(|own| own == component)
    }

    pub(crate) fn sort_components(&mut self) {
        self.components.sort();
    }
}

impl fmt::Display for Car {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} [{}]",
            self.model,
            self.price,
            self.color,
            self.mileage,
            self.components.join(", ")
        )
    }
}
