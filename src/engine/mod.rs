use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    path::Path,
    str::FromStr,
};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    car::{Car, Color, RawCar},
    error::{EngineError, LoadError},
    loader, validator,
};

mod stats;

pub use stats::Statistics;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortAttribute {
    Model,
    Price,
    Color,
    Mileage,
}

impl FromStr for SortAttribute {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "model" => Ok(Self::Model),
            "price" => Ok(Self::Price),
            "color" => Ok(Self::Color),
            "mileage" => Ok(Self::Mileage),
            _ => Err(EngineError::InvalidArgument(format!(
                "unknown sort attribute '{value}'"
            ))),
        }
    }
}

/// Validated cars in input order, plus the queries over them.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    cars: Vec<Car>,
}

impl Engine {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let candidates = loader::load(path)?;
        Ok(Self::from_candidates(candidates))
    }

    /// Keeps the candidates that pass validation, in input order. Rejected
    /// records are logged and dropped.
    pub fn from_candidates(candidates: Vec<RawCar>) -> Self {
        let total = candidates.len();
        let mut cars = Vec::with_capacity(total);

        for (index, candidate) in candidates.into_iter().enumerate() {
            match validator::validate(candidate) {
                Ok(car) => cars.push(car),
                Err(violations) => {
                    let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
                    warn!(
                        record = index + 1,
                        violations = %reasons.join("; "),
                        "rejected car record"
                    );
                }
            }
        }

        info!(accepted = cars.len(), rejected = total - cars.len(), "cars loaded");
        Self { cars }
    }

    pub fn from_cars(cars: Vec<Car>) -> Self {
        Self { cars }
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Stable ascending sort on `attribute`. Descending reverses the whole
    /// ascending result, so equal keys come out in reverse input order.
    pub fn sort_by(
        &self,
        attribute: SortAttribute,
        descending: bool,
    ) -> Vec<&Car> {
        debug!(?attribute, descending, "sorting cars");
        let mut sorted: Vec<&Car> = self.cars.iter().collect();
        sorted.sort_by(|left, right| compare_by(left, right, attribute));

        if descending {
            sorted.reverse();
        }
        sorted
    }

    pub fn with_mileage_at_least(
        &self,
        threshold: u64,
    ) -> Vec<&Car> {
        debug!(threshold, "filtering cars by mileage");
        self.cars
            .iter()
            .filter(|car| car.mileage() >= threshold)
            .collect()
    }

    pub fn count_by_color(&self) -> BTreeMap<Color, usize> {
        let mut counts = BTreeMap::new();
        for car in &self.cars {
            *counts.entry(car.color()).or_insert(0) += 1;
        }
        counts
    }

    /// The most expensive car of every model. On a price tie the car that
    /// comes first in the collection wins.
    pub fn most_expensive_by_model(&self) -> Result<BTreeMap<String, &Car>, EngineError> {
        let models: BTreeSet<&str> = self.cars.iter().map(Car::model).collect();

        models
            .into_iter()
            .map(|model| {
                let winner = self
                    .cars
                    .iter()
                    .filter(|car| car.model() == model)
                    .reduce(|best, car| if car.price() > best.price() { car } else { best })
                    .ok_or_else(|| {
                        EngineError::Invariant(format!("model '{model}' has no cars"))
                    })?;
                Ok::<_, EngineError>((model.to_string(), winner))
            })
            .collect()
    }

    /// Every car priced at the collection maximum, in collection order.
    pub fn global_most_expensive(&self) -> Vec<&Car> {
        let Some(highest) = self.cars.iter().map(Car::price).max() else {
            return Vec::new();
        };

        self.cars
            .iter()
            .filter(|car| car.price() == highest)
            .collect()
    }

    pub fn statistics(&self) -> Result<Statistics, EngineError> {
        Statistics::from_cars(&self.cars)
    }

    /// Rewrites every car's components into ascending order, in place.
    pub fn with_sorted_components(&mut self) -> &[Car] {
        for car in &mut self.cars {
            car.sort_components();
        }
        &self.cars
    }

    pub fn by_component(&self) -> BTreeMap<String, Vec<&Car>> {
        let mut groups: BTreeMap<String, Vec<&Car>> = BTreeMap::new();
        for car in &self.cars {
            for component in car.components() {
                groups.entry(component.clone()).or_default().push(car);
            }
        }
        groups
    }

    /// Cars priced within `[min, max]`, ordered by model.
    pub fn price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<&Car>, EngineError> {
        if min >= max {
            return Err(EngineError::InvalidArgument(format!(
                "min price {min} must be lower than max price {max}"
            )));
        }

        let mut found: Vec<&Car> = self
            .cars
            .iter()
            .filter(|car| (min..=max).contains(&car.price()))
            .collect();
        found.sort_by(|left, right| left.model().cmp(right.model()));
        Ok(found)
    }
}

fn compare_by(
    left: &Car,
    right: &Car,
    attribute: SortAttribute,
) -> Ordering {
    match attribute {
        SortAttribute::Model => left.model().cmp(right.model()),
        SortAttribute::Price => left.price().cmp(&right.price()),
        SortAttribute::Color => left.color().cmp(&right.color()),
        SortAttribute::Mileage => left.mileage().cmp(&right.mileage()),
    }
}
