use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{car::Car, error::EngineError};

const PRICE_SCALE: u32 = 2;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Statistics {
    pub avg_price: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub avg_mileage: f64,
    pub min_mileage: u64,
    pub max_mileage: u64,
}

impl Statistics {
    /// Average price is exact: decimal sum over count, rounded half-up to cents.
    pub(super) fn from_cars(cars: &[Car]) -> Result<Self, EngineError> {
        let (first, rest) = cars.split_first().ok_or(EngineError::EmptyCollection)?;

        let mut price_sum = first.price();
        let mut min_price = first.price();
        let mut max_price = first.price();
        let mut mileage_sum = u128::from(first.mileage());
        let mut min_mileage = first.mileage();
        let mut max_mileage = first.mileage();

        for car in rest {
            price_sum = price_sum.checked_add(car.price()).ok_or_else(|| {
                EngineError::Invariant("price sum exceeds decimal range".to_string())
            })?;
            min_price = min_price.min(car.price());
            max_price = max_price.max(car.price());
            mileage_sum += u128::from(car.mileage());
            min_mileage = min_mileage.min(car.mileage());
            max_mileage = max_mileage.max(car.mileage());
        }

        let count = cars.len();
        let avg_price = (price_sum / Decimal::from(count))
            .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);

        Ok(Self {
            avg_price,
            min_price,
            max_price,
            avg_mileage: mileage_sum as f64 / count as f64,
            min_mileage,
            max_mileage,
        })
    }
}
