//! Packaging categories and the rule table that prices them.
//!
//! The table is static: each category has a weight ceiling (0 means no limit) and
//! a fixed surcharge. It is consulted once, when a courier hands an order over,
//! and the surcharge is folded into the order price for good.

use crate::ledger::OrderError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Packaging category of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    Package,
    Carton,
    Film,
}

/// Weight ceiling and surcharge for one packaging category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackagingRule {
    /// Max weight in kg, 0 - no limit
    pub max_weight: f64,
    pub extra_cost: f64,
}

impl Packaging {
    pub const ALL: [Packaging; 3] = [Packaging::Package, Packaging::Carton, Packaging::Film];

    pub fn as_str(self) -> &'static str {
        match self {
            Packaging::Package => "package",
            Packaging::Carton => "carton",
            Packaging::Film => "film",
        }
    }

    pub fn rule(self) -> PackagingRule {
        match self {
            Packaging::Package => PackagingRule {
                max_weight: 10.0,
                extra_cost: 5.0,
            },
            Packaging::Carton => PackagingRule {
                max_weight: 30.0,
                extra_cost: 20.0,
            },
            Packaging::Film => PackagingRule {
                max_weight: 0.0,
                extra_cost: 1.0,
            },
        }
    }

    /// Checks `weight` against the ceiling and returns `price` with the surcharge added.
    ///
    /// Weight and price must be finite and non-negative.
    pub fn apply(self, weight: f64, price: f64) -> Result<f64, OrderError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(OrderError::InvalidArgument(format!(
                "weight {weight} is not a valid number of kilograms"
            )));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(OrderError::InvalidArgument(format!(
                "price {price} is not a valid amount"
            )));
        }
        let rule = self.rule();
        if rule.max_weight > 0.0 && weight > rule.max_weight {
            return Err(OrderError::WeightExceedsLimit {
                packaging: self,
                weight,
                max_weight: rule.max_weight,
            });
        }
        Ok(price + rule.extra_cost)
    }
}

impl FromStr for Packaging {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Packaging::ALL
            .into_iter()
            .find(|packaging| packaging.as_str() == s)
            .ok_or_else(|| OrderError::UnknownPackaging(s.to_string()))
    }
}

impl Display for Packaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
