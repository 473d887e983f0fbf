//! Drill-Down Navigator Module
//! Owns the scene state, the back-navigation stack, and the per-level
//! aggregation queries consumed by the rendering layer.

use crate::agg::{Aggregation, Measure};
use crate::data::Record;
use crate::nav::Scene;
use thiserror::Error;
use tracing::debug;

/// Rejected drill-down transitions. State is never half-updated: an
/// invalid call leaves scene and history untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("city drill-down is only available from the overview")]
    CityDrillOutsideOverview,
    #[error("product drill-down requires the product view of `{city}` to be active")]
    ProductDrillOutsideCity { city: String },
}

/// Drives the city → product → purchase-channel exploration over an
/// immutable record sequence.
pub struct Navigator {
    records: Vec<Record>,
    scene: Scene,
    history: Vec<Scene>,
}

impl Navigator {
    /// Start at the overview with an empty history.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            scene: Scene::Overview,
            history: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Read-only snapshot of the current position.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Drill from the overview into one city's products.
    pub fn drill_to_city(&mut self, city: &str) -> Result<(), NavError> {
        if self.scene != Scene::Overview {
            return Err(NavError::CityDrillOutsideOverview);
        }
        debug!(city, "drill to city");
        self.push_scene(Scene::City {
            city: city.to_string(),
        });
        Ok(())
    }

    /// Drill from a city's product view into one product's purchase
    /// channels. The city must match the active selection.
    pub fn drill_to_product(&mut self, city: &str, product: &str) -> Result<(), NavError> {
        match &self.scene {
            Scene::City { city: current } if current == city => {
                debug!(city, product, "drill to product");
                self.push_scene(Scene::Product {
                    city: city.to_string(),
                    product: product.to_string(),
                });
                Ok(())
            }
            _ => Err(NavError::ProductDrillOutsideCity {
                city: city.to_string(),
            }),
        }
    }

    /// Pop the most recent snapshot. A strict LIFO undo with no forward
    /// stack; on an empty history this is a no-op returning `false`.
    pub fn go_back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.scene = previous;
                true
            }
            None => false,
        }
    }

    /// Return to the overview and clear the history. Used when the
    /// underlying dataset is reloaded.
    pub fn reset(&mut self) {
        self.history.clear();
        self.scene = Scene::Overview;
    }

    /// Aggregation for the active level:
    /// overview → revenue by city, city → revenue by product,
    /// product → quantity by purchase channel (uncategorized rows excluded).
    pub fn current_aggregation(&self) -> Aggregation {
        match &self.scene {
            Scene::Overview => Aggregation::group_by(
                self.records.iter(),
                |r| Some(r.city.as_str()),
                Measure::Revenue,
            ),
            Scene::City { city } => Aggregation::group_by(
                self.records.iter().filter(|r| r.city == *city),
                |r| Some(r.product.as_str()),
                Measure::Revenue,
            ),
            Scene::Product { city, product } => Aggregation::group_by(
                self.records
                    .iter()
                    .filter(|r| r.city == *city && r.product == *product),
                |r| r.purchase_type.as_deref(),
                Measure::Quantity,
            ),
        }
    }

    fn push_scene(&mut self, next: Scene) {
        let previous = std::mem::replace(&mut self.scene, next);
        self.history.push(previous);
    }
}
