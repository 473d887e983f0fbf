//! Drill-Down State Module
//! The three-level scene position, encoded so invalid selections cannot exist.

use serde::Serialize;

/// Current drill-down position. A product view always carries its city, so
/// the level/selection invariants hold by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum Scene {
    Overview,
    City { city: String },
    Product { city: String, product: String },
}

impl Scene {
    /// Selected city, if any level below the overview is active.
    pub fn city(&self) -> Option<&str> {
        match self {
            Scene::Overview => None,
            Scene::City { city } | Scene::Product { city, .. } => Some(city),
        }
    }

    /// Selected product, if the deepest level is active.
    pub fn product(&self) -> Option<&str> {
        match self {
            Scene::Product { product, .. } => Some(product),
            _ => None,
        }
    }

}
