use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Portion size offered for every dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodSize {
    Medium,
    Large,
}

impl FoodSize {
    pub const ALL: [FoodSize; 2] = [FoodSize::Medium, FoodSize::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            FoodSize::Medium => "medium",
            FoodSize::Large => "large",
        }
    }
}

impl fmt::Display for FoodSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per [`FoodSize`], stored as `{ "medium": .., "large": .. }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSize<T> {
    pub medium: T,
    pub large: T,
}

impl<T> PerSize<T> {
    pub fn new(medium: T, large: T) -> Self {
        Self { medium, large }
    }
}

impl<T> Index<FoodSize> for PerSize<T> {
    type Output = T;

    fn index(&self, size: FoodSize) -> &T {
        match size {
            FoodSize::Medium => &self.medium,
            FoodSize::Large => &self.large,
        }
    }
}

impl<T> IndexMut<FoodSize> for PerSize<T> {
    fn index_mut(&mut self, size: FoodSize) -> &mut T {
        match size {
            FoodSize::Medium => &mut self.medium,
            FoodSize::Large => &mut self.large,
        }
    }
}

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: PerSize<f64>,   // currency units
    pub weight: PerSize<String>, // display text, e.g. "200g"
    pub image: String,         // http(s) URL or data URL
    pub available: PerSize<u32>,
}

impl FoodItem {
    pub fn unit_price(&self, size: FoodSize) -> f64 {
        self.price[size]
    }
}
