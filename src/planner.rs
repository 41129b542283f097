//! Meal planning and shopping-list derivation
//!
//! Pure domain logic behind the client's meal planner: the weekly plan
//! model, shopping-list aggregation over planned recipes, display-time unit
//! conversion, and the small helpers the cooking view needs (servings
//! scaling, step timers). Nothing here talks to storage or the network.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::store::Ingredient;

/// Days of the week a meal can be planned for, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Returns a slice containing all days in week order.
    pub fn all() -> &'static [Day] {
        &[
            Day::Monday,
            Day::Tuesday,
            Day::Wednesday,
            Day::Thursday,
            Day::Friday,
            Day::Saturday,
            Day::Sunday,
        ]
    }
}

/// Meal slots within a day, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// Returns a slice containing all meal slots in display order.
    pub fn all() -> &'static [MealSlot] {
        &[
            MealSlot::Breakfast,
            MealSlot::Lunch,
            MealSlot::Dinner,
            MealSlot::Snack,
        ]
    }
}

/// Where a planned recipe comes from.
///
/// One tagged union instead of string sniffing: local recipes carry the
/// store id, upstream recipes the Spoonacular id, and the bundled localized
/// recipe set its own string key. Everything that needs to resolve a planned
/// meal dispatches on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "id", rename_all = "lowercase")]
pub enum RecipeSource {
    /// A recipe from the local store
    Local(u64),
    /// A recipe from the upstream API
    Upstream(u64),
    /// A recipe from the bundled localized recipe set
    Secondary(String),
}

/// A recipe slotted into the weekly plan.
///
/// Carries a snapshot of the ingredient list so shopping-list aggregation
/// works offline, without re-resolving every source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    pub source: RecipeSource,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// The weekly plan: day × meal slot → planned recipe.
pub type MealPlan = BTreeMap<Day, BTreeMap<MealSlot, PlannedMeal>>;

/// One line of the derived shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    #[serde(default)]
    pub checked: bool,
}

/// Derives a shopping list from a meal plan.
///
/// Walks every planned recipe's ingredients and merges entries whose
/// (case-insensitively normalized name, unit) pair match by summing amounts.
/// Entries with distinct units for the same ingredient stay separate lines;
/// no unit conversion happens here. Items keep first-seen order and start
/// unchecked.
pub fn build_shopping_list(plan: &MealPlan) -> Vec<ShoppingItem> {
    let mut items: Vec<ShoppingItem> = Vec::new();
    let mut positions: HashMap<(String, String), usize> = HashMap::new();

    for meals in plan.values() {
        for meal in meals.values() {
            for ingredient in &meal.ingredients {
                let key = (
                    normalize_name(&ingredient.name),
                    ingredient.unit.trim().to_string(),
                );

                match positions.get(&key) {
                    Some(&index) => items[index].amount += ingredient.amount,
                    None => {
                        positions.insert(key, items.len());
                        items.push(ShoppingItem {
                            name: ingredient.name.trim().to_string(),
                            amount: ingredient.amount,
                            unit: ingredient.unit.trim().to_string(),
                            checked: false,
                        });
                    }
                }
            }
        }
    }

    items
}

/// Normalizes an ingredient name for aggregation matching.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Unit systems the detail view can display quantities in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

/// Converts a quantity for display in the target unit system.
///
/// Applies the fixed factor rules: grams to pounds (×0.00220462),
/// milliliters to cups (×0.00422675), and their inverses (×453.592, ×240).
/// Units without a rule pass through unchanged. This runs at display time
/// only; stored amounts and aggregation always keep original units.
pub fn convert_for_display(amount: f64, unit: &str, target: UnitSystem) -> (f64, String) {
    let canonical = unit.trim().to_lowercase();

    match target {
        UnitSystem::Imperial => match canonical.as_str() {
            "g" | "gram" | "grams" => (amount * 0.002_204_62, "lbs".to_string()),
            "ml" | "milliliter" | "milliliters" => (amount * 0.004_226_75, "cups".to_string()),
            _ => (amount, unit.to_string()),
        },
        UnitSystem::Metric => match canonical.as_str() {
            "lb" | "lbs" | "pound" | "pounds" => (amount * 453.592, "g".to_string()),
            "cup" | "cups" => (amount * 240.0, "ml".to_string()),
            _ => (amount, unit.to_string()),
        },
    }
}

/// Scales an ingredient amount from the recipe's serving count to the
/// requested one.
///
/// A recipe with zero or unknown servings is returned unscaled.
pub fn scale_amount(amount: f64, original_servings: u32, target_servings: u32) -> f64 {
    if original_servings == 0 {
        return amount;
    }
    amount / original_servings as f64 * target_servings as f64
}

/// Extracts a duration in minutes from an instruction step for the timer.
///
/// Looks for a number immediately preceding the word "minute"; the first
/// match wins. Returns `None` when the step carries no timing.
pub fn step_minutes(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();

    for (position, _) in lower.match_indices("minute") {
        let prefix = lower[..position].trim_end();
        let digits: Vec<char> = prefix
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            continue;
        }

        let number: String = digits.into_iter().rev().collect();
        if let Ok(minutes) = number.parse() {
            return Some(minutes);
        }
    }

    None
}
