use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlannerError;

/// Ingredient category used for pantry composition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Proteins,
    Carbohydrates,
    Fats,
    Fibres,
}

impl Category {
    /// Fixed order in which category rules are checked and reported.
    pub const ALL: [Category; 4] = [
        Category::Proteins,
        Category::Carbohydrates,
        Category::Fats,
        Category::Fibres,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Proteins => "proteins",
            Category::Carbohydrates => "carbohydrates",
            Category::Fats => "fats",
            Category::Fibres => "fibres",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: Category,
}

/// Planning horizon requested from the diet generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationTier {
    Day,
    Week,
    Month,
}

impl DurationTier {
    pub const ALL: [DurationTier; 3] = [DurationTier::Day, DurationTier::Week, DurationTier::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationTier::Day => "day",
            DurationTier::Week => "week",
            DurationTier::Month => "month",
        }
    }

    /// Number of day-plans the generator aims for.
    pub fn days(&self) -> u32 {
        match self {
            DurationTier::Day => 1,
            DurationTier::Week => 7,
            DurationTier::Month => 30,
        }
    }
}

impl fmt::Display for DurationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationTier {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(DurationTier::Day),
            "week" => Ok(DurationTier::Week),
            "month" => Ok(DurationTier::Month),
            other => Err(PlannerError::InvalidInput(format!(
                "unknown duration '{other}', expected day, week or month"
            ))),
        }
    }
}

/// Closed interval `[min, max]` for one nutrient axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroRange {
    pub min: f64,
    pub max: f64,
}

impl MacroRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_well_formed(&self) -> bool {
        self.min >= 0.0 && self.min <= self.max
    }
}

/// Target range per nutrient. Calories in kcal, everything else in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionRange {
    pub calories: MacroRange,
    pub proteins: MacroRange,
    pub carbs: MacroRange,
    pub fats: MacroRange,
    pub fibres: MacroRange,
}

impl NutritionRange {
    /// Every axis has `0 <= min <= max`.
    pub fn is_well_formed(&self) -> bool {
        [
            self.calories,
            self.proteins,
            self.carbs,
            self.fats,
            self.fibres,
        ]
        .iter()
        .all(MacroRange::is_well_formed)
    }

    /// Whether a day's totals fall inside every axis.
    pub fn admits(&self, totals: &NutrientTotals) -> bool {
        self.calories.contains(totals.calories)
            && self.proteins.contains(totals.proteins)
            && self.carbs.contains(totals.carbs)
            && self.fats.contains(totals.fats)
            && self.fibres.contains(totals.fibres)
    }
}

/// Server-assigned pantry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryRecord {
    pub pantry_id: String,
    /// Number of ingredients the server stored, when reported
    #[serde(default)]
    pub ingredient_count: Option<usize>,
}

/// Recipe counts per meal slot, as reported by the compatible-recipes call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTypeCounts {
    #[serde(default)]
    pub breakfast: u32,
    #[serde(default)]
    pub lunch: u32,
    #[serde(default)]
    pub dinner: u32,
}

/// A recipe the server found cookable from the pantry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibleRecipe {
    pub recipe_id: String,
    pub recipe_name: String,
    pub meal_type: String,
}

/// Result of the compatible-recipes pre-warm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibleRecipes {
    #[serde(default)]
    pub total_compatible_recipes: u32,
    #[serde(default)]
    pub by_meal_type: MealTypeCounts,
    #[serde(default)]
    pub recipes: Vec<CompatibleRecipe>,
}

/// Body of `POST /diet/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietRequest {
    pub pantry_id: String,
    pub duration: DurationTier,
    pub meals_per_day: u32,
    pub nutrition_range: NutritionRange,
}

impl DietRequest {
    pub const MEALS_PER_DAY: u32 = 3;

    pub fn new(pantry_id: impl Into<String>, duration: DurationTier, range: NutritionRange) -> Self {
        Self {
            pantry_id: pantry_id.into(),
            duration,
            meals_per_day: Self::MEALS_PER_DAY,
            nutrition_range: range,
        }
    }
}

/// Summed nutrients, either for one meal or one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub proteins: f64,
    /// Carbs (g)
    pub carbs: f64,
    /// Fat (g)
    pub fats: f64,
    /// Fibre (g)
    pub fibres: f64,
}

impl std::ops::AddAssign<&Meal> for NutrientTotals {
    fn add_assign(&mut self, meal: &Meal) {
        self.calories += meal.calories;
        self.proteins += meal.proteins;
        self.carbs += meal.carbs;
        self.fats += meal.fats;
        self.fibres += meal.fibres;
    }
}

/// One meal in a generated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// "breakfast", "lunch" or "dinner"
    pub meal_type: String,
    #[serde(default)]
    pub recipe_id: Option<String>,
    pub recipe_name: String,
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub proteins: f64,
    /// Carbs (g)
    pub carbs: f64,
    /// Fat (g)
    pub fats: f64,
    /// Fibre (g)
    pub fibres: f64,
    /// Ingredient id to quantity, shape decided by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_quantities: Option<HashMap<String, Value>>,
    /// Cooking instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Value>,
}

/// A generated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub meals: Vec<Meal>,
    /// Totals as computed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<NutrientTotals>,
}

impl DayPlan {
    /// Sum of this day's meals.
    pub fn totals(&self) -> NutrientTotals {
        let mut totals = NutrientTotals::default();
        for meal in &self.meals {
            totals += meal;
        }
        totals
    }
}

/// Response of `POST /diet/generate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietResult {
    #[serde(default)]
    pub days: Option<usize>,
    pub diet: Vec<DayPlan>,
}

impl DietResult {
    /// The generator returns an empty diet when the pantry cannot cover
    /// every meal slot.
    pub fn is_empty(&self) -> bool {
        self.diet.is_empty()
    }

    pub fn day_count(&self) -> usize {
        self.days.unwrap_or(self.diet.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duration_parses_case_insensitively() {
        assert_eq!("Week".parse::<DurationTier>().unwrap(), DurationTier::Week);
        assert_eq!(" month ".parse::<DurationTier>().unwrap(), DurationTier::Month);
        assert!("fortnight".parse::<DurationTier>().is_err());
    }

    #[test]
    fn diet_request_serializes_to_wire_shape() {
        let range = MacroRange::new(1.0, 2.0);
        let request = DietRequest::new(
            "p-1",
            DurationTier::Week,
            NutritionRange {
                calories: range,
                proteins: range,
                carbs: range,
                fats: range,
                fibres: range,
            },
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["pantry_id"], "p-1");
        assert_eq!(value["duration"], "week");
        assert_eq!(value["meals_per_day"], 3);
        assert_eq!(value["nutrition_range"]["fibres"]["max"], 2.0);
    }

    #[test]
    fn diet_result_decodes_server_response() {
        let body = json!({
            "days": 1,
            "diet": [{
                "day": 1,
                "meals": [
                    {
                        "meal_type": "breakfast",
                        "recipe_id": "r1",
                        "recipe_name": "Oat Bowl",
                        "calories": 400, "proteins": 20, "carbs": 60, "fats": 10, "fibres": 8,
                        "ingredient_quantities": { "oats": "80g" },
                        "method": ["Boil", "Serve"]
                    },
                    {
                        "meal_type": "lunch",
                        "recipe_name": "Rice Plate",
                        "calories": 600.5, "proteins": 30, "carbs": 80, "fats": 15, "fibres": 6
                    }
                ],
                "totals": { "calories": 1000.5, "proteins": 50, "carbs": 140, "fats": 25, "fibres": 14 }
            }]
        });

        let result: DietResult = serde_json::from_value(body).unwrap();
        assert_eq!(result.day_count(), 1);
        let day = &result.diet[0];
        assert_eq!(day.meals[1].recipe_id, None);
        assert_eq!(day.totals(), day.totals.unwrap());
    }

    #[test]
    fn empty_generator_response_is_empty() {
        let result: DietResult = serde_json::from_value(json!({ "days": 0, "diet": [] })).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.day_count(), 0);
    }

    #[test]
    fn compatible_summary_tolerates_missing_fields() {
        let summary: CompatibleRecipes = serde_json::from_value(json!({})).unwrap();
        assert_eq!(summary, CompatibleRecipes::default());
    }
}
