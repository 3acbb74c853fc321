//! Daily nutrition targets from body measurements.
//!
//! Energy follows Mifflin-St Jeor scaled by an activity multiplier. Macros
//! are split from that energy figure and each is widened to a ±20% range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{MacroRange, NutritionRange};

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

const PROTEIN_G_PER_KG: f64 = 1.8;
const FAT_SHARE_OF_ENERGY: f64 = 0.25;
const FIBRE_G_PER_1000_KCAL: f64 = 14.0;

const RANGE_LOWER: f64 = 0.8;
const RANGE_UPPER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Mifflin-St Jeor constant term.
    fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

impl FromStr for Sex {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(PlannerError::InvalidInput(format!(
                "unknown sex '{other}', expected male or female"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            other => Err(PlannerError::InvalidInput(format!(
                "unknown activity level '{other}'"
            ))),
        }
    }
}

/// Inputs to the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    /// Age in years
    pub age: u32,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
}

impl Biometrics {
    pub fn validate(&self) -> Result<()> {
        if self.age == 0 {
            return Err(PlannerError::InvalidInput("age must be positive".into()));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(PlannerError::InvalidInput("height must be positive".into()));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(PlannerError::InvalidInput("weight must be positive".into()));
        }
        Ok(())
    }
}

/// Unranged daily targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTargets {
    /// Basal metabolic rate (kcal)
    pub bmr: f64,
    /// Total daily energy expenditure (kcal), also the calorie target
    pub tdee: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
    pub fibres: f64,
}

impl DailyTargets {
    pub fn calculate(input: &Biometrics) -> Result<Self> {
        input.validate()?;

        let bmr = 10.0 * input.weight_kg + 6.25 * input.height_cm - 5.0 * f64::from(input.age)
            + input.sex.bmr_offset();
        if bmr <= 0.0 {
            return Err(PlannerError::InvalidInput(format!(
                "measurements give a non-positive metabolic rate ({bmr:.1} kcal)"
            )));
        }
        let tdee = bmr * input.activity_level.multiplier();

        let proteins = PROTEIN_G_PER_KG * input.weight_kg;
        let fats = FAT_SHARE_OF_ENERGY * tdee / KCAL_PER_G_FAT;
        // Carbs fill the remaining energy; a heavy, low-energy profile can leave none.
        let carbs = ((tdee - proteins * KCAL_PER_G_PROTEIN - fats * KCAL_PER_G_FAT)
            / KCAL_PER_G_CARB)
            .max(0.0);
        let fibres = tdee / 1000.0 * FIBRE_G_PER_1000_KCAL;

        Ok(Self {
            bmr,
            tdee,
            proteins,
            carbs,
            fats,
            fibres,
        })
    }

    /// Whole-number view for display.
    pub fn rounded(&self) -> Self {
        Self {
            bmr: self.bmr.round(),
            tdee: self.tdee.round(),
            proteins: self.proteins.round(),
            carbs: self.carbs.round(),
            fats: self.fats.round(),
            fibres: self.fibres.round(),
        }
    }

    /// Widen every target to `[round(v * 0.8), round(v * 1.2)]`.
    pub fn to_range(&self) -> NutritionRange {
        NutritionRange {
            calories: widen(self.tdee),
            proteins: widen(self.proteins),
            carbs: widen(self.carbs),
            fats: widen(self.fats),
            fibres: widen(self.fibres),
        }
    }
}

fn widen(value: f64) -> MacroRange {
    MacroRange::new((value * RANGE_LOWER).round(), (value * RANGE_UPPER).round())
}

/// Biometric inputs to a target range.
pub fn calculate_nutrition_range(input: &Biometrics) -> Result<NutritionRange> {
    DailyTargets::calculate(input).map(|t| t.to_range())
}
