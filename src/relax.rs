use crate::models::{MacroRange, NutritionRange};

/// How a computed range is widened before it is sent to the generator.
///
/// Calories, carbs and fibres lose their lower bound; proteins and fibres
/// lose their upper bound, replaced by `ceiling`. Fats pass through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationPolicy {
    pub floor: f64,
    pub ceiling: f64,
}

impl RelaxationPolicy {
    pub const DEFAULT: RelaxationPolicy = RelaxationPolicy {
        floor: 0.0,
        ceiling: 1000.0,
    };

    pub fn apply(&self, range: &NutritionRange) -> NutritionRange {
        NutritionRange {
            calories: MacroRange::new(self.floor, range.calories.max.max(self.floor)),
            // A minimum above the ceiling would invert the interval.
            proteins: MacroRange::new(range.proteins.min.min(self.ceiling), self.ceiling),
            carbs: MacroRange::new(self.floor, range.carbs.max.max(self.floor)),
            fats: range.fats,
            fibres: MacroRange::new(self.floor, self.ceiling),
        }
    }
}

impl Default for RelaxationPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Relax with the default floor and ceiling.
pub fn relax(range: &NutritionRange) -> NutritionRange {
    RelaxationPolicy::DEFAULT.apply(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{calculate_nutrition_range, ActivityLevel, Biometrics, Sex};

    fn computed() -> NutritionRange {
        calculate_nutrition_range(&Biometrics {
            age: 30,
            sex: Sex::Male,
            height_cm: 180.0,
            weight_kg: 75.0,
            activity_level: ActivityLevel::Moderate,
        })
        .unwrap()
    }

    #[test]
    fn widens_reference_range() {
        let relaxed = relax(&computed());
        assert_eq!(relaxed.calories, MacroRange::new(0.0, 3218.0));
        assert_eq!(relaxed.proteins, MacroRange::new(108.0, 1000.0));
        assert_eq!(relaxed.carbs, MacroRange::new(0.0, 441.0));
        assert_eq!(relaxed.fats, MacroRange::new(60.0, 89.0));
        assert_eq!(relaxed.fibres, MacroRange::new(0.0, 1000.0));
    }

    #[test]
    fn relaxing_twice_changes_nothing() {
        let once = relax(&computed());
        assert_eq!(relax(&once), once);
    }

    #[test]
    fn stays_well_formed_for_extreme_protein() {
        let mut range = computed();
        range.proteins = MacroRange::new(1200.0, 1800.0);
        let relaxed = relax(&range);
        assert_eq!(relaxed.proteins.max, 1000.0);
        assert!(relaxed.is_well_formed());
    }

    #[test]
    fn negative_maxima_are_lifted_to_floor() {
        let mut range = computed();
        range.calories = MacroRange::new(-50.0, -10.0);
        range.carbs = MacroRange::new(-20.0, -5.0);
        let relaxed = relax(&range);
        assert_eq!(relaxed.calories, MacroRange::new(0.0, 0.0));
        assert_eq!(relaxed.carbs, MacroRange::new(0.0, 0.0));
        assert!(relaxed.is_well_formed());
    }

    #[test]
    fn custom_ceiling() {
        let policy = RelaxationPolicy {
            floor: 0.0,
            ceiling: 500.0,
        };
        let relaxed = policy.apply(&computed());
        assert_eq!(relaxed.fibres, MacroRange::new(0.0, 500.0));
        assert_eq!(relaxed.proteins.max, 500.0);
    }
}
