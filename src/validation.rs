use std::collections::HashMap;
use std::fmt;

use crate::catalog::Catalog;
use crate::error::{PlannerError, Result};
use crate::models::{Category, DurationTier};
use crate::pantry::PantrySelection;

/// Minimum pantry composition for a duration tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRules {
    pub total: usize,
    pub per_category: usize,
}

impl TierRules {
    pub const DAY: TierRules = TierRules {
        total: 4,
        per_category: 1,
    };
    pub const WEEK: TierRules = TierRules {
        total: 10,
        per_category: 2,
    };
    pub const MONTH: TierRules = TierRules {
        total: 15,
        per_category: 3,
    };

    pub fn for_tier(tier: DurationTier) -> Self {
        match tier {
            DurationTier::Day => Self::DAY,
            DurationTier::Week => Self::WEEK,
            DurationTier::Month => Self::MONTH,
        }
    }
}

/// One reason a pantry is too small for a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deficiency {
    Total { missing: usize },
    Category { category: Category, missing: usize },
}

impl fmt::Display for Deficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deficiency::Total { missing } => {
                write!(f, "Add {missing} more ingredient(s) in total")
            }
            Deficiency::Category { category, missing } => {
                write!(f, "Add {missing} more {category} item(s)")
            }
        }
    }
}

/// Check a pantry against a tier's rules.
///
/// The total shortfall comes first, then category shortfalls in
/// [`Category::ALL`] order. Ids missing from the catalog count toward the
/// total but toward no category.
pub fn validate_duration(
    selection: &PantrySelection,
    catalog: &Catalog,
    tier: DurationTier,
) -> Vec<Deficiency> {
    let rules = TierRules::for_tier(tier);
    let mut deficiencies = Vec::new();

    if selection.len() < rules.total {
        deficiencies.push(Deficiency::Total {
            missing: rules.total - selection.len(),
        });
    }

    let mut counts: HashMap<Category, usize> = HashMap::new();
    for category in selection.iter().filter_map(|id| catalog.category_of(id)) {
        *counts.entry(category).or_default() += 1;
    }

    for category in Category::ALL {
        let have = counts.get(&category).copied().unwrap_or(0);
        if have < rules.per_category {
            deficiencies.push(Deficiency::Category {
                category,
                missing: rules.per_category - have,
            });
        }
    }

    deficiencies
}

/// [`validate_duration`] as a gate: any deficiency becomes `ValidationFailed`.
pub fn ensure_valid(
    selection: &PantrySelection,
    catalog: &Catalog,
    tier: DurationTier,
) -> Result<()> {
    let deficiencies = validate_duration(selection, catalog, tier);
    if deficiencies.is_empty() {
        Ok(())
    } else {
        Err(PlannerError::ValidationFailed(deficiencies))
    }
}
