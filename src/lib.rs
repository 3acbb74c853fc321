//! Client-side core of a pantry-based meal planner.
//!
//! Turns body measurements into nutrition targets, checks that a pantry is
//! large enough for the requested plan length, and drives the diet service
//! through [`workflow::PlanningWorkflow`].

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod nutrition;
pub mod pantry;
pub mod relax;
pub mod validation;
pub mod workflow;

pub use catalog::Catalog;
pub use client::PlannerClient;
pub use error::{PlannerError, Precondition};
pub use models::{DietResult, DurationTier, NutritionRange};
pub use nutrition::{calculate_nutrition_range, ActivityLevel, Biometrics, Sex};
pub use pantry::PantrySelection;
pub use relax::{relax, RelaxationPolicy};
pub use validation::{validate_duration, Deficiency, TierRules};
pub use workflow::{PlanningWorkflow, WorkflowPhase};
