//! Stateful orchestration of pantry saving, nutrition targets and diet
//! generation.
//!
//! A [`PlanningWorkflow`] is an explicit state object. Every operation takes
//! `&self` so one workflow can be shared between tasks; state lives behind a
//! mutex that is never held across a network call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::client::PlannerClient;
use crate::error::{PlannerError, Precondition, Result};
use crate::models::{
    CompatibleRecipes, DietRequest, DietResult, DurationTier, NutritionRange, PantryRecord,
};
use crate::pantry::PantrySelection;
use crate::validation::{validate_duration, Deficiency};

/// Where the workflow stands, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Empty,
    PantrySaved,
    NutritionSet,
    Ready,
    Generating,
    Generated,
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    pub selection: PantrySelection,
    pub pantry: Option<PantryRecord>,
    /// Set once the compatible-recipes pre-warm for `pantry` succeeded
    pub compatible_ready: bool,
    pub compatible: Option<CompatibleRecipes>,
    pub nutrition: Option<NutritionRange>,
    pub diet: Option<DietResult>,
    pub generated_at: Option<DateTime<Utc>>,
    /// Ticket of the generate request currently awaiting a response
    pub in_flight: Option<u64>,
}

impl WorkflowState {
    pub fn phase(&self) -> WorkflowPhase {
        if self.in_flight.is_some() {
            return WorkflowPhase::Generating;
        }
        if self.diet.is_some() {
            return WorkflowPhase::Generated;
        }
        // A committed pantry record is always pre-warmed; see `save_pantry`.
        match (self.pantry.is_some(), self.nutrition.is_some()) {
            (true, true) => WorkflowPhase::Ready,
            (true, false) => WorkflowPhase::PantrySaved,
            (false, true) => WorkflowPhase::NutritionSet,
            (false, false) => WorkflowPhase::Empty,
        }
    }
}

pub struct PlanningWorkflow {
    client: PlannerClient,
    state: Mutex<WorkflowState>,
    tickets: AtomicU64,
    pantry_tickets: AtomicU64,
}

impl PlanningWorkflow {
    pub fn new(client: PlannerClient) -> Self {
        Self {
            client,
            state: Mutex::new(WorkflowState::default()),
            tickets: AtomicU64::new(0),
            pantry_tickets: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, WorkflowState> {
        // State is only ever replaced field by field, so a poisoned guard is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> WorkflowState {
        self.state().clone()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.state().phase()
    }

    pub fn pantry_id(&self) -> Option<String> {
        self.state().pantry.as_ref().map(|p| p.pantry_id.clone())
    }

    pub fn compatible_ready(&self) -> bool {
        self.state().compatible_ready
    }

    pub fn nutrition_range(&self) -> Option<NutritionRange> {
        self.state().nutrition
    }

    pub fn diet(&self) -> Option<DietResult> {
        self.state().diet.clone()
    }

    pub fn is_generating(&self) -> bool {
        self.state().in_flight.is_some()
    }

    /// Check the current selection against a tier's pantry rules.
    pub fn deficiencies(&self, catalog: &Catalog, tier: DurationTier) -> Vec<Deficiency> {
        validate_duration(&self.state().selection, catalog, tier)
    }

    /// Persist `selection` remotely, then pre-warm compatible recipes for it.
    ///
    /// The selection is kept even if a call fails. The new pantry record and
    /// the ready flag are committed together, after both calls succeed; until
    /// then the previous record stays usable. When a newer save starts before
    /// this one finishes, this one returns [`PlannerError::Superseded`] and
    /// commits nothing.
    pub async fn save_pantry(&self, selection: PantrySelection) -> Result<PantryRecord> {
        let ids = selection.ids();
        let ticket = {
            let mut state = self.state();
            state.selection = selection;
            self.pantry_tickets.fetch_add(1, Ordering::SeqCst) + 1
        };
        info!("Saving pantry {} with {} ingredients", ticket, ids.len());

        let record = self.client.create_pantry(&ids).await?;
        info!("Pantry created: {}", record.pantry_id);

        let compatible = self.client.compatible_recipes(&record.pantry_id).await?;
        info!(
            "Compatible recipes pre-warmed for {}: {} recipes",
            record.pantry_id, compatible.total_compatible_recipes
        );

        let mut state = self.state();
        let latest = self.pantry_tickets.load(Ordering::SeqCst);
        if ticket != latest {
            warn!(
                "Discarding pantry {} from save {} superseded by {}",
                record.pantry_id, ticket, latest
            );
            return Err(PlannerError::Superseded { ticket, latest });
        }
        state.pantry = Some(record.clone());
        state.compatible = Some(compatible);
        state.compatible_ready = true;
        Ok(record)
    }

    /// Store a nutrition range, replacing any earlier one.
    pub fn calculate_nutrition(&self, range: NutritionRange) {
        info!("Nutrition range set: {:?}", range);
        self.state().nutrition = Some(range);
    }

    /// Request a diet for `duration`.
    ///
    /// `nutrition_override` wins over the stored range. The range is sent as
    /// given; callers relax it first. When a newer call starts before this
    /// one's response arrives, this one returns [`PlannerError::Superseded`]
    /// and its result is discarded.
    pub async fn generate(
        &self,
        duration: DurationTier,
        nutrition_override: Option<NutritionRange>,
    ) -> Result<DietResult> {
        let (ticket, request) = {
            let mut state = self.state();
            info!(
                "Generate called: duration={}, pantry={:?}",
                duration,
                state.pantry.as_ref().map(|p| p.pantry_id.as_str())
            );

            let range = nutrition_override.or(state.nutrition);
            let mut missing = Vec::new();
            if state.pantry.is_none() {
                missing.push(Precondition::PantryRecord);
            }
            if range.is_none() {
                missing.push(Precondition::NutritionRange);
            }

            let (Some(pantry), Some(range)) = (state.pantry.as_ref(), range) else {
                warn!("Cannot generate diet: missing {:?}", missing);
                return Err(PlannerError::PreconditionMissing(missing));
            };

            let request = DietRequest::new(pantry.pantry_id.clone(), duration, range);
            let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
            state.in_flight = Some(ticket);
            (ticket, request)
        };

        debug!(
            "Diet request {}: {}",
            ticket,
            serde_json::to_string(&request).unwrap_or_default()
        );

        let response = self.client.generate_diet(&request).await;

        let mut state = self.state();
        let latest = self.tickets.load(Ordering::SeqCst);
        if ticket != latest {
            warn!("Discarding diet response {} superseded by {}", ticket, latest);
            return Err(PlannerError::Superseded { ticket, latest });
        }
        state.in_flight = None;

        let diet = response?;
        if diet.is_empty() {
            warn!("Diet service returned no days for pantry {}", request.pantry_id);
        } else {
            info!("Diet generated: {} days", diet.day_count());
        }
        state.diet = Some(diet.clone());
        state.generated_at = Some(Utc::now());
        Ok(diet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MacroRange;

    fn range() -> NutritionRange {
        let r = MacroRange::new(10.0, 20.0);
        NutritionRange {
            calories: r,
            proteins: r,
            carbs: r,
            fats: r,
            fibres: r,
        }
    }

    #[test]
    fn phase_follows_state() {
        let mut state = WorkflowState::default();
        assert_eq!(state.phase(), WorkflowPhase::Empty);

        state.pantry = Some(PantryRecord {
            pantry_id: "p-1".to_string(),
            ingredient_count: None,
        });
        assert_eq!(state.phase(), WorkflowPhase::PantrySaved);

        state.nutrition = Some(range());
        assert_eq!(state.phase(), WorkflowPhase::Ready);

        state.in_flight = Some(1);
        assert_eq!(state.phase(), WorkflowPhase::Generating);

        state.in_flight = None;
        state.diet = Some(DietResult::default());
        assert_eq!(state.phase(), WorkflowPhase::Generated);
    }

    #[test]
    fn calculate_nutrition_overwrites() {
        let workflow = PlanningWorkflow::new(PlannerClient::new("http://127.0.0.1:9"));
        workflow.calculate_nutrition(range());

        let mut second = range();
        second.fats = MacroRange::new(1.0, 2.0);
        workflow.calculate_nutrition(second);

        assert_eq!(workflow.nutrition_range(), Some(second));
        assert_eq!(workflow.phase(), WorkflowPhase::NutritionSet);
    }

    #[tokio::test]
    async fn deficiencies_follow_stored_selection() {
        let catalog = Catalog::embedded().unwrap();
        let workflow = PlanningWorkflow::new(PlannerClient::new("http://127.0.0.1:9"));
        assert_eq!(workflow.deficiencies(&catalog, DurationTier::Day).len(), 5);

        let selection: PantrySelection = ["eggs", "rice", "butter", "apple"].into_iter().collect();
        // Nothing listens on port 9, but the selection is kept when the save fails.
        assert!(workflow.save_pantry(selection).await.is_err());

        assert!(workflow.deficiencies(&catalog, DurationTier::Day).is_empty());
        let week = workflow.deficiencies(&catalog, DurationTier::Week);
        assert_eq!(week[0], Deficiency::Total { missing: 6 });
        assert_eq!(week.len(), 5);
    }
}
