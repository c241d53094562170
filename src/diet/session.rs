use std::fmt::Write;

use serde_json::Value;
use tracing::{debug, warn};

use super::{
    dto::{DietPlan, DietPlanRequest},
    services::{PlanError, PlanRequester},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    fn plan_ready() -> Self {
        Self {
            title: "Plan Generated".into(),
            description: "Your personalized diet plan is ready!".into(),
            variant: NotificationVariant::Default,
        }
    }

    fn generation_failed() -> Self {
        Self {
            title: "Generation Failed".into(),
            description: "Could not generate diet plan. Please try again.".into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("diet plan has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("formatting diet plan: {0}")]
    Format(#[from] std::fmt::Error),
}

/// State behind the planner form: field values, the loading flag, the last
/// plan, and the notifications raised along the way.
///
/// A submission is `begin_submit` followed by `finish_submit`; when two
/// overlap, whichever finishes last owns the plan.
#[derive(Debug, Default)]
pub struct PlannerSession {
    form: DietPlanRequest,
    loading: bool,
    plan: Option<Value>,
    notifications: Vec<Notification>,
}

impl PlannerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &DietPlanRequest {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut DietPlanRequest {
        &mut self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn plan(&self) -> Option<&Value> {
        self.plan.as_ref()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Marks the session busy, drops the previous plan and returns the
    /// request to send.
    pub fn begin_submit(&mut self) -> DietPlanRequest {
        self.loading = true;
        self.plan = None;
        self.form.clone()
    }

    pub fn finish_submit(&mut self, result: Result<Value, PlanError>) {
        match result {
            Ok(plan) if is_empty_result(&plan) => debug!("flow returned no plan"),
            Ok(plan) => {
                self.plan = Some(plan);
                self.notifications.push(Notification::plan_ready());
            }
            Err(e) => {
                warn!(error = %e, "diet plan submission failed");
                self.notifications.push(Notification::generation_failed());
            }
        }
        self.loading = false;
    }

    pub async fn submit<R>(&mut self, requester: &R)
    where
        R: PlanRequester + ?Sized,
    {
        let request = self.begin_submit();
        let result = match serde_json::to_value(&request) {
            Ok(body) => requester.request_plan(&body).await,
            Err(e) => {
                warn!(error = %e, "diet plan form not serializable");
                Err(PlanError::GenerationFailed)
            }
        };
        self.finish_submit(result);
    }

    pub fn rendered_plan(&self) -> Option<Result<String, RenderError>> {
        self.plan.as_ref().map(render_plan)
    }
}

/// Results the form treats as "nothing came back": null, false, zero and the
/// empty string.
fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Plain-text view of a generated plan.
pub fn render_plan(plan: &Value) -> Result<String, RenderError> {
    let plan = DietPlan::from_value(plan)?;
    let mut out = String::new();

    writeln!(out, "Daily calories: {} kcal", plan.daily_calories)?;
    writeln!(
        out,
        "Protein: {} | Carbs: {} | Fats: {}",
        plan.macros.protein, plan.macros.carbs, plan.macros.fats
    )?;

    for meal in &plan.meals {
        writeln!(out)?;
        writeln!(out, "{}: {} ({} kcal)", meal.meal_type, meal.name, meal.calories)?;
        writeln!(out, "  {}", meal.description)?;
        if !meal.ingredients.is_empty() {
            writeln!(out, "  Ingredients: {}", meal.ingredients.join(", "))?;
        }
    }
    Ok(out)
}
