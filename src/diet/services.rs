use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

use super::flow::DietPlanFlow;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Failed to generate diet plan")]
    GenerationFailed,
}

/// Forwards `request` to the flow and returns its output untouched. Neither
/// side is checked: every flow failure collapses into
/// [`PlanError::GenerationFailed`].
pub async fn generate_plan(flow: &dyn DietPlanFlow, request: &Value) -> Result<Value, PlanError> {
    match flow.run(request).await {
        Ok(plan) => {
            info!(goal = ?request.get("goal"), "diet plan generated");
            Ok(plan)
        }
        Err(e) => {
            error!(error = ?e, "error generating diet plan");
            Err(PlanError::GenerationFailed)
        }
    }
}

/// Whatever the planner session calls to get a plan.
#[async_trait]
pub trait PlanRequester: Send + Sync {
    async fn request_plan(&self, request: &Value) -> Result<Value, PlanError>;
}

#[derive(Clone)]
pub struct DietPlanner {
    flow: Arc<dyn DietPlanFlow>,
}

impl DietPlanner {
    pub fn new(flow: Arc<dyn DietPlanFlow>) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl PlanRequester for DietPlanner {
    async fn request_plan(&self, request: &Value) -> Result<Value, PlanError> {
        generate_plan(self.flow.as_ref(), request).await
    }
}
