use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::instrument;

use super::{dto::DietPlanRequest, services::PlanRequester};
use crate::state::AppState;

pub fn diet_routes() -> Router<AppState> {
    Router::new()
        .route("/diet/plan", post(generate))
        .route("/diet/form", get(default_form))
}

/// POST /diet/plan: the form body goes to the flow as sent, and the flow's
/// output comes back as-is.
#[instrument(skip(state, request))]
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state
        .planner
        .request_plan(&request)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))
}

pub async fn default_form() -> Json<DietPlanRequest> {
    Json(DietPlanRequest::default())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::store::MemoryDocumentStore;
    use crate::testing::{test_state, StubFlow};

    fn plan_request(body: Value) -> Request<Body> {
        Request::post("/api/v1/diet/plan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form() -> Value {
        json!({
            "age": 30, "weight": 70, "height": 170,
            "gender": "Female", "goal": "weight_loss", "activityLevel": "light",
            "dietaryRestrictions": "vegetarian", "cuisinePreferences": "Italian"
        })
    }

    #[tokio::test]
    async fn plan_endpoint_returns_flow_output() {
        let output = json!({"dailyCalories": 1900, "macros": {}, "meals": [], "extra": true});
        let state = test_state(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(StubFlow::ok(output.clone())),
        );
        let res = build_app(state).oneshot(plan_request(form())).await.unwrap();
        assert_eq!(res.status(), 200);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), output);
    }

    #[tokio::test]
    async fn plan_endpoint_hides_flow_failure_cause() {
        let state = test_state(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(StubFlow::failing("quota exceeded for project 42")),
        );
        let res = build_app(state).oneshot(plan_request(form())).await.unwrap();
        assert_eq!(res.status(), 502);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Failed to generate diet plan");
    }

    #[tokio::test]
    async fn plan_endpoint_forwards_unparsed_form_values() {
        let flow = Arc::new(StubFlow::ok(json!({"dailyCalories": 2000})));
        let state = test_state(Arc::new(MemoryDocumentStore::new()), flow.clone());
        let body = json!({
            "age": null, "weight": 70, "height": 170,
            "gender": "male", "goal": "healthy_living", "activityLevel": "moderate",
            "dietaryRestrictions": "", "cuisinePreferences": "", "source": "pwa"
        });

        let res = build_app(state).oneshot(plan_request(body.clone())).await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(flow.calls(), vec![body]);
    }

    #[tokio::test]
    async fn form_endpoint_serves_defaults() {
        let state = test_state(Arc::new(MemoryDocumentStore::new()), Arc::new(StubFlow::empty()));
        let req = Request::get("/api/v1/diet/form").body(Body::empty()).unwrap();
        let res = build_app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), 200);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["goal"], json!("healthy_living"));
        assert_eq!(body["age"], json!(30));
    }
}
