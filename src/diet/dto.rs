use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    GainMuscle,
    Maintain,
    #[default]
    HealthyLiving,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

/// Planner form payload, forwarded to the generation flow as-is.
/// Numbers are kept as JSON numbers so nothing is reformatted on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanRequest {
    pub age: Number,
    pub weight: Number,
    pub height: Number,
    pub gender: Gender,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub dietary_restrictions: String,
    #[serde(default)]
    pub cuisine_preferences: String,
}

impl Default for DietPlanRequest {
    fn default() -> Self {
        Self {
            age: 30.into(),
            weight: 70.into(),
            height: 170.into(),
            gender: Gender::default(),
            goal: Goal::default(),
            activity_level: ActivityLevel::default(),
            dietary_restrictions: String::new(),
            cuisine_preferences: String::new(),
        }
    }
}

/// Typed view of a generated plan. Only used when rendering; the requester
/// hands back the flow's raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub daily_calories: Number,
    pub macros: Macros,
    pub meals: Vec<PlannedMeal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: String,
    pub carbs: String,
    pub fats: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    #[serde(rename = "type")]
    pub meal_type: String,
    pub name: String,
    pub calories: Number,
    pub description: String,
    pub ingredients: Vec<String>,
}

impl DietPlan {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}
