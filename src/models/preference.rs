use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::vendor_preferences;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    pub categories: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub auto_lead_filter: bool,
}

fn json_strings(value: &Option<serde_json::Value>) -> Vec<String> {
    value
        .as_ref()
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

impl From<vendor_preferences::Model> for PreferencesResponse {
    fn from(model: vendor_preferences::Model) -> Self {
        Self {
            categories: json_strings(&model.categories),
            states: json_strings(&model.states),
            cities: json_strings(&model.cities),
            budget_min: model.budget_min,
            budget_max: model.budget_max,
            auto_lead_filter: model.auto_lead_filter,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub categories: Option<Vec<String>>,
    pub states: Option<Vec<String>>,
    pub cities: Option<Vec<String>>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub auto_lead_filter: Option<bool>,
}
