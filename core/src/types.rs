//! Domain DTOs for the application endpoints.
//!
//! # Design
//! Field names follow the wire format of the admin API. Every field is
//! defaulted so partial documents (an update echo, a state change) decode
//! cleanly. The same structs decode from JSON and from the XML document the
//! create endpoint returns.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// `null` decodes as the field's default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Empty text (`<first_traffic_at/>` in XML) decodes as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| value.filter(|s| !s.is_empty()))
}

/// A registered API consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    /// Owning account, string-typed on the wire.
    #[serde(deserialize_with = "null_as_default")]
    pub user_account_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub plan_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider_verification_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub application_id: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub first_traffic_at: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub first_daily_traffic_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub end_user_required: bool,
    #[serde(deserialize_with = "empty_as_none")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub updated_at: Option<String>,
    /// Only set when a 2xx body reports a partial failure.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub error: String,
}

/// Wire wrapper: `{"application": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationElem {
    pub application: Application,
}

/// Wire shape of list responses: `{"applications": [{"application": {...}}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    pub applications: Vec<ApplicationElem>,
}

impl ApplicationList {
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Application> {
        self.applications.iter().map(|elem| &elem.application)
    }

    pub fn into_applications(self) -> Vec<Application> {
        self.applications.into_iter().map(|elem| elem.application).collect()
    }
}

/// A plan definition, or the result of customizing an application's plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationPlan {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub system_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub custom: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub default: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub approval_required: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub setup_fee: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub cost_per_month: f64,
    pub trial_period_days: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub cancellation_period: i64,
    #[serde(deserialize_with = "empty_as_none")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub updated_at: Option<String>,
}

/// Wire wrapper: `{"application_plan": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPlanElem {
    pub application_plan: ApplicationPlan,
}

/// Partial-update fields sent as form parameters.
///
/// Every entry is sent as given, including one with an empty key. Iteration
/// and encoding are ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_tolerates_partial_documents() {
        let app: Application = serde_json::from_str(r#"{"id":12,"state":"suspended"}"#).unwrap();
        assert_eq!(app.id, 12);
        assert_eq!(app.state, "suspended");
        assert!(app.name.is_empty());
        assert!(app.first_traffic_at.is_none());
    }

    #[test]
    fn null_fields_decode_as_defaults() {
        let body = r#"{"id":1,"state":null,"description":null,"user_key":null,"service_id":null,"end_user_required":null,"first_traffic_at":null}"#;
        let app: Application = serde_json::from_str(body).unwrap();
        assert_eq!(app.id, 1);
        assert!(app.state.is_empty());
        assert!(app.description.is_empty());
        assert!(app.user_key.is_empty());
        assert_eq!(app.service_id, 0);
        assert!(!app.end_user_required);
        assert!(app.first_traffic_at.is_none());

        let body = r#"{"id":1,"setup_fee":null,"cost_per_month":null,"state":null,"custom":null,"trial_period_days":null}"#;
        let plan: ApplicationPlan = serde_json::from_str(body).unwrap();
        assert_eq!(plan.id, 1);
        assert_eq!(plan.setup_fee, 0.0);
        assert_eq!(plan.cost_per_month, 0.0);
        assert!(plan.state.is_empty());
        assert!(!plan.custom);
        assert!(plan.trial_period_days.is_none());
    }

    #[test]
    fn empty_timestamps_decode_as_none() {
        let xml = "<application><id>3</id><first_traffic_at/><created_at></created_at><updated_at>2019-03-14T10:54:11Z</updated_at></application>";
        let from_xml: Application = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(from_xml.id, 3);
        assert!(from_xml.first_traffic_at.is_none());
        assert!(from_xml.created_at.is_none());
        assert_eq!(from_xml.updated_at.as_deref(), Some("2019-03-14T10:54:11Z"));

        let from_json: Application =
            serde_json::from_str(r#"{"id":3,"first_traffic_at":null,"created_at":"","updated_at":"2019-03-14T10:54:11Z"}"#)
                .unwrap();
        assert_eq!(from_json, from_xml);
    }

    #[test]
    fn error_decodes_from_success_body() {
        let app: Application = serde_json::from_str(r#"{"id":1,"error":"plan is not published"}"#).unwrap();
        assert_eq!(app.error, "plan is not published");

        let app: Application = serde_json::from_str(r#"{"id":1,"error":null}"#).unwrap();
        assert!(app.error.is_empty());
    }

    #[test]
    fn empty_error_is_not_serialized() {
        let json = serde_json::to_value(Application::default()).unwrap();
        assert!(json.get("error").is_none());

        let app = Application {
            error: "plan not found".to_string(),
            ..Application::default()
        };
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["error"], "plan not found");
    }

    #[test]
    fn list_iterates_inner_applications() {
        let body = r#"{"applications":[{"application":{"id":1}},{"application":{"id":2}}]}"#;
        let list: ApplicationList = serde_json::from_str(body).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(list.into_applications()[1].id, 2);
    }

    #[test]
    fn plan_decodes_from_wrapper() {
        let body = r#"{"application_plan":{"id":21,"name":"customPlan","system_name":"customPlan","custom":true,"setup_fee":1.5}}"#;
        let elem: ApplicationPlanElem = serde_json::from_str(body).unwrap();
        assert_eq!(elem.application_plan.id, 21);
        assert!(elem.application_plan.custom);
        assert_eq!(elem.application_plan.setup_fee, 1.5);
    }

    #[test]
    fn params_keep_empty_keys_and_sort() {
        let params = Params::from([("name", "n"), ("", "newDescription ")]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get(""), Some("newDescription "));
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["", "name"]);
    }
}
