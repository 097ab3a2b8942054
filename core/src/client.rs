//! Stateless request builder and response parser for the application API.
//!
//! # Design
//! `ApplicationClient` holds only the admin portal and the credential and
//! carries no mutable state between calls. Each operation has a `build_*`
//! method producing an `HttpRequest`; each response shape has a `parse_*`
//! method consuming an `HttpResponse`. `ThreeScale` runs the round-trip in
//! between; callers with their own HTTP stack can do it themselves.
//!
//! The credential travels as `access_token`: in the query string for GET and
//! DELETE, in the form body for POST and PUT.

use url::{form_urlencoded, Url};

use crate::codec::{Codec, Json, Xml};
use crate::error::{ApiErr, ClientError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportError};
use crate::portal::{AdminPortal, Credential};
use crate::types::{Application, ApplicationElem, ApplicationList, ApplicationPlan, ApplicationPlanElem, Params};

const ACCESS_TOKEN_PARAM: &str = "access_token";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const NO_PARAMS: [(&str, &str); 0] = [];

const LIST_ALL_APPLICATIONS_PATH: &str = "/admin/api/accounts/applications.json";

fn account_applications_path(account_id: i64) -> String {
    format!("/admin/api/accounts/{account_id}/applications.json")
}

fn application_path(account_id: i64, application_id: i64) -> String {
    format!("/admin/api/accounts/{account_id}/applications/{application_id}.json")
}

fn application_action_path(account_id: i64, application_id: i64, action: &str) -> String {
    format!("/admin/api/accounts/{account_id}/applications/{application_id}/{action}.json")
}

/// Synchronous, stateless client for the application endpoints.
#[derive(Debug, Clone)]
pub struct ApplicationClient {
    portal: AdminPortal,
    credential: Credential,
}

impl ApplicationClient {
    pub fn new(portal: AdminPortal, credential: impl Into<Credential>) -> Self {
        Self {
            portal,
            credential: credential.into(),
        }
    }

    pub fn portal(&self) -> &AdminPortal {
        &self.portal
    }

    pub fn build_create_application(
        &self,
        account_id: i64,
        plan_id: i64,
        name: &str,
        description: &str,
    ) -> Result<HttpRequest, ClientError> {
        let plan_id = plan_id.to_string();
        self.form_request::<Xml>(
            HttpMethod::Post,
            &account_applications_path(account_id),
            [("plan_id", plan_id.as_str()), ("name", name), ("description", description)],
        )
    }

    pub fn build_list_applications(&self, account_id: i64) -> Result<HttpRequest, ClientError> {
        self.query_request::<Json>(HttpMethod::Get, &account_applications_path(account_id))
    }

    pub fn build_list_all_applications(&self) -> Result<HttpRequest, ClientError> {
        self.query_request::<Json>(HttpMethod::Get, LIST_ALL_APPLICATIONS_PATH)
    }

    pub fn build_read_application(&self, account_id: i64, application_id: i64) -> Result<HttpRequest, ClientError> {
        self.query_request::<Json>(HttpMethod::Get, &application_path(account_id, application_id))
    }

    pub fn build_update_application(
        &self,
        account_id: i64,
        application_id: i64,
        params: &Params,
    ) -> Result<HttpRequest, ClientError> {
        self.form_request::<Json>(HttpMethod::Put, &application_path(account_id, application_id), params.iter())
    }

    pub fn build_delete_application(&self, account_id: i64, application_id: i64) -> Result<HttpRequest, ClientError> {
        self.query_request::<Json>(HttpMethod::Delete, &application_path(account_id, application_id))
    }

    pub fn build_change_application_plan(
        &self,
        account_id: i64,
        application_id: i64,
        plan_id: i64,
    ) -> Result<HttpRequest, ClientError> {
        let plan_id = plan_id.to_string();
        self.form_request::<Json>(
            HttpMethod::Put,
            &application_action_path(account_id, application_id, "change_plan"),
            [("plan_id", plan_id.as_str())],
        )
    }

    pub fn build_create_application_custom_plan(
        &self,
        account_id: i64,
        application_id: i64,
    ) -> Result<HttpRequest, ClientError> {
        self.form_request::<Json>(
            HttpMethod::Put,
            &application_action_path(account_id, application_id, "customize_plan"),
            NO_PARAMS,
        )
    }

    pub fn build_delete_application_custom_plan(
        &self,
        account_id: i64,
        application_id: i64,
    ) -> Result<HttpRequest, ClientError> {
        self.form_request::<Json>(
            HttpMethod::Put,
            &application_action_path(account_id, application_id, "decustomize_plan"),
            NO_PARAMS,
        )
    }

    pub fn build_suspend_application(&self, account_id: i64, application_id: i64) -> Result<HttpRequest, ClientError> {
        self.form_request::<Json>(
            HttpMethod::Put,
            &application_action_path(account_id, application_id, "suspend"),
            NO_PARAMS,
        )
    }

    pub fn build_resume_application(&self, account_id: i64, application_id: i64) -> Result<HttpRequest, ClientError> {
        self.form_request::<Json>(
            HttpMethod::Put,
            &application_action_path(account_id, application_id, "resume"),
            NO_PARAMS,
        )
    }

    /// Parse a `{"application": {...}}` body.
    pub fn parse_application(&self, response: HttpResponse) -> Result<Application, ClientError> {
        decode::<Json, ApplicationElem>(response).map(|elem| elem.application)
    }

    /// Parse the XML `<application>` document returned by the create call.
    pub fn parse_created_application(&self, response: HttpResponse) -> Result<Application, ClientError> {
        decode::<Xml, Application>(response)
    }

    pub fn parse_application_list(&self, response: HttpResponse) -> Result<ApplicationList, ClientError> {
        decode::<Json, ApplicationList>(response)
    }

    /// Parse a `{"application_plan": {...}}` body.
    pub fn parse_application_plan(&self, response: HttpResponse) -> Result<ApplicationPlan, ClientError> {
        decode::<Json, ApplicationPlanElem>(response).map(|elem| elem.application_plan)
    }

    /// Accept any 2xx response, ignoring its body.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ClientError> {
        check_status(&response)
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.portal
            .base_url()
            .join(path)
            .map_err(|e| TransportError::InvalidRequest(format!("{path}: {e}")).into())
    }

    fn query_request<C: Codec>(&self, method: HttpMethod, path: &str) -> Result<HttpRequest, ClientError> {
        let mut url = self.url(path)?;
        url.query_pairs_mut()
            .append_pair(ACCESS_TOKEN_PARAM, self.credential.as_str());

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: vec![("accept".to_string(), C::ACCEPT.to_string())],
            body: None,
        })
    }

    fn form_request<'a, C: Codec>(
        &self,
        method: HttpMethod,
        path: &str,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<HttpRequest, ClientError> {
        let url = self.url(path)?;

        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair(ACCESS_TOKEN_PARAM, self.credential.as_str());
        for (key, value) in params {
            form.append_pair(key, value);
        }

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: vec![
                ("accept".to_string(), C::ACCEPT.to_string()),
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(form.finish()),
        })
    }
}

fn decode<C: Codec, T: serde::de::DeserializeOwned>(response: HttpResponse) -> Result<T, ClientError> {
    check_status(&response)?;
    C::decode(&response.body)
}

/// Map any non-2xx status to `ApiErr`, keeping the raw body.
fn check_status(response: &HttpResponse) -> Result<(), ClientError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiErr::new(response.status, response.body.clone()).into())
}
