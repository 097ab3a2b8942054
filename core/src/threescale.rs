//! Blocking client that executes application operations over a `Transport`.

use tracing::{debug, warn};

use crate::client::ApplicationClient;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::portal::{AdminPortal, Credential};
use crate::types::{Application, ApplicationList, ApplicationPlan, Params};

/// One method per API action; each is a single HTTP round-trip with no
/// retries. Safe to share across threads when the transport is.
#[derive(Debug, Clone)]
pub struct ThreeScale<T> {
    client: ApplicationClient,
    transport: T,
}

impl<T: Transport> ThreeScale<T> {
    pub fn new(portal: AdminPortal, credential: impl Into<Credential>, transport: T) -> Self {
        Self {
            client: ApplicationClient::new(portal, credential),
            transport,
        }
    }

    /// The request builder/parser this client drives.
    pub fn requests(&self) -> &ApplicationClient {
        &self.client
    }

    pub fn create_application(
        &self,
        account_id: i64,
        plan_id: i64,
        name: &str,
        description: &str,
    ) -> Result<Application, ClientError> {
        let request = self
            .client
            .build_create_application(account_id, plan_id, name, description)?;
        self.client.parse_created_application(self.send(request)?)
    }

    pub fn list_applications(&self, account_id: i64) -> Result<ApplicationList, ClientError> {
        let request = self.client.build_list_applications(account_id)?;
        self.client.parse_application_list(self.send(request)?)
    }

    pub fn list_all_applications(&self) -> Result<ApplicationList, ClientError> {
        let request = self.client.build_list_all_applications()?;
        self.client.parse_application_list(self.send(request)?)
    }

    pub fn read_application(&self, account_id: i64, application_id: i64) -> Result<Application, ClientError> {
        let request = self.client.build_read_application(account_id, application_id)?;
        self.client.parse_application(self.send(request)?)
    }

    /// Only the fields present in `params` change on the server.
    pub fn update_application(
        &self,
        account_id: i64,
        application_id: i64,
        params: &Params,
    ) -> Result<Application, ClientError> {
        let request = self
            .client
            .build_update_application(account_id, application_id, params)?;
        self.client.parse_application(self.send(request)?)
    }

    pub fn delete_application(&self, account_id: i64, application_id: i64) -> Result<(), ClientError> {
        let request = self.client.build_delete_application(account_id, application_id)?;
        self.client.parse_empty(self.send(request)?)
    }

    pub fn change_application_plan(
        &self,
        account_id: i64,
        application_id: i64,
        plan_id: i64,
    ) -> Result<Application, ClientError> {
        let request = self
            .client
            .build_change_application_plan(account_id, application_id, plan_id)?;
        self.client.parse_application(self.send(request)?)
    }

    /// Clone the application's current plan into a plan owned by it alone.
    pub fn create_application_custom_plan(
        &self,
        account_id: i64,
        application_id: i64,
    ) -> Result<ApplicationPlan, ClientError> {
        let request = self
            .client
            .build_create_application_custom_plan(account_id, application_id)?;
        self.client.parse_application_plan(self.send(request)?)
    }

    /// Drop the custom plan and return the application to the shared one.
    pub fn delete_application_custom_plan(&self, account_id: i64, application_id: i64) -> Result<(), ClientError> {
        let request = self
            .client
            .build_delete_application_custom_plan(account_id, application_id)?;
        self.client.parse_empty(self.send(request)?)
    }

    pub fn suspend_application(&self, account_id: i64, application_id: i64) -> Result<Application, ClientError> {
        let request = self.client.build_suspend_application(account_id, application_id)?;
        self.client.parse_application(self.send(request)?)
    }

    pub fn resume_application(&self, account_id: i64, application_id: i64) -> Result<Application, ClientError> {
        let request = self.client.build_resume_application(account_id, application_id)?;
        self.client.parse_application(self.send(request)?)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        // The query string can carry the access token; log the path only.
        let path = request
            .url
            .split_once('?')
            .map_or(request.url.as_str(), |(path, _)| path);
        debug!(method = %request.method, %path, "sending 3scale request");

        let response = self.transport.execute(&request).map_err(|err| {
            warn!(method = %request.method, %path, error = %err, "3scale request failed");
            err
        })?;

        if response.is_success() {
            debug!(method = %request.method, %path, status = response.status, "3scale request succeeded");
        } else {
            warn!(method = %request.method, %path, status = response.status, "3scale returned an error status");
        }
        Ok(response)
    }
}
