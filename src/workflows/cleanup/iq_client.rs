use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::domain::{Application, ApplicationId, ScanReport};
use super::gateway::{GatewayError, IqGateway};

/// Connection parameters for a single IQ Server.
#[derive(Clone)]
pub struct IqConnection {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for IqConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IqConnection")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Listing envelope. Entries stay raw so one malformed entry cannot fail
/// the whole listing.
#[derive(Debug, Deserialize)]
struct ApplicationList {
    #[serde(default)]
    applications: Vec<serde_json::Value>,
}

impl ApplicationList {
    fn into_applications(self) -> Vec<Application> {
        self.applications
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Application::from_listing_entry(index, entry))
            .collect()
    }
}

/// Blocking wrapper around an async `reqwest` client so the cleanup workflow
/// stays sequential and free of async details.
pub struct IqServerClient {
    connection: IqConnection,
    http: Client,
    runtime: Runtime,
}

impl IqServerClient {
    pub fn connect(connection: IqConnection) -> Result<Self, GatewayError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| GatewayError::Setup(err.to_string()))?;
        let http = Client::builder()
            .timeout(connection.timeout)
            .build()
            .map_err(|err| GatewayError::Setup(err.to_string()))?;

        let connection = IqConnection {
            base_url: connection.base_url.trim_end_matches('/').to_string(),
            ..connection
        };

        Ok(Self {
            connection,
            http,
            runtime,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.connection.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.connection.base_url, path)
    }

    /// Send one authenticated request and return the body of a 2xx response.
    fn send(&self, method: Method, url: &str) -> Result<String, GatewayError> {
        let result = self.runtime.block_on(async {
            let response = self
                .http
                .request(method.clone(), url)
                .basic_auth(&self.connection.username, Some(&self.connection.password))
                .send()
                .await?;
            let status: StatusCode = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        });

        let (status, body) = result.map_err(|err| GatewayError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        debug!(%method, url, status = status.as_u16(), "iq server responded");

        if !status.is_success() {
            return Err(GatewayError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.endpoint(path);
        let body = self.send(Method::GET, &url)?;
        serde_json::from_str(&body).map_err(|source| GatewayError::Decode { url, body, source })
    }
}

impl std::fmt::Debug for IqServerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IqServerClient")
            .field("base_url", &self.connection.base_url)
            .finish_non_exhaustive()
    }
}

impl IqGateway for IqServerClient {
    fn list_applications(&self) -> Result<Vec<Application>, GatewayError> {
        let list: ApplicationList = self.get_json("/api/v2/applications")?;
        Ok(list.into_applications())
    }

    fn scan_history(&self, id: &ApplicationId) -> Result<Vec<ScanReport>, GatewayError> {
        self.get_json(&format!("/api/v2/reports/applications/{id}"))
    }

    fn delete_application(&self, id: &ApplicationId) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/api/v2/applications/{id}"));
        self.send(Method::DELETE, &url).map(|_| ())
    }
}
