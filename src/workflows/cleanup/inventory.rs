use tracing::{info, warn};

use super::domain::{Application, ScanReport, TrackedApplication};
use super::gateway::{GatewayError, IqGateway};

/// Fetches the application collection, absorbing failures into an empty list.
#[derive(Debug)]
pub struct ApplicationLister<'a, G: ?Sized> {
    gateway: &'a G,
}

impl<'a, G> ApplicationLister<'a, G>
where
    G: IqGateway + ?Sized,
{
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub fn list(&self) -> Vec<Application> {
        match self.gateway.list_applications() {
            Ok(applications) => {
                info!(count = applications.len(), "fetched application list");
                if let Some(first) = applications.first() {
                    if first.id.is_none() {
                        warn!(
                            name = ?first.name,
                            public_id = ?first.public_id,
                            "first application has no 'id' field; the server may not expose internal ids"
                        );
                    }
                }
                applications
            }
            Err(err) => {
                log_failure("error fetching applications", &err);
                Vec::new()
            }
        }
    }
}

/// Fetches one application's report history, absorbing failures into an
/// empty history.
#[derive(Debug)]
pub struct ScanHistoryResolver<'a, G: ?Sized> {
    gateway: &'a G,
}

impl<'a, G> ScanHistoryResolver<'a, G>
where
    G: IqGateway + ?Sized,
{
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub fn resolve(&self, application: &TrackedApplication) -> Vec<ScanReport> {
        match self.gateway.scan_history(&application.id) {
            Ok(history) => history,
            Err(err) => {
                warn!(
                    application = %application.id,
                    name = %application.name,
                    public_id = %application.public_id,
                    error = %err,
                    status = ?err.status(),
                    response = ?err.body(),
                    "error fetching scan history"
                );
                Vec::new()
            }
        }
    }
}

fn log_failure(context: &str, err: &GatewayError) {
    match err {
        GatewayError::Decode { body, .. } => {
            warn!(error = %err, response = %body, "{context}");
        }
        GatewayError::Status { status, body, .. } => {
            warn!(error = %err, status, response = %body, "{context}");
        }
        _ => warn!(error = %err, "{context}"),
    }
}
