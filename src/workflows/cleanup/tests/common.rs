use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use crate::console::Console;
use crate::workflows::cleanup::domain::{Application, ApplicationId, Cutoff, ScanReport};
use crate::workflows::cleanup::gateway::{GatewayError, IqGateway};
use crate::workflows::cleanup::service::CleanupService;

pub(super) fn cutoff() -> Cutoff {
    Cutoff::parse("2023-01-01").expect("valid cutoff")
}

pub(super) fn application(id: &str, name: &str) -> Application {
    Application {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        public_id: Some(format!("{}-public", name.to_ascii_lowercase())),
    }
}

pub(super) fn app_id(id: &str) -> ApplicationId {
    ApplicationId(id.to_string())
}

pub(super) enum HistoryFixture {
    Reports(Vec<ScanReport>),
    Status(u16),
    Garbled,
}

#[derive(Default)]
struct GatewayState {
    applications: Vec<Application>,
    list_fails: bool,
    histories: HashMap<ApplicationId, HistoryFixture>,
    delete_statuses: HashMap<ApplicationId, u16>,
    delete_unreachable: HashSet<ApplicationId>,
    history_calls: Vec<ApplicationId>,
    delete_calls: Vec<ApplicationId>,
}

#[derive(Default, Clone)]
pub(super) struct FakeGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl std::fmt::Debug for FakeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeGateway").finish_non_exhaustive()
    }
}

impl FakeGateway {
    pub(super) fn with_application(self, application: Application, history: HistoryFixture) -> Self {
        {
            let mut guard = self.state.lock().expect("gateway mutex poisoned");
            if let Some(id) = application.id.clone() {
                guard.histories.insert(ApplicationId(id), history);
            }
            guard.applications.push(application);
        }
        self
    }

    pub(super) fn with_scan(self, id: &str, name: &str, evaluation_date: &str) -> Self {
        self.with_application(
            application(id, name),
            HistoryFixture::Reports(vec![ScanReport::evaluated_at(evaluation_date)]),
        )
    }

    pub(super) fn failing_list(self) -> Self {
        self.state.lock().expect("gateway mutex poisoned").list_fails = true;
        self
    }

    pub(super) fn failing_delete(self, id: &str, status: u16) -> Self {
        self.state
            .lock()
            .expect("gateway mutex poisoned")
            .delete_statuses
            .insert(app_id(id), status);
        self
    }

    pub(super) fn failing_delete_transport(self, id: &str) -> Self {
        self.state
            .lock()
            .expect("gateway mutex poisoned")
            .delete_unreachable
            .insert(app_id(id));
        self
    }

    pub(super) fn history_calls(&self) -> Vec<ApplicationId> {
        self.state
            .lock()
            .expect("gateway mutex poisoned")
            .history_calls
            .clone()
    }

    pub(super) fn delete_calls(&self) -> Vec<ApplicationId> {
        self.state
            .lock()
            .expect("gateway mutex poisoned")
            .delete_calls
            .clone()
    }
}

impl IqGateway for FakeGateway {
    fn list_applications(&self) -> Result<Vec<Application>, GatewayError> {
        let guard = self.state.lock().expect("gateway mutex poisoned");
        if guard.list_fails {
            return Err(GatewayError::Transport {
                url: "http://iq.test/api/v2/applications".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(guard.applications.clone())
    }

    fn scan_history(&self, id: &ApplicationId) -> Result<Vec<ScanReport>, GatewayError> {
        let mut guard = self.state.lock().expect("gateway mutex poisoned");
        guard.history_calls.push(id.clone());
        let url = format!("http://iq.test/api/v2/reports/applications/{id}");
        match guard.histories.get(id) {
            Some(HistoryFixture::Reports(reports)) => Ok(reports.clone()),
            Some(HistoryFixture::Status(status)) => Err(GatewayError::Status {
                url,
                status: *status,
                body: "server error".to_string(),
            }),
            Some(HistoryFixture::Garbled) => {
                let source = serde_json::from_str::<serde_json::Value>("{\"reports\":")
                    .expect_err("truncated json");
                Err(GatewayError::Decode {
                    url,
                    body: "{\"reports\":".to_string(),
                    source,
                })
            }
            None => Ok(Vec::new()),
        }
    }

    fn delete_application(&self, id: &ApplicationId) -> Result<(), GatewayError> {
        let mut guard = self.state.lock().expect("gateway mutex poisoned");
        guard.delete_calls.push(id.clone());
        if guard.delete_unreachable.contains(id) {
            return Err(GatewayError::Transport {
                url: format!("http://iq.test/api/v2/applications/{id}"),
                message: "connection reset by peer".to_string(),
            });
        }
        match guard.delete_statuses.get(id) {
            Some(status) => Err(GatewayError::Status {
                url: format!("http://iq.test/api/v2/applications/{id}"),
                status: *status,
                body: "{\"error\":\"boom\"}".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Console that replays canned answers and records everything shown.
#[derive(Default)]
pub(super) struct ScriptedConsole {
    answers: VecDeque<String>,
    pub(super) lines: Vec<String>,
    pub(super) prompts: Vec<String>,
}

impl ScriptedConsole {
    pub(super) fn answering(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|answer| answer.to_string()).collect(),
            ..Self::default()
        }
    }

    pub(super) fn transcript(&self) -> String {
        self.lines.join("\n")
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.ask(prompt)
    }
}

pub(super) fn build_service(gateway: &FakeGateway) -> CleanupService<FakeGateway> {
    CleanupService::new(Arc::new(gateway.clone()), cutoff())
}
