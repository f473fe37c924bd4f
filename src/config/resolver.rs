use std::fmt;
use std::io;

use super::{ConfigError, HttpConfig, PresetParameters};
use crate::console::Console;
use crate::workflows::cleanup::{Cutoff, IqConnection};

/// Immutable parameters for one cleanup run.
#[derive(Clone)]
pub struct RunConfig {
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub cutoff: Cutoff,
    pub http: HttpConfig,
    pub dry_run: bool,
}

impl RunConfig {
    /// Fill every missing preset from the console, then validate.
    ///
    /// Prompts run in a fixed order (URL, username, password, cutoff) and the
    /// cutoff is only parsed once everything has been collected, so no network
    /// traffic happens before the configuration is known to be valid.
    pub fn resolve(
        presets: PresetParameters,
        http: HttpConfig,
        dry_run: bool,
        console: &mut dyn Console,
    ) -> Result<Self, ConfigError> {
        let server_url = preset_or_prompt(
            presets.server_url,
            "server URL",
            || console.ask("Enter Sonatype IQ Server URL (e.g., http://localhost:8070): "),
        )?;
        let username = preset_or_prompt(presets.username, "username", || {
            console.ask("Enter IQ Server Username: ")
        })?;
        let password = preset_or_prompt(presets.password, "password", || {
            console.ask_secret("Enter IQ Server Password: ")
        })?;
        let cutoff_date = preset_or_prompt(presets.cutoff_date, "cutoff date", || {
            console.ask("Enter the cutoff date (YYYY-MM-DD) to delete applications older than: ")
        })?;

        let cutoff = Cutoff::parse(&cutoff_date)?;
        let server_url = server_url.trim().trim_end_matches('/').to_string();
        if server_url.is_empty() {
            return Err(ConfigError::MissingServerUrl);
        }

        Ok(Self {
            server_url,
            username: username.trim().to_string(),
            password,
            cutoff,
            http,
            dry_run,
        })
    }

    pub fn connection(&self) -> IqConnection {
        IqConnection {
            base_url: self.server_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: self.http.timeout,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("cutoff", &self.cutoff)
            .field("http", &self.http)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

fn preset_or_prompt<F>(
    preset: Option<String>,
    field: &'static str,
    prompt: F,
) -> Result<String, ConfigError>
where
    F: FnOnce() -> io::Result<String>,
{
    match preset {
        Some(value) => Ok(value),
        None => prompt().map_err(|source| ConfigError::Prompt { field, source }),
    }
}
