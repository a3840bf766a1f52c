//! Client handle over the ops SDK. Scales for new backends.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::config::Config;
use crate::error::ClientError;

pub type Metadata = HashMap<String, serde_json::Value>;

/// General backend trait, used in dynamic dispatch
pub trait Backend {
    /// Reports an event with its classification tags and free-form metadata.
    fn track(&mut self, tags: &[&str], event: &str, metadata: &Metadata)
        -> Result<(), ClientError>;
    /// Asks the user for free text and blocks until an answer comes back.
    fn input(
        &mut self,
        name: &str,
        message: &str,
        options: &InputOptions,
    ) -> Result<String, ClientError>;
    /// Shows text on the user-facing output surface.
    fn print(&mut self, text: &str) -> Result<(), ClientError>;
}

/// Configuration of an input prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOptions {
    pub allow_empty: bool,
    pub default_value: Option<String>,
}

impl Default for InputOptions {
    fn default() -> Self {
        InputOptions {
            allow_empty: true,
            default_value: None,
        }
    }
}

impl InputOptions {
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Answer used when the user submits nothing.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    EnumIter,
    Hash,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
/// Enumeration of the available backends, which also creates the dynamically dispatched instance.
pub enum BackendName {
    /// The host SDK daemon, reached over local HTTP.
    Daemon,
    /// Plain stdin/stdout, for running outside an op container.
    Terminal,
}

impl BackendName {
    /// Returns a dynamically dispatched instance of a backend that implements the `Backend` trait.
    ///
    /// # Examples
    /// ```
    /// use howdy_op::client::BackendName;
    /// use howdy_op::config::Config;
    ///
    /// assert!(BackendName::Terminal.instance(&Config::default()).is_ok());
    /// assert!(BackendName::Daemon.instance(&Config::default()).is_err());
    /// ```
    pub fn instance(&self, config: &Config) -> Result<Box<dyn Backend>, ClientError> {
        match *self {
            BackendName::Daemon => Ok(Box::new(daemon::DaemonBackend::new(config)?)),
            BackendName::Terminal => Ok(Box::new(terminal::TerminalBackend::stdio())),
        }
    }
}

pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Builds a handle from default settings and the current environment.
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        Ok(Client::from_config(&config)?)
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let name = config.resolve_backend();
        tracing::debug!(backend = %name, "creating SDK client");
        Ok(Client::with_backend(name.instance(config)?))
    }

    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Client { backend }
    }

    pub fn track(
        &mut self,
        tags: &[&str],
        event: &str,
        metadata: &Metadata,
    ) -> Result<(), ClientError> {
        tracing::debug!(?tags, event, "track");
        self.backend.track(tags, event, metadata)
    }

    /// Prompts for free text. Fails with [`ClientError::EmptyInput`] when
    /// `options.allow_empty` is off and no answer was given, whatever the backend.
    pub fn input(
        &mut self,
        name: &str,
        message: &str,
        options: &InputOptions,
    ) -> Result<String, ClientError> {
        tracing::debug!(name, "prompt input");
        let answer = self.backend.input(name, message, options)?;

        let answer = match (answer.is_empty(), &options.default_value) {
            (true, Some(default)) => default.clone(),
            _ => answer,
        };

        if answer.is_empty() && !options.allow_empty {
            return Err(ClientError::EmptyInput {
                name: name.to_owned(),
            });
        }

        Ok(answer)
    }

    pub fn print(&mut self, text: &str) -> Result<(), ClientError> {
        tracing::debug!("print");
        self.backend.print(text)
    }
}

pub mod daemon;
pub mod terminal;
