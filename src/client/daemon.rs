use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::Serialize;
use url::Url;

use super::{Backend, InputOptions, Metadata};
use crate::config::Config;
use crate::error::ClientError;

// Requests go to the SDK daemon that the host starts next to the op.
pub struct DaemonBackend {
    http_client: HttpClient,
    base_url: Url,
    timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptBody<'a> {
    #[serde(rename = "type")]
    prompt_type: &'static str,
    name: &'a str,
    message: &'a str,
    allow_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<&'a str>,
}

#[derive(Serialize)]
struct PrintBody<'a> {
    text: &'a str,
}

impl Backend for DaemonBackend {
    fn track(
        &mut self,
        tags: &[&str],
        event: &str,
        metadata: &Metadata,
    ) -> Result<(), ClientError> {
        let mut body: serde_json::Map<String, serde_json::Value> = metadata
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        // metadata shares the top level with the event fields, which always win
        for reserved in ["event", "tags"] {
            if body.contains_key(reserved) {
                tracing::warn!(key = reserved, "metadata key shadowed by track field");
            }
        }
        body.insert("event".to_owned(), serde_json::Value::from(event));
        body.insert("tags".to_owned(), serde_json::Value::from(tags.to_vec()));
        self.send("track", self.post("track")?.timeout(self.timeout).json(&body))?;
        Ok(())
    }

    fn input(
        &mut self,
        name: &str,
        message: &str,
        options: &InputOptions,
    ) -> Result<String, ClientError> {
        let body = PromptBody {
            prompt_type: "input",
            name,
            message,
            allow_empty: options.allow_empty,
            default: options.default_value.as_deref(),
        };
        // no timeout here, the daemon answers once the user does
        let response = self.send("prompt", self.post("prompt")?.json(&body))?;
        let reply = response
            .json::<serde_json::Value>()
            .map_err(|source| ClientError::Decode {
                endpoint: "prompt",
                source,
            })?;

        reply
            .get(name)
            .and_then(|value| value.as_str())
            .map(str::to_owned)
            .ok_or_else(|| ClientError::MissingAnswer {
                name: name.to_owned(),
            })
    }

    fn print(&mut self, text: &str) -> Result<(), ClientError> {
        let body = PrintBody { text };
        self.send("print", self.post("print")?.timeout(self.timeout).json(&body))?;
        Ok(())
    }
}

impl DaemonBackend {
    pub fn new(config: &Config) -> Result<DaemonBackend, ClientError> {
        let port = config.speak_port.as_deref().ok_or(ClientError::MissingPort)?;
        let base_url = Url::parse(&format!("http://{}:{}/", config.daemon_host, port))?;

        let http_client = HttpClient::builder()
            .timeout(None::<Duration>)
            // the daemon is always local, never route it through HTTP_PROXY/ALL_PROXY
            .no_proxy()
            .build()
            .map_err(ClientError::HttpClient)?;

        tracing::debug!(%base_url, "using SDK daemon");
        Ok(DaemonBackend {
            http_client,
            base_url,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn post(&self, endpoint: &'static str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.http_client.post(url))
    }

    fn send(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<reqwest::blocking::Response, ClientError> {
        let response = request
            .send()
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, %status, "SDK daemon rejected request");
            return Err(ClientError::Status { endpoint, status });
        }
        Ok(response)
    }
}
