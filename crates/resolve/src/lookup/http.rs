//! Remote item lookup over the host's RPC endpoint.

use crate::error::{ErrorKind, Result};
use crate::lookup::ItemLookup;
use crate::models::LookupRecord;
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

/// Item lookup that calls a whitelisted server method.
///
/// Sends `POST {base_url}/api/method/{method}` with a form-encoded
/// `search_value` and reads the record from the `message` key of the JSON
/// response. An absent, `null` or empty `message` means "no match".
pub struct HttpLookup {
    client: Client,
    base_url: String,
    method: String,
    token: Option<String>,
}

impl HttpLookup {
    pub fn new(base_url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            method: method.into(),
            token: None,
        }
    }

    /// Authenticate with an API key/secret pair.
    pub fn with_token(mut self, api_key: impl AsRef<str>, api_secret: impl AsRef<str>) -> Self {
        self.token = Some(format!("token {}:{}", api_key.as_ref(), api_secret.as_ref()));
        self
    }

    fn url(&self) -> String {
        format!("{}/api/method/{}", self.base_url.trim_end_matches('/'), self.method.trim_matches('/'))
    }

    fn parse(body: &str) -> Result<Option<LookupRecord>> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(default)]
            message: Value,
        }

        let envelope: Envelope = serde_json::from_str(body).or_raise(|| ErrorKind::LookupFailure)?;
        match envelope.message {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            message @ Value::Object(_) => {
                let record: LookupRecord = serde_json::from_value(message).or_raise(|| ErrorKind::LookupFailure)?;
                Ok((!record.is_empty()).then_some(record))
            },
            _ => exn::bail!(ErrorKind::LookupFailure),
        }
    }
}

#[async_trait]
impl ItemLookup for HttpLookup {
    fn name(&self) -> &str {
        &self.method
    }

    #[instrument(skip(self))]
    async fn lookup(&self, search_value: &str) -> Result<Option<LookupRecord>> {
        let mut request = self.client.post(self.url()).form(&[("search_value", search_value)]);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, token);
        }
        let response = request.send().await.or_raise(|| ErrorKind::LookupFailure)?;
        let response = response.error_for_status().or_raise(|| ErrorKind::LookupFailure)?;
        let body = response.text().await.or_raise(|| ErrorKind::LookupFailure)?;
        let record = Self::parse(&body)?;
        tracing::debug!(found = record.is_some(), "Lookup answered");
        Ok(record)
    }
}
