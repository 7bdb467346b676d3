//! Blocking HTTP client for the SciCat REST API.

use std::time::Duration;

use log::{debug, error, info};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{Result, ScicatError};
use crate::model::{
    Attachment, Datablock, Dataset, DatasetKind, DatasetUpdate, DerivedDataset, OrigDatablock,
    RawDataset,
};

use super::config::{ClientConfig, normalize_base_url};

/// Dataset collection used by the datablock and attachment endpoints.
pub const DEFAULT_DATASET_TYPE: &str = "RawDatasets";

/// Sort order applied by [`ScicatClient::datasets_find`].
const FULL_QUERY_ORDER: &str = "creationTime:desc";

/// How to look up an instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentLookup {
    Pid(String),
    /// Matched with a `like` filter on the instrument name.
    Name(String),
}

/// Talks to a SciCat backend over HTTP. One call is one request.
pub struct ScicatClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl ScicatClient {
    /// Connect with a config, logging in first when no token is given.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_http_client(config.timeout())?;

        let token = match config.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => token.to_string(),
            None => {
                let (username, password) = match (&config.username, &config.password) {
                    (Some(u), Some(p)) => (u.as_str(), p.as_str()),
                    _ => {
                        return Err(ScicatError::Config(
                            "SciCat login credentials (username, password) must be provided if token is not provided".to_string(),
                        ));
                    }
                };
                login(&client, &base_url, username, password)?
            }
        };

        info!("Starting ingestor talking to scicat at: {}", base_url);
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Connect with an existing access token.
    pub fn from_token(base_url: &str, token: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(base_url).with_token(token))
    }

    /// Log in with a username and password, then connect.
    pub fn from_credentials(base_url: &str, username: &str, password: &str) -> Result<Self> {
        Self::new(ClientConfig::new(base_url).with_credentials(username, password))
    }

    /// Connect using the `SCICAT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Create or replace a raw or derived dataset. Returns the pid.
    pub fn datasets_replace(&self, dataset: &DatasetKind) -> Result<String> {
        match dataset {
            DatasetKind::Raw(raw) => self.replace_or_create("RawDataSets", raw, "raw dataset"),
            DatasetKind::Derived(derived) => {
                self.replace_or_create("DerivedDatasets", derived, "derived dataset")
            }
        }
    }

    /// Create a dataset through the generic endpoint. Returns the created
    /// record, including its pid.
    pub fn datasets_create(&self, dataset: &Dataset) -> Result<Value> {
        let url = self.endpoint(&["Datasets"])?;
        let created = self.send(Method::POST, url, Some(dataset))?;
        info!("new dataset created {}", pid_of(&created).unwrap_or("<no pid>"));
        Ok(created)
    }

    /// Create or replace a raw dataset. Returns the pid.
    pub fn datasets_raw_replace(&self, dataset: &RawDataset) -> Result<String> {
        self.replace_or_create("RawDataSets", dataset, "raw dataset")
    }

    /// Create or replace a derived dataset. Returns the pid.
    pub fn datasets_derived_replace(&self, dataset: &DerivedDataset) -> Result<String> {
        self.replace_or_create("DerivedDataSets", dataset, "derived dataset")
    }

    /// Patch an existing dataset. Returns the pid reported by the backend.
    pub fn update_dataset(&self, pid: &str, update: &DatasetUpdate) -> Result<String> {
        let url = self.endpoint(&["Datasets", require_pid(pid)?])?;
        let response = self.send(Method::PATCH, url, Some(update))?;
        let pid = pid_of(&response).unwrap_or(pid).to_string();
        info!("dataset updated {}", pid);
        Ok(pid)
    }

    /// Create a datablock under `dataset_type` (e.g. `RawDatasets`).
    pub fn datasets_datablock_create(
        &self,
        datablock: &Datablock,
        dataset_type: &str,
    ) -> Result<Value> {
        let url = self.endpoint(&[
            dataset_type,
            require_pid(&datablock.dataset_id)?,
            "origdatablocks",
        ])?;
        self.send(Method::POST, url, Some(datablock))
    }

    /// Create the original datablock of a dataset.
    pub fn datasets_origdatablock_create(&self, datablock: &OrigDatablock) -> Result<Value> {
        let url = self.endpoint(&[
            "Datasets",
            require_pid(&datablock.dataset_id)?,
            "origdatablocks",
        ])?;
        self.send(Method::POST, url, Some(datablock))
    }

    /// Attach a thumbnail or other payload to a dataset.
    pub fn datasets_attachment_create(
        &self,
        attachment: &Attachment,
        dataset_type: &str,
    ) -> Result<()> {
        let dataset_id = attachment.dataset_id.as_deref().ok_or_else(|| {
            ScicatError::InvalidInput("attachment has no datasetId".to_string())
        })?;
        let url = self.endpoint(&[dataset_type, require_pid(dataset_id)?, "attachments"])?;
        self.send(Method::POST, url, Some(attachment))?;
        Ok(())
    }

    /// Full-text and field query over datasets, newest first.
    ///
    /// `skip` and `limit` are passed through unchanged.
    pub fn datasets_find(&self, skip: u64, limit: u64, query_fields: Option<&Value>) -> Result<Value> {
        let fields = query_fields.cloned().unwrap_or_else(|| json!({}));
        let limits = json!({"skip": skip, "limit": limit, "order": FULL_QUERY_ORDER});
        let mut url = self.endpoint(&["Datasets", "fullquery"])?;
        url.query_pairs_mut()
            .append_pair("fields", &fields.to_string())
            .append_pair("limits", &limits.to_string());
        self.send(Method::GET, url, None::<&Value>)
    }

    /// Datasets matching a simple `where` filter, e.g. `{"proposalId": "1234"}`.
    pub fn datasets_get_many(&self, filter_fields: Option<&Value>) -> Result<Value> {
        let filter = json!({"where": filter_fields.cloned().unwrap_or_else(|| json!({}))});
        let mut url = self.endpoint(&["Datasets"])?;
        url.query_pairs_mut()
            .append_pair("filter", &filter.to_string());
        self.send(Method::GET, url, None::<&Value>)
    }

    /// Published data, optionally filtered, e.g. `{"doi": "1234"}`.
    pub fn published_data_get_many(&self, filter: Option<&Value>) -> Result<Value> {
        let mut url = self.endpoint(&["PublishedData"])?;
        if let Some(filter) = filter {
            url.query_pairs_mut()
                .append_pair("filter", &json!({"where": filter}).to_string());
        }
        self.send(Method::GET, url, None::<&Value>)
    }

    /// A single dataset by pid.
    pub fn datasets_get_one(&self, pid: &str) -> Result<Value> {
        let url = self.endpoint(&["Datasets", require_pid(pid)?])?;
        self.send(Method::GET, url, None::<&Value>)
    }

    /// An instrument by pid or by name.
    pub fn instruments_get_one(&self, lookup: &InstrumentLookup) -> Result<Value> {
        let url = match lookup {
            InstrumentLookup::Pid(pid) => self.endpoint(&["Instruments", require_pid(pid)?])?,
            InstrumentLookup::Name(name) => {
                if name.is_empty() {
                    return Err(ScicatError::InvalidInput(
                        "You must specify instrument pid or name".to_string(),
                    ));
                }
                let mut url = self.endpoint(&["Instruments", "findOne"])?;
                let filter = json!({"where": {"name": {"like": name}}});
                url.query_pairs_mut()
                    .append_pair("filter", &filter.to_string());
                url
            }
        };
        self.send(Method::GET, url, None::<&Value>)
    }

    /// A sample by pid.
    pub fn samples_get_one(&self, pid: &str) -> Result<Value> {
        let url = self.endpoint(&["Samples", require_pid(pid)?])?;
        self.send(Method::GET, url, None::<&Value>)
    }

    /// A proposal by pid.
    pub fn proposals_get_one(&self, pid: &str) -> Result<Value> {
        let url = self.endpoint(&["Proposals", require_pid(pid)?])?;
        self.send(Method::GET, url, None::<&Value>)
    }

    /// Original datablocks of a dataset.
    pub fn datasets_origdatablocks_get_one(&self, pid: &str) -> Result<Value> {
        let url = self.endpoint(&["Datasets", require_pid(pid)?, "origdatablocks"])?;
        self.send(Method::GET, url, None::<&Value>)
    }

    /// Delete a dataset by pid.
    pub fn datasets_delete(&self, pid: &str) -> Result<Value> {
        let url = self.endpoint(&["Datasets", require_pid(pid)?])?;
        self.send(Method::DELETE, url, None::<&Value>)
    }

    fn replace_or_create<T: Serialize>(&self, collection: &str, dataset: &T, what: &str) -> Result<String> {
        let url = self.endpoint(&[collection, "replaceOrCreate"])?;
        let response = self.send(Method::POST, url, Some(dataset))?;
        let pid = pid_of(&response)
            .ok_or_else(|| ScicatError::Comm {
                status: 200,
                message: format!("no pid in response when creating {}", what),
            })?
            .to_string();
        info!("new {} created {}", what, pid);
        Ok(pid)
    }

    /// Base URL extended by percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ScicatError::Config(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|e| ScicatError::Config(format!("Invalid token: {}", e)))?,
        );
        Ok(headers)
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        Ok(self
            .client
            .request(method, url)
            .headers(self.build_headers()?)
            .query(&[("access_token", self.token.as_str())]))
    }

    fn send<B: Serialize + ?Sized>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Value> {
        debug!("{} {}", method, url);
        let mut request = self.request(method, url)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send()?;
        read_json(response)
    }
}

/// Log in and return an access token.
pub fn get_token(base_url: &str, username: &str, password: &str) -> Result<String> {
    let base_url = parse_base_url(base_url)?;
    let client = build_http_client(None)?;
    login(&client, &base_url, username, password)
}

fn login(client: &Client, base_url: &Url, username: &str, password: &str) -> Result<String> {
    info!("Getting new token");
    let url = base_url
        .join("Users/login")
        .map_err(|e| ScicatError::Config(format!("Invalid base URL: {}", e)))?;
    let response = client
        .post(url)
        .json(&json!({"username": username, "password": password}))
        .send()?;

    if !response.status().is_success() {
        let err = comm_error(response);
        error!("Error received: {}", err);
        return Err(ScicatError::Login(err.to_string()));
    }

    let data: Value = response.json()?;
    data.get("id")
        .or_else(|| data.get("access_token"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ScicatError::Login("no token in login response".to_string()))
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(&normalize_base_url(base_url))
        .map_err(|e| ScicatError::Config(format!("Invalid base URL '{}': {}", base_url, e)))
}

fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ScicatError::Config(format!("Failed to create HTTP client: {}", e)))
}

fn read_json(response: Response) -> Result<Value> {
    if !response.status().is_success() {
        let err = comm_error(response);
        error!("{}", err);
        return Err(err);
    }
    let text = response.text()?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Turn a failed response into [`ScicatError::Comm`], keeping the backend's
/// error message when it sent one.
fn comm_error(response: Response) -> ScicatError {
    let status = response.status().as_u16();
    let text = response.text().unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| error_message(&body))
        .unwrap_or(text);
    ScicatError::Comm { status, message }
}

fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error").unwrap_or(body);
    match error {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => error
            .get("message")
            .and_then(Value::as_str)
            .map(|m| match error.get("name").and_then(Value::as_str) {
                Some(name) => format!("{}: {}", name, m),
                None => m.to_string(),
            }),
        _ => None,
    }
}

fn pid_of(value: &Value) -> Option<&str> {
    value.get("pid").and_then(Value::as_str)
}

fn require_pid(pid: &str) -> Result<&str> {
    if pid.is_empty() {
        Err(ScicatError::InvalidInput(
            "No pid given. You must specify a dataset pid.".to_string(),
        ))
    } else {
        Ok(pid)
    }
}
