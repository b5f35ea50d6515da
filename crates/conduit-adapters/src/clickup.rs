//! ClickUp adapter -- project-management operations over the ClickUp v2 API.
//!
//! One [`ClickupApiWrapper`] serves every operation; each operation is a
//! [`ClickupMode`].  Tools built by [`ClickupToolkit`] fix one mode each and
//! forward the orchestrator's instructions verbatim.
//!
//! Instructions are a JSON object.  Identifier fields (`team_id`,
//! `space_id`, `folder_id`, `list_id`, `task_id`) select the resource; all
//! remaining fields form the request body of write operations.  The response
//! JSON is returned pretty-printed.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use conduit_vault::{
    EnvLookup, ExposeSecret, ProcessEnv, SecretString, resolve_credential, resolve_optional,
};
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::api_tool::ApiTool;
use crate::error::{AdapterError, Result};
use crate::traits::{ApiWrapper, Tool, Toolkit};

// ═══════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════

/// Environment variable holding the personal or OAuth access token.
pub const CLICKUP_ACCESS_TOKEN_ENV: &str = "CLICKUP_ACCESS_TOKEN";

/// Environment variable holding the default team (workspace) id.
pub const CLICKUP_TEAM_ID_ENV: &str = "CLICKUP_TEAM_ID";

/// ClickUp API v2 base URL.
const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

// ═══════════════════════════════════════════════════════════════════════
//  Modes
// ═══════════════════════════════════════════════════════════════════════

/// The operations the ClickUp wrapper supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickupMode {
    GetTeams,
    GetSpaces,
    GetFolders,
    GetLists,
    GetTask,
    CreateTask,
    CreateList,
    CreateFolder,
    UpdateTask,
}

impl ClickupMode {
    /// Every mode, in toolkit order.
    pub const ALL: [ClickupMode; 9] = [
        Self::GetTeams,
        Self::GetSpaces,
        Self::GetFolders,
        Self::GetLists,
        Self::GetTask,
        Self::CreateTask,
        Self::CreateList,
        Self::CreateFolder,
        Self::UpdateTask,
    ];

    /// The mode string passed to [`ApiWrapper::run`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetTeams => "get_teams",
            Self::GetSpaces => "get_spaces",
            Self::GetFolders => "get_folders",
            Self::GetLists => "get_lists",
            Self::GetTask => "get_task",
            Self::CreateTask => "create_task",
            Self::CreateList => "create_list",
            Self::CreateFolder => "create_folder",
            Self::UpdateTask => "update_task",
        }
    }

    /// Name of the tool exposing this mode.
    pub fn tool_name(&self) -> String {
        format!("clickup_{}", self.as_str())
    }

    /// Description of the tool exposing this mode.
    pub fn description(&self) -> &'static str {
        match self {
            Self::GetTeams => {
                "Get all teams (workspaces) the user can access. \
                 Input should be an empty JSON object: {}"
            }
            Self::GetSpaces => {
                "Get all spaces of a team. Input should be a JSON object, optionally \
                 with \"team_id\"; the configured team is used otherwise."
            }
            Self::GetFolders => {
                "Get all folders of a space. Input should be a JSON object with \"space_id\"."
            }
            Self::GetLists => {
                "Get all lists of a folder, or the folderless lists of a space. \
                 Input should be a JSON object with \"folder_id\" or \"space_id\"."
            }
            Self::GetTask => {
                "Get a task by id. Input should be a JSON object with \"task_id\"."
            }
            Self::CreateTask => {
                "Create a task in a list. Input should be a JSON object with \"list_id\", \
                 \"name\", and optional fields such as \"description\", \"priority\", \
                 \"due_date\", or \"assignees\"."
            }
            Self::CreateList => {
                "Create a list in a folder or space. Input should be a JSON object with \
                 \"name\" and either \"folder_id\" or \"space_id\"."
            }
            Self::CreateFolder => {
                "Create a folder in a space. Input should be a JSON object with \
                 \"space_id\" and \"name\"."
            }
            Self::UpdateTask => {
                "Update fields of a task. Input should be a JSON object with \"task_id\" \
                 and the fields to change, e.g. {\"task_id\": \"abc\", \"status\": \"done\"}."
            }
        }
    }
}

impl std::fmt::Display for ClickupMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClickupMode {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| AdapterError::InvalidParams {
                tool_name: "clickup".into(),
                reason: format!("unknown ClickUp mode `{s}`"),
            })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Configuration
// ═══════════════════════════════════════════════════════════════════════

/// Settings for [`ClickupApiWrapper`].
#[derive(Debug, Default)]
pub struct ClickupConfig {
    /// Access token.  Falls back to `CLICKUP_ACCESS_TOKEN`.
    pub access_token: Option<SecretString>,
    /// Default team id.  Falls back to `CLICKUP_TEAM_ID`.
    pub team_id: Option<String>,
    /// Override of the API base URL.
    pub base_url: Option<String>,
}

impl ClickupConfig {
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn with_team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Request planning
// ═══════════════════════════════════════════════════════════════════════

/// A fully resolved ClickUp request.
#[derive(Debug, PartialEq)]
struct PlannedRequest {
    method: Method,
    segments: Vec<String>,
    body: Option<Value>,
}

impl PlannedRequest {
    fn get(segments: &[&str]) -> Self {
        Self {
            method: Method::GET,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            body: None,
        }
    }

    fn with_body(method: Method, segments: &[&str], body: Map<String, Value>) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            body: Some(Value::Object(body)),
        }
    }
}

/// Parse the orchestrator's instructions into a JSON object.
///
/// Blank input is treated as `{}`.
fn parse_instructions(mode: ClickupMode, input: &str) -> Result<Map<String, Value>> {
    if input.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AdapterError::InvalidParams {
            tool_name: mode.tool_name(),
            reason: "instructions must be a JSON object".into(),
        }),
        Err(e) => Err(AdapterError::InvalidParams {
            tool_name: mode.tool_name(),
            reason: format!("instructions are not valid JSON: {e}"),
        }),
    }
}

/// Remove an identifier field, accepting strings and numbers.
fn take_id(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn require_id(mode: ClickupMode, fields: &mut Map<String, Value>, key: &str) -> Result<String> {
    take_id(fields, key).ok_or_else(|| AdapterError::InvalidParams {
        tool_name: mode.tool_name(),
        reason: format!("missing required field `{key}`"),
    })
}

fn require_field(mode: ClickupMode, fields: &Map<String, Value>, key: &str) -> Result<()> {
    match fields.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(()),
        _ => Err(AdapterError::InvalidParams {
            tool_name: mode.tool_name(),
            reason: format!("missing required string field `{key}`"),
        }),
    }
}

/// Map a mode and its instruction fields onto a ClickUp endpoint.
fn plan_request(
    mode: ClickupMode,
    mut fields: Map<String, Value>,
    default_team: Option<&str>,
) -> Result<PlannedRequest> {
    let planned = match mode {
        ClickupMode::GetTeams => PlannedRequest::get(&["team"]),
        ClickupMode::GetSpaces => {
            let team = take_id(&mut fields, "team_id")
                .or_else(|| default_team.map(str::to_string))
                .ok_or_else(|| {
                    AdapterError::ConfigError(format!(
                        "no ClickUp team id: set {CLICKUP_TEAM_ID_ENV} or pass `team_id`"
                    ))
                })?;
            PlannedRequest::get(&["team", &team, "space"])
        }
        ClickupMode::GetFolders => {
            let space = require_id(mode, &mut fields, "space_id")?;
            PlannedRequest::get(&["space", &space, "folder"])
        }
        ClickupMode::GetLists => {
            if let Some(folder) = take_id(&mut fields, "folder_id") {
                PlannedRequest::get(&["folder", &folder, "list"])
            } else {
                let space = require_id(mode, &mut fields, "space_id")?;
                PlannedRequest::get(&["space", &space, "list"])
            }
        }
        ClickupMode::GetTask => {
            let task = require_id(mode, &mut fields, "task_id")?;
            PlannedRequest::get(&["task", &task])
        }
        ClickupMode::CreateTask => {
            let list = require_id(mode, &mut fields, "list_id")?;
            require_field(mode, &fields, "name")?;
            PlannedRequest::with_body(Method::POST, &["list", &list, "task"], fields)
        }
        ClickupMode::CreateList => {
            let parent = match take_id(&mut fields, "folder_id") {
                Some(folder) => ("folder", folder),
                None => ("space", require_id(mode, &mut fields, "space_id")?),
            };
            require_field(mode, &fields, "name")?;
            PlannedRequest::with_body(Method::POST, &[parent.0, &parent.1, "list"], fields)
        }
        ClickupMode::CreateFolder => {
            let space = require_id(mode, &mut fields, "space_id")?;
            require_field(mode, &fields, "name")?;
            PlannedRequest::with_body(Method::POST, &["space", &space, "folder"], fields)
        }
        ClickupMode::UpdateTask => {
            let task = require_id(mode, &mut fields, "task_id")?;
            if fields.is_empty() {
                return Err(AdapterError::InvalidParams {
                    tool_name: mode.tool_name(),
                    reason: "no fields to update".into(),
                });
            }
            PlannedRequest::with_body(Method::PUT, &["task", &task], fields)
        }
    };
    Ok(planned)
}

// ═══════════════════════════════════════════════════════════════════════
//  Wrapper
// ═══════════════════════════════════════════════════════════════════════

/// Authenticated access to the ClickUp API.
#[derive(Debug)]
pub struct ClickupApiWrapper {
    access_token: SecretString,
    team_id: Option<String>,
    base_url: url::Url,
    client: reqwest::Client,
}

impl ClickupApiWrapper {
    /// Create a wrapper, reading missing settings from the process
    /// environment.
    pub fn new(config: ClickupConfig) -> Result<Self> {
        Self::with_env(config, &ProcessEnv)
    }

    /// Create a wrapper, reading missing settings through `env`.
    pub fn with_env(config: ClickupConfig, env: &impl EnvLookup) -> Result<Self> {
        let access_token = resolve_credential(config.access_token, CLICKUP_ACCESS_TOKEN_ENV, env)?;
        let team_id = resolve_optional(config.team_id, CLICKUP_TEAM_ID_ENV, env);

        let raw_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = url::Url::parse(&raw_url).map_err(|e| {
            AdapterError::ConfigError(format!("invalid ClickUp base url `{raw_url}`: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AdapterError::ConfigError(format!(
                "ClickUp base url `{raw_url}` cannot be a base"
            )));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(AdapterError::http_client)?;

        info!(base_url = %base_url, team_configured = team_id.is_some(), "clickup wrapper ready");

        Ok(Self {
            access_token,
            team_id,
            base_url,
            client,
        })
    }

    /// The configured default team id.
    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    /// Build the full URL for `segments` below the base URL.
    fn endpoint(&self, segments: &[String]) -> url::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Run `mode` with already parsed instructions.
    pub async fn execute(&self, mode: ClickupMode, fields: Map<String, Value>) -> Result<Value> {
        let tool_name = mode.tool_name();
        let planned = plan_request(mode, fields, self.team_id.as_deref())?;
        let url = self.endpoint(&planned.segments);
        debug!(mode = %mode, method = %planned.method, url = %url, "calling ClickUp");

        let mut request = self
            .client
            .request(planned.method, url)
            .header(AUTHORIZATION, self.access_token.expose_secret());
        if let Some(body) = &planned.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdapterError::transport(&tool_name, e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| AdapterError::ExecutionFailed {
            tool_name: tool_name.clone(),
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("err").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(text);
            return Err(AdapterError::ExecutionFailed {
                tool_name,
                reason: format!("ClickUp API returned {}: {message}", status.as_u16()),
            });
        }

        serde_json::from_str(&text).map_err(|e| AdapterError::UnexpectedResponse {
            tool_name,
            reason: format!("ClickUp response is not JSON: {e}"),
        })
    }
}

#[async_trait]
impl ApiWrapper for ClickupApiWrapper {
    async fn run(&self, mode: &str, input: &str) -> Result<String> {
        let mode: ClickupMode = mode.parse()?;
        let fields = parse_instructions(mode, input)?;
        let value = self.execute(mode, fields).await?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tools
// ═══════════════════════════════════════════════════════════════════════

/// A tool bound to one ClickUp mode.
pub type ClickupAction = ApiTool<ClickupApiWrapper>;

/// One [`ClickupAction`] per [`ClickupMode`], sharing a wrapper.
#[derive(Debug, Clone)]
pub struct ClickupToolkit {
    wrapper: Arc<ClickupApiWrapper>,
}

impl ClickupToolkit {
    pub fn from_wrapper(wrapper: Arc<ClickupApiWrapper>) -> Self {
        Self { wrapper }
    }

    /// The action for a single mode.
    pub fn action(&self, mode: ClickupMode) -> ClickupAction {
        ApiTool::new(
            mode.tool_name(),
            mode.description(),
            mode.as_str(),
            Arc::clone(&self.wrapper),
        )
    }
}

impl Toolkit for ClickupToolkit {
    fn get_tools(&self) -> Vec<Arc<dyn Tool>> {
        ClickupMode::ALL
            .into_iter()
            .map(|mode| Arc::new(self.action(mode)) as Arc<dyn Tool>)
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════
