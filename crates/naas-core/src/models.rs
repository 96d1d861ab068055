//! C5 data model: the job record and its two payload shapes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credentials::{Credentials, SaltedHash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Started,
    Finished,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Finished | JobState::Failed | JobState::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Started => "started",
            JobState::Finished => "finished",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "queued" => JobState::Queued,
            "started" => JobState::Started,
            "finished" => JobState::Finished,
            "failed" => JobState::Failed,
            "cancelled" => JobState::Cancelled,
            _ => return None,
        })
    }
}

/// A plain show/exec command run, {ip, port, platform, commands,
/// delay_factor}.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandJob {
    pub ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub platform: String,
    pub commands: Vec<String>,
    #[serde(default = "default_delay_factor")]
    pub delay_factor: u32,
    /// Device enable/privileged-mode secret. Defaults to the basic-auth
    /// password when omitted.
    #[serde(default)]
    pub enable: Option<String>,
}

fn default_port() -> u16 {
    22
}

fn default_delay_factor() -> u32 {
    1
}

/// A configuration-mode run: the same device spec plus optional
/// save/commit flags. `config` is accepted as an alias of `commands`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigJob {
    pub ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub platform: String,
    #[serde(alias = "config")]
    pub commands: Vec<String>,
    #[serde(default = "default_delay_factor")]
    pub delay_factor: u32,
    #[serde(default)]
    pub save_config: bool,
    #[serde(default)]
    pub commit: bool,
    #[serde(default)]
    pub enable: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum JobPayload {
    Command(CommandJob),
    Config(ConfigJob),
}

impl JobPayload {
    pub fn ip(&self) -> &str {
        match self {
            JobPayload::Command(c) => &c.ip,
            JobPayload::Config(c) => &c.ip,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            JobPayload::Command(c) => c.port,
            JobPayload::Config(c) => c.port,
        }
    }

    pub fn platform(&self) -> &str {
        match self {
            JobPayload::Command(c) => &c.platform,
            JobPayload::Config(c) => &c.platform,
        }
    }

    pub fn commands(&self) -> &[String] {
        match self {
            JobPayload::Command(c) => &c.commands,
            JobPayload::Config(c) => &c.commands,
        }
    }

    pub fn enable(&self) -> Option<&str> {
        match self {
            JobPayload::Command(c) => c.enable.as_deref(),
            JobPayload::Config(c) => c.enable.as_deref(),
        }
    }
}

/// A queued unit of work. `result` is populated only once `state` is
/// `Finished`: `result.0` is the per-command map, `result.1` is the
/// error string (mutually exclusive in practice but both optional so a
/// partial run can carry either).
///
/// `credentials` travels with the record so the worker — a separate
/// process from the one that admitted the job — can open the SSH
/// session; it is never rendered in a response body (only `owner_hash`
/// is), and is dropped along with the record once its TTL expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub payload: JobPayload,
    pub credentials: Credentials,
    pub owner_hash: SaltedHash,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub result: Option<HashMap<String, String>>,
    pub error: Option<String>,
    pub retry_budget: u32,
}

impl Job {
    pub fn new(
        id: Uuid,
        payload: JobPayload,
        credentials: Credentials,
        owner_hash: SaltedHash,
        retry_budget: u32,
    ) -> Self {
        Self {
            id,
            payload,
            credentials,
            owner_hash,
            state: JobState::Queued,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
            result: None,
            error: None,
            retry_budget,
        }
    }
}
