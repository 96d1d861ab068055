//! C6 payload validation: the registered platform set, IP parsing, and
//! the structural checks a `CommandJob`/`ConfigJob` must pass before a
//! job is ever enqueued.

use std::net::IpAddr;

use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{CommandJob, ConfigJob, JobPayload};

/// Platforms the driver adapter (C10) actually registers a factory for.
/// Kept in lockstep with `naas-driver`'s `DeviceFactory` match arms —
/// accepting a platform string here that the driver then rejects would
/// turn a 202 into a silently-Failed job.
pub const REGISTERED_PLATFORMS: &[&str] = &[
    "cisco_ios",
    "cisco_xr",
    "cisco_nxos",
    "cisco_asa",
    "juniper_junos",
    "autodetect",
];

pub fn validate_platform(platform: &str) -> Result<()> {
    if REGISTERED_PLATFORMS.contains(&platform) {
        Ok(())
    } else {
        Err(Error::unprocessable(format!(
            "platform '{platform}' is not in the registered driver set"
        )))
    }
}

pub fn validate_ip(ip: &str) -> Result<()> {
    ip.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| Error::unprocessable(format!("'{ip}' is not a valid IPv4 or IPv6 address")))
}

pub fn validate_port(port: u16) -> Result<()> {
    if port == 0 {
        Err(Error::unprocessable("port must be in [1, 65535]"))
    } else {
        Ok(())
    }
}

pub fn validate_commands(commands: &[String]) -> Result<()> {
    if commands.is_empty() {
        return Err(Error::unprocessable("commands must be a non-empty list"));
    }
    if commands.iter().any(|c| c.trim().is_empty()) {
        return Err(Error::unprocessable("commands must not contain blank entries"));
    }
    Ok(())
}

pub fn validate_delay_factor(delay_factor: u32) -> Result<()> {
    if delay_factor < 1 {
        Err(Error::unprocessable("delay_factor must be >= 1"))
    } else {
        Ok(())
    }
}

fn validate_common(ip: &str, port: u16, platform: &str, commands: &[String], delay_factor: u32) -> Result<()> {
    validate_ip(ip)?;
    validate_port(port)?;
    validate_platform(platform)?;
    validate_commands(commands)?;
    validate_delay_factor(delay_factor)?;
    Ok(())
}

pub fn validate_command_job(job: &CommandJob) -> Result<()> {
    validate_common(&job.ip, job.port, &job.platform, &job.commands, job.delay_factor)
}

pub fn validate_config_job(job: &ConfigJob) -> Result<()> {
    validate_common(&job.ip, job.port, &job.platform, &job.commands, job.delay_factor)
}

/// `device_type` is accepted as a deprecated alias of `platform`.
/// Rewrites the body in place and returns whether the alias was used
/// (callers log a deprecation warning when `true`).
pub fn apply_device_type_alias(body: &mut Value) -> bool {
    let Some(obj) = body.as_object_mut() else {
        return false;
    };
    if obj.contains_key("platform") {
        return false;
    }
    if let Some(device_type) = obj.remove("device_type") {
        obj.insert("platform".to_string(), device_type);
        true
    } else {
        false
    }
}

pub fn parse_command_job(mut body: Value) -> Result<(CommandJob, bool)> {
    let used_alias = apply_device_type_alias(&mut body);
    let job: CommandJob = serde_json::from_value(body).map_err(|e| Error::unprocessable(e.to_string()))?;
    validate_command_job(&job)?;
    Ok((job, used_alias))
}

pub fn parse_config_job(mut body: Value) -> Result<(ConfigJob, bool)> {
    let used_alias = apply_device_type_alias(&mut body);
    let job: ConfigJob = serde_json::from_value(body).map_err(|e| Error::unprocessable(e.to_string()))?;
    validate_config_job(&job)?;
    Ok((job, used_alias))
}

pub fn validate_payload(payload: &JobPayload) -> Result<()> {
    match payload {
        JobPayload::Command(c) => validate_command_job(c),
        JobPayload::Config(c) => validate_config_job(c),
    }
}

/// A well-formed UUIDv4 supplied via `X-Request-ID`, or `None` if the
/// header was absent/malformed (the caller falls back to a fresh id).
pub fn parse_request_id(header_value: Option<&str>) -> Option<Uuid> {
    header_value
        .and_then(|s| Uuid::parse_str(s).ok())
        .filter(|u| u.get_version_num() == 4)
}
