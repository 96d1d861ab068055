//! Thin seam between the async worker loop and the blocking SSH driver.
//!
//! `naas_driver::NetworkDeviceConnection` is a synchronous trait built on
//! blocking I/O (ssh2), so every call through [`Driver`] must run inside
//! `tokio::task::spawn_blocking`. This module also translates the driver's
//! error taxonomy onto the coarser failure classes the worker loop's retry
//! and lockout logic switches on.

use naas_driver::device_connection::{DeviceConfig, NetworkDeviceConnection};
use naas_driver::device_factory::DeviceFactory;
use naas_driver::error::NetsshError;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Coarse failure classes the worker's retry/lockout logic switches on.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("transport failure: {0}")]
    Transport(String),

    /// An operation this driver build does not support (e.g. commit on a
    /// platform with no candidate-config workflow). Callers that document a
    /// best-effort step (save_config, commit) swallow this variant.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

fn translate(err: NetsshError) -> DriverError {
    match err {
        NetsshError::AuthenticationError(msg)
        | NetsshError::AuthError(msg) => DriverError::Auth(msg),
        NetsshError::AuthenticationFailed { username, source } => {
            DriverError::Auth(format!("authentication failed for {username}: {source}"))
        }
        NetsshError::TimeoutError(msg) => DriverError::Timeout(msg),
        NetsshError::Timeout { action } => DriverError::Timeout(action),
        NetsshError::ConnectionError(msg) => DriverError::Transport(msg),
        NetsshError::ConnectionFailed { addr, source } => {
            DriverError::Transport(format!("failed to connect to {addr}: {source}"))
        }
        NetsshError::SshError(e) => DriverError::Transport(e.to_string()),
        NetsshError::SshErrorNew(msg) => DriverError::Transport(msg),
        NetsshError::SshHandshakeFailed { source } => {
            DriverError::Transport(format!("ssh handshake failed: {source}"))
        }
        NetsshError::ChannelError(msg) => DriverError::Transport(msg),
        NetsshError::ChannelFailed { message, source } => DriverError::Transport(match source {
            Some(s) => format!("{message}: {s}"),
            None => message,
        }),
        NetsshError::DisconnectError(msg) => DriverError::Transport(msg),
        NetsshError::IoError(e) => DriverError::Transport(e.to_string()),
        NetsshError::ReadError(msg) => DriverError::Transport(msg),
        NetsshError::WriteError(msg) => DriverError::Transport(msg),
        NetsshError::PromptError(msg) => DriverError::Transport(msg),
        NetsshError::PatternError(msg) => DriverError::Transport(msg),
        NetsshError::UnsupportedDevice(msg) => DriverError::Unsupported(msg),
        NetsshError::UnsupportedOperation(msg) => DriverError::Unsupported(msg),
        other => DriverError::Transport(other.to_string()),
    }
}

/// A single SSH session against one device. Mocked in worker-loop tests so
/// the failure-taxonomy routing can be exercised without a live device.
#[cfg_attr(test, automock)]
pub trait Driver: Send {
    fn connect(&mut self) -> Result<(), DriverError>;
    fn send_command(&mut self, command: &str) -> Result<String, DriverError>;
    fn send_config_set(&mut self, commands: Vec<String>) -> Result<String, DriverError>;
    fn save_config(&mut self) -> Result<(), DriverError>;
    fn commit(&mut self) -> Result<(), DriverError>;
    fn disconnect(&mut self) -> Result<(), DriverError>;
}

/// Real driver backed by [`naas_driver`].
pub struct NetsshDriver {
    inner: Box<dyn NetworkDeviceConnection + Send>,
}

impl NetsshDriver {
    /// Autodetects/creates the underlying connection and opens the session.
    /// Blocking — call from within `spawn_blocking`.
    pub fn connect_device(config: DeviceConfig) -> Result<Self, DriverError> {
        let inner = DeviceFactory::create_device(&config).map_err(translate)?;
        Ok(Self { inner })
    }
}

impl Driver for NetsshDriver {
    fn connect(&mut self) -> Result<(), DriverError> {
        self.inner.connect().map_err(translate)
    }

    fn send_command(&mut self, command: &str) -> Result<String, DriverError> {
        self.inner
            .send_command_internal(command, None, None, None, None, None, None, None)
            .map_err(translate)
    }

    fn send_config_set(&mut self, commands: Vec<String>) -> Result<String, DriverError> {
        self.inner
            .send_config_set_internal(
                commands, None, None, None, None, None, None, None, None, None, None, None,
            )
            .map_err(translate)
    }

    fn save_config(&mut self) -> Result<(), DriverError> {
        self.inner.save_configuration().map_err(translate)
    }

    /// `naas_driver`'s connection trait has no candidate-commit workflow;
    /// this always reports unsupported so callers fall back to save_config.
    fn commit(&mut self) -> Result<(), DriverError> {
        Err(DriverError::Unsupported(
            "commit is not implemented by the underlying driver".to_string(),
        ))
    }

    fn disconnect(&mut self) -> Result<(), DriverError> {
        self.inner.close().map_err(translate)
    }
}
