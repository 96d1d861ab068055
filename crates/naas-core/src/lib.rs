//! Shared-state core of NAAS: the KV abstraction, the credential
//! handler, the two lockout axes, the per-device circuit breaker, the
//! job queue, validation, audit events, and metrics. Both `naas-server`
//! and `naas-worker` link this crate so their view of keys, TTLs, and
//! thresholds never drifts apart.

pub mod audit;
pub mod breaker;
pub mod credentials;
pub mod error;
pub mod kv;
pub mod lockout;
pub mod metrics;
pub mod models;
pub mod queue;
pub mod validation;

pub use credentials::{Credentials, SaltedHash};
pub use error::{Error, Result};
pub use kv::{InMemoryKv, KvStore, RedisKv};
pub use models::{CommandJob, ConfigJob, Job, JobPayload, JobState};
