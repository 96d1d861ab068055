//! C2: the credential handler. Holds a username/password/enable triple
//! as an opaque value that refuses to render its secrets, and derives a
//! deterministic salted hash used everywhere else in the system as an
//! ownership token.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::kv::KvStore;
use crate::error::Result;

const SALT_KEY: &str = "naas_cred_salt";
const SALT_LEN: usize = 10;

/// Username/password/enable triple. `enable` defaults to `password` when
/// the caller omits it. Derives `Serialize`/`Deserialize` only because it
/// must travel with the queued job record in C1 (destroyed with that
/// record); `Debug`/`Display` still redact both secrets, so nothing that
/// renders this type for logs or error messages can leak them.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
    enable: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        let enable = password.clone();
        Self {
            username: username.into(),
            password,
            enable,
        }
    }

    pub fn with_enable(
        username: impl Into<String>,
        password: impl Into<String>,
        enable: Option<String>,
    ) -> Self {
        let password = password.into();
        let enable = enable.unwrap_or_else(|| password.clone());
        Self {
            username: username.into(),
            password,
            enable,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn enable(&self) -> &str {
        &self.enable
    }

    /// SHA-512 hex digest of `username:password<salt>`, fetching the
    /// process salt from the KV store (creating it on first use if
    /// absent).
    pub async fn salted_hash(&self, kv: &dyn KvStore) -> Result<SaltedHash> {
        let salt = get_or_init_salt(kv).await?;
        Ok(self.salted_hash_with_salt(&salt))
    }

    /// Compute the hash against an explicit salt, bypassing the KV
    /// round trip. Used by tests and by callers that already hold the
    /// salt.
    pub fn salted_hash_with_salt(&self, salt: &str) -> SaltedHash {
        let pork = format!("{}:{}{}", self.username, self.password, salt);
        let digest = Sha512::digest(pork.as_bytes());
        SaltedHash(hex::encode(digest))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("enable", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials(username={}, password=<redacted>, enable=<redacted>)", self.username)
    }
}

/// 128-character hex string: the SHA-512 digest of the salted
/// credentials. Compared in constant time since it doubles as an
/// ownership token for job reads/cancellation. Unlike [`Credentials`]
/// this is safe to persist and serialize: it is a one-way hash, not a
/// secret itself.
#[derive(Clone, Eq, Debug, Serialize, Deserialize)]
pub struct SaltedHash(String);

impl SaltedHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_hex(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl fmt::Display for SaltedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for SaltedHash {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

/// Fetch the process salt from the KV store, creating a fresh
/// 10-lowercase-letter salt under a set-if-not-exists write when absent.
/// This must never be an unconditional overwrite: workers and API pods
/// that race to initialize it must converge on the same value.
pub async fn get_or_init_salt(kv: &dyn KvStore) -> Result<String> {
    if let Some(existing) = kv.get(SALT_KEY).await? {
        return Ok(existing);
    }

    let candidate = random_lowercase_salt();
    kv.set_nx(SALT_KEY, &candidate).await?;

    // Someone else may have won the race; re-read so every caller
    // observes the one salt that was actually persisted.
    Ok(kv
        .get(SALT_KEY)
        .await?
        .unwrap_or(candidate))
}

fn random_lowercase_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LEN)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}
