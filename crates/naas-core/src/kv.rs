//! C1: the shared KV store. Durable scratch memory for lockout windows,
//! circuit-breaker state, ownership hashes, job records, and the
//! credential salt. Every other component in this crate addresses it
//! through the [`KvStore`] trait rather than talking to Redis directly,
//! so unit tests can substitute [`InMemoryKv`].

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Abstraction over the Redis-shaped operations the rest of the core
/// needs: strings with optional TTL and set-if-not-exists, sorted sets
/// for the lockout windows, and hashes for circuit-breaker state.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Set `key` to `value` only if absent. Returns `true` if this call
    /// performed the write.
    async fn set_nx(&self, key: &str, value: &str) -> Result<bool>;
    async fn del(&self, key: &str) -> Result<()>;
    /// Set a TTL on an existing key; a no-op if the key is absent.
    async fn expire(&self, key: &str, ttl_seconds: i64) -> Result<()>;

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()>;
    async fn hincrby(&self, key: &str, field: &str, delta: i64) -> Result<i64>;
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;

    /// Atomically prune sorted-set members with score `<= max_score`,
    /// optionally add one new member at `new_score`, refresh the key's
    /// TTL to `ttl_seconds` when a member remains, then return the
    /// resulting cardinality. This is the single primitive C3 needs;
    /// bundling prune+add+count in one round trip is what keeps a
    /// concurrent prune from erasing a failure recorded just after it.
    async fn prune_add_count(
        &self,
        key: &str,
        max_score: f64,
        new_member: Option<(&str, f64)>,
        ttl_seconds: i64,
    ) -> Result<u64>;

    /// Liveness probe for the healthcheck endpoint.
    async fn ping(&self) -> bool;

    /// Add `member` to the sorted set `key` at `score`, used by C5 for
    /// the four job registries (queued/started/finished/failed).
    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<()>;
    /// Remove `member` from sorted set `key`.
    async fn zrem(&self, key: &str, member: &str) -> Result<()>;
    /// Cardinality of sorted set `key`.
    async fn zcard(&self, key: &str) -> Result<u64>;
    /// Members of `key` in ascending score order, `offset`-based,
    /// capped at `length`.
    async fn zrange(&self, key: &str, offset: u64, length: u64) -> Result<Vec<String>>;
}

/// Redis-backed implementation used by `naas-server` and `naas-worker`.
pub struct RedisKv {
    manager: redis::aio::ConnectionManager,
}

impl RedisKv {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(Error::from)?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(Error::from)?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl KvStore for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }

    async fn set_nx(&self, key: &str, value: &str) -> Result<bool> {
        let mut conn = self.manager.clone();
        let set: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Error::from)?;
        Ok(set.is_some())
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }

    async fn expire(&self, key: &str, ttl_seconds: i64) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = redis::cmd("HGET")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)?;
        Ok(value)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("HSET")
            .arg(key)
            .arg(field)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }

    async fn hincrby(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        let mut conn = self.manager.clone();
        redis::cmd("HINCRBY")
            .arg(key)
            .arg(field)
            .arg(delta)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut conn = self.manager.clone();
        let map: HashMap<String, String> = redis::cmd("HGETALL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)?;
        Ok(map)
    }

    async fn prune_add_count(
        &self,
        key: &str,
        max_score: f64,
        new_member: Option<(&str, f64)>,
        ttl_seconds: i64,
    ) -> Result<u64> {
        let mut conn = self.manager.clone();
        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.cmd("ZREMRANGEBYSCORE").arg(key).arg("-inf").arg(max_score).ignore();
        if let Some((member, score)) = new_member {
            pipe.cmd("ZADD").arg(key).arg(score).arg(member).ignore();
            pipe.cmd("EXPIRE").arg(key).arg(ttl_seconds).ignore();
        }
        pipe.cmd("ZCARD").arg(key);

        let (count,): (u64,) = pipe.query_async(&mut conn).await.map_err(Error::from)?;
        Ok(count)
    }

    async fn ping(&self) -> bool {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .is_ok()
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("ZADD")
            .arg(key)
            .arg(score)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("ZREM")
            .arg(key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }

    async fn zcard(&self, key: &str) -> Result<u64> {
        let mut conn = self.manager.clone();
        redis::cmd("ZCARD")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }

    async fn zrange(&self, key: &str, offset: u64, length: u64) -> Result<Vec<String>> {
        let mut conn = self.manager.clone();
        let stop = offset + length.saturating_sub(1);
        redis::cmd("ZRANGE")
            .arg(key)
            .arg(offset)
            .arg(stop)
            .query_async(&mut conn)
            .await
            .map_err(Error::from)
    }
}

/// In-memory stand-in for [`KvStore`], used by unit tests so C2-C5 logic
/// can be exercised without a live Redis.
#[derive(Default)]
pub struct InMemoryKv {
    strings: Mutex<HashMap<String, String>>,
    hashes: Mutex<HashMap<String, HashMap<String, String>>>,
    sorted_sets: Mutex<HashMap<String, BTreeMap<String, f64>>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper mirroring the Python fixtures' direct `zadd` seeding.
    pub fn seed_zset(&self, key: &str, member: &str, score: f64) {
        self.sorted_sets
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
    }
}

#[async_trait]
impl KvStore for InMemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.strings.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.strings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str) -> Result<bool> {
        let mut map = self.strings.lock().unwrap();
        if map.contains_key(key) {
            Ok(false)
        } else {
            map.insert(key.to_string(), value.to_string());
            Ok(true)
        }
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.strings.lock().unwrap().remove(key);
        self.hashes.lock().unwrap().remove(key);
        self.sorted_sets.lock().unwrap().remove(key);
        Ok(())
    }

    async fn expire(&self, _key: &str, _ttl_seconds: i64) -> Result<()> {
        // The in-memory fake has no eviction clock; tests assert TTL
        // values are passed through, not that keys actually expire.
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        Ok(self
            .hashes
            .lock()
            .unwrap()
            .get(key)
            .and_then(|h| h.get(field).cloned()))
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        self.hashes
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hincrby(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        let mut hashes = self.hashes.lock().unwrap();
        let entry = hashes.entry(key.to_string()).or_default();
        let current: i64 = entry
            .get(field)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let updated = current + delta;
        entry.insert(field.to_string(), updated.to_string());
        Ok(updated)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .hashes
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn prune_add_count(
        &self,
        key: &str,
        max_score: f64,
        new_member: Option<(&str, f64)>,
        _ttl_seconds: i64,
    ) -> Result<u64> {
        let mut sets = self.sorted_sets.lock().unwrap();
        let set = sets.entry(key.to_string()).or_default();
        set.retain(|_, score| *score > max_score);
        if let Some((member, score)) = new_member {
            set.insert(member.to_string(), score);
        }
        Ok(set.len() as u64)
    }

    async fn ping(&self) -> bool {
        true
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<()> {
        self.sorted_sets
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<()> {
        if let Some(set) = self.sorted_sets.lock().unwrap().get_mut(key) {
            set.remove(member);
        }
        Ok(())
    }

    async fn zcard(&self, key: &str) -> Result<u64> {
        Ok(self
            .sorted_sets
            .lock()
            .unwrap()
            .get(key)
            .map(|s| s.len())
            .unwrap_or(0) as u64)
    }

    async fn zrange(&self, key: &str, offset: u64, length: u64) -> Result<Vec<String>> {
        let sets = self.sorted_sets.lock().unwrap();
        let Some(set) = sets.get(key) else {
            return Ok(Vec::new());
        };
        let mut members: Vec<(&f64, &String)> = set.iter().map(|(m, s)| (s, m)).collect();
        members.sort_by(|a, b| a.0.partial_cmp(b.0).unwrap());
        Ok(members
            .into_iter()
            .skip(offset as usize)
            .take(length as usize)
            .map(|(_, m)| m.clone())
            .collect())
    }
}
