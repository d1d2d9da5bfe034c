use std::time::Duration;

use redis::{Client, Commands, Connection};

use super::{KeyValueStore, StorageError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis-backed store using the blocking connection API.
///
/// A connection is opened per call with bounded connect, read and write
/// times. Callers run it on the blocking pool.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn open(url: &str) -> Result<Self, StorageError> {
        Ok(Self {
            client: Client::open(url)?,
        })
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        let conn = self.client.get_connection_with_timeout(CONNECT_TIMEOUT)?;
        conn.set_read_timeout(Some(IO_TIMEOUT))?;
        conn.set_write_timeout(Some(IO_TIMEOUT))?;
        Ok(conn)
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.connect()?;
        let value: Option<String> = conn.get(key)?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.connect()?;
        conn.set::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.connect()?;
        conn.del::<_, ()>(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_malformed_url() {
        assert!(RedisStore::open("not a url").is_err());
    }

    #[test]
    fn test_open_does_not_connect_eagerly() {
        // Client::open only parses; nothing listens on this port.
        assert!(RedisStore::open("redis://127.0.0.1:1/").is_ok());
    }

    #[test]
    fn test_unreachable_server_fails_fast() {
        let store = RedisStore::open("redis://127.0.0.1:1/").unwrap();
        let started = std::time::Instant::now();
        assert!(store.get("k").is_err());
        assert!(started.elapsed() <= CONNECT_TIMEOUT + Duration::from_secs(1));
    }
}
