//! Authentication challenge store.
//!
//! Wallet signature verification is an external collaborator; the service
//! only issues the challenge nonce a wallet signs and holds it until the
//! verification callback consumes it. The store is explicitly TTL-bounded:
//! expired entries are purged on every access, so outstanding challenges
//! can never grow into an unbounded process-wide map.

use std::collections::HashMap;
use std::sync::Mutex;

use rand::RngCore;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Challenge {
    pub value: String,
    pub expires_at: u64,
}

#[derive(Debug)]
pub struct ChallengeStore {
    ttl_secs: u64,
    entries: Mutex<HashMap<String, Challenge>>,
}

impl ChallengeStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a fresh challenge for `public_key`, replacing any outstanding
    /// one for the same key.
    pub fn issue(&self, public_key: &str, now: u64) -> Challenge {
        let mut nonce = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce);

        let challenge = Challenge {
            value: hex::encode(nonce),
            expires_at: now + self.ttl_secs,
        };

        let mut entries = self.entries.lock().expect("challenge lock poisoned");
        entries.retain(|_, c| c.expires_at > now);
        entries.insert(public_key.to_string(), challenge.clone());
        challenge
    }

    /// Consume the outstanding challenge for `public_key` if it matches and
    /// has not expired. A challenge can be consumed at most once.
    pub fn consume(&self, public_key: &str, value: &str, now: u64) -> bool {
        let mut entries = self.entries.lock().expect("challenge lock poisoned");
        entries.retain(|_, c| c.expires_at > now);

        match entries.get(public_key) {
            Some(c) if c.value == value => {
                entries.remove(public_key);
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}
