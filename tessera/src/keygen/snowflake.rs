//! Snowflake-style 64-bit (i64) key generator.
//!
//! Relies on 2 invariants:
//!
//! 1. Each deployment sharing a key space must have a unique, numeric
//!    `node_id`, not exceeding 1023.
//! 2. Each deployment has a reasonably accurate and synchronized clock,
//!    so `std::time::SystemTime` returns a good value.

use std::collections::HashMap;
use std::thread::sleep;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use super::{Error, Key, KeyGenerator};

const NODE_BITS: u64 = 10; // Max 1023 nodes
const SEQUENCE_BITS: u64 = 12;
const MAX_NODE_ID: u64 = (1 << NODE_BITS) - 1; // 1023
const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1; // 4095
const MAX_TIMESTAMP: u64 = (1 << 41) - 1; // 41 bits = ~69 years, keeps i64 sign bit clear
const EPOCH: u64 = 1704067200000; // Monday, January 1, 2024 00:00:00 GMT
const NODE_SHIFT: u8 = SEQUENCE_BITS as u8; // 12
const TIMESTAMP_SHIFT: u8 = (SEQUENCE_BITS + NODE_BITS) as u8; // 22

#[derive(Debug, Default)]
struct State {
    last_timestamp_ms: u64,
    sequence: u64,
}

#[derive(Debug, Default)]
pub struct Snowflake {
    node_id: u64,
    state: Mutex<State>,
}

impl Snowflake {
    pub fn new(node_id: u64) -> Result<Self, Error> {
        if node_id > MAX_NODE_ID {
            return Err(Error::InvalidNodeId(node_id.to_string()));
        }
        Ok(Self {
            node_id,
            state: Mutex::new(State::default()),
        })
    }

    pub(crate) fn from_properties(properties: &HashMap<String, String>) -> Result<Self, Error> {
        match properties.get("node_id") {
            Some(value) => {
                let node_id = value
                    .parse()
                    .map_err(|_| Error::InvalidNodeId(value.clone()))?;
                Self::new(node_id)
            }
            None => Self::new(0),
        }
    }
}

impl KeyGenerator for Snowflake {
    fn next_key(&self) -> Result<Key, Error> {
        let mut state = self.state.lock();
        let mut now = wait_until(state.last_timestamp_ms);

        if now == state.last_timestamp_ms {
            state.sequence = (state.sequence + 1) & MAX_SEQUENCE;
            // Wraparound.
            if state.sequence == 0 {
                now = wait_until(now + 1);
            }
        } else {
            // Reset sequence to zero once we reach the next ms.
            state.sequence = 0;
        }
        state.last_timestamp_ms = now;

        let elapsed = now.saturating_sub(EPOCH);
        if elapsed > MAX_TIMESTAMP {
            return Err(Error::ClockOverflow);
        }

        let key = ((elapsed & MAX_TIMESTAMP) << TIMESTAMP_SHIFT)
            | (self.node_id << NODE_SHIFT)
            | state.sequence;
        Ok(Key::Number(key as i64))
    }
}

// Get current time in ms.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// Get a monotonically increasing timestamp in ms.
// Protects against clock drift.
fn wait_until(target_ms: u64) -> u64 {
    loop {
        let now = now_ms();
        if now >= target_ms {
            return now;
        }
        sleep(Duration::from_millis(1));
    }
}
