use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::*;

/// Fixed storage key of a persisted type.
pub trait StorageKey {
    const KEY: &'static str;
}

/// Key-value string storage the engine persists into.
pub trait StateStore {
    /// Whether a storage medium is present at all, e.g. `false` outside a browser.
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), StoreError>;

    fn remove(&mut self, key: &str);
}

/// In-memory store, used for native play and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Store for contexts without any persistent medium, every save is dropped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NullStore;

impl StateStore for NullStore {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: String) -> core::result::Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn remove(&mut self, _key: &str) {}
}

/// Obfuscates stored text, this is not a security or integrity measure.
pub fn encode(text: &str) -> String {
    STANDARD.encode(text)
}

pub fn decode(text: &str) -> Result<String> {
    let bytes = STANDARD.decode(text).map_err(|_| GameError::Decode)?;
    String::from_utf8(bytes).map_err(|_| GameError::Decode)
}

/// Writes `state` under `key`. Never fails, problems are only logged.
pub fn save_game_state<S: StateStore + ?Sized>(store: &mut S, key: &str, state: &GameState) {
    if !store.is_available() {
        log::debug!("No storage available, skipping save of {}", key);
        return;
    }

    let json = match serde_json::to_string(state) {
        Ok(json) => json,
        Err(err) => {
            log::error!("Could not serialize game state: {}", err);
            return;
        }
    };

    if let Err(err) = store.set(key, encode(&json)) {
        log::error!("Could not save game to storage: {}", err);
    }
}

/// Reads the state under `key`, any missing or unreadable record is a miss.
pub fn load_game_state<S: StateStore + ?Sized>(store: &S, key: &str) -> Option<GameState> {
    if !store.is_available() {
        return None;
    }

    let raw = store.get(key)?;
    let json = decode(&raw)
        .inspect_err(|err| log::warn!("Ignoring stored {}: {}", key, err))
        .ok()?;
    serde_json::from_str(&json)
        .inspect_err(|err| log::warn!("Ignoring stored {}: {}", key, err))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample_state() -> GameState {
        let mut state = GameState::from_ranks(&[[1, 0, 0], [0, 3, 0], [2, 2, 10]]);
        state.score = 1040;
        state.high_score = 2048;
        state.is_game_won = true;
        state.move_count = 37;
        if let Some(tile) = state.grid[1][1].as_mut() {
            tile.merged_this_turn = true;
        }
        state
    }

    #[test]
    fn encode_is_reversible() {
        let text = r#"{"score":12}"#;

        assert_eq!(encode(text), "eyJzY29yZSI6MTJ9");
        assert_eq!(decode(&encode(text)).unwrap(), text);
        assert_eq!(decode("not base64!"), Err(GameError::Decode));
    }

    #[test]
    fn save_then_load_reproduces_state() {
        let mut store = MemoryStore::new();
        let state = sample_state();

        save_game_state(&mut store, GameState::KEY, &state);

        assert_eq!(store.len(), 1);
        assert_eq!(load_game_state(&store, GameState::KEY), Some(state));
    }

    #[test]
    fn stored_record_is_encoded_json() {
        let mut store = MemoryStore::new();
        let state = GameState::from_ranks(&[[1, 0], [0, 0]]);

        save_game_state(&mut store, "key", &state);

        let raw = store.get("key").unwrap();
        let json = decode(&raw).unwrap();
        assert!(json.starts_with(r#"{"grid":[[{"value":1,"row":0,"column":0"#));
        assert!(json.contains(r#""highScore":0"#));
        assert!(json.contains(r#""isGameOver":false"#));
        assert!(json.contains(r#""moveCount":0"#));
    }

    #[test]
    fn missing_or_corrupt_records_are_a_miss() {
        let mut store = MemoryStore::new();
        assert_eq!(load_game_state(&store, "key"), None);

        store.set("key", "%%%".into()).unwrap();
        assert_eq!(load_game_state(&store, "key"), None);

        store.set("key", encode("{\"grid\": 3}")).unwrap();
        assert_eq!(load_game_state(&store, "key"), None);

        store.set("key", STANDARD.encode(vec![0xff, 0xfe])).unwrap();
        assert_eq!(load_game_state(&store, "key"), None);
    }

    #[test]
    fn unavailable_store_is_a_silent_no_op() {
        let mut store = NullStore;

        save_game_state(&mut store, GameState::KEY, &sample_state());

        assert_eq!(load_game_state(&store, GameState::KEY), None);
    }
}
