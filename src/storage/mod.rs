//! Session collection storage
//!
//! [`SessionStore`] owns the ordered session collection and mirrors it to a
//! [`KeyValueStore`] after every change. The whole collection is written as
//! one JSON array under [`SESSIONS_KEY`]; [`LEGACY_TRANSCRIPT_KEY`] held the
//! single transcript of older versions and is only ever cleared.
//!
//! Writes are best-effort: a failed write is logged and the in-memory
//! collection stays authoritative. The next successful write catches up.

use crate::error::{NovaError, Result};
use crate::session::{ChatSession, ChatTurn, SessionId, SessionSummary};

pub mod backend;
pub use backend::{default_storage_path, KeyValueStore, MemoryStorage, SledStorage};

/// Key holding the serialized session collection
pub const SESSIONS_KEY: &str = "allChatSessions";

/// Key of the legacy single-transcript history
pub const LEGACY_TRANSCRIPT_KEY: &str = "chatMessages";

/// Owned, persisted collection of chat sessions
///
/// # Examples
///
/// ```
/// use nova_scribe::storage::{MemoryStorage, SessionStore};
///
/// let store = SessionStore::load(Box::new(MemoryStorage::new()));
/// assert!(store.is_empty());
/// ```
pub struct SessionStore {
    backend: Box<dyn KeyValueStore>,
    sessions: Vec<ChatSession>,
}

impl SessionStore {
    /// Load the collection from a backend
    ///
    /// Missing, unreadable or malformed data is treated as "no sessions".
    pub fn load(backend: Box<dyn KeyValueStore>) -> Self {
        let sessions = match backend.get(SESSIONS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ChatSession>>(&raw) {
                Ok(sessions) => sessions,
                Err(e) => {
                    tracing::warn!("Ignoring malformed session collection: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read session collection: {}", e);
                Vec::new()
            }
        };

        tracing::debug!("Loaded {} chat sessions", sessions.len());

        Self { backend, sessions }
    }

    /// All sessions in collection order
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Number of sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if there are no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// First session in collection order
    pub fn first(&self) -> Option<&ChatSession> {
        self.sessions.first()
    }

    /// Look up a session by id
    pub fn get(&self, id: SessionId) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Returns true if a session with this id exists
    pub fn contains(&self, id: SessionId) -> bool {
        self.get(id).is_some()
    }

    /// Sidebar summaries in collection order
    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.sessions.iter().map(ChatSession::summary).collect()
    }

    /// Pick an id for a new session
    ///
    /// Uses the candidate timestamp unless an existing session already has
    /// that id or a later one, in which case the id just past the largest
    /// existing one is used. If the largest id is `SessionId::MAX`, the
    /// nearest free id at or after the candidate (wrapping to below it) is
    /// used instead.
    pub fn allocate_id(&self, candidate: SessionId) -> SessionId {
        let max = match self.sessions.iter().map(|s| s.id).max() {
            Some(max) if max >= candidate => max,
            _ => return candidate,
        };

        if let Some(next) = max.checked_add(1) {
            return next;
        }

        tracing::warn!("Session id space exhausted above {}, reusing a free id", candidate);
        (candidate..=SessionId::MAX)
            .chain((SessionId::MIN..candidate).rev())
            .find(|id| !self.contains(*id))
            .unwrap_or(candidate)
    }

    /// Append a new session and persist
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Storage` if a session with the same id exists;
    /// the collection is left unchanged
    pub fn append(&mut self, session: ChatSession) -> Result<()> {
        if self.contains(session.id) {
            return Err(NovaError::Storage(format!("Duplicate session id {}", session.id)).into());
        }

        tracing::info!("Created chat session {} ({})", session.id, session.title);
        self.sessions.push(session);
        self.persist();
        Ok(())
    }

    /// Overwrite a session's transcript and persist
    ///
    /// Returns false if no session has this id.
    pub fn set_messages(&mut self, id: SessionId, messages: &[ChatTurn]) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            return false;
        };

        if session.messages.as_slice() != messages {
            session.messages = messages.to_vec();
            self.persist();
        }
        true
    }

    /// Append one turn to a session's transcript and persist
    ///
    /// Returns false if no session has this id.
    pub fn push_turn(&mut self, id: SessionId, turn: ChatTurn) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            return false;
        };

        session.messages.push(turn);
        self.persist();
        true
    }

    /// Remove a session and persist
    ///
    /// Returns the removed session, or None if no session has this id.
    pub fn remove(&mut self, id: SessionId) -> Option<ChatSession> {
        let index = self.sessions.iter().position(|s| s.id == id)?;
        let removed = self.sessions.remove(index);
        tracing::info!("Deleted chat session {}", id);
        self.persist();
        Some(removed)
    }

    /// Clear the legacy single-transcript history
    pub fn clear_legacy_transcript(&self) {
        if let Err(e) = self.backend.remove(LEGACY_TRANSCRIPT_KEY) {
            tracing::warn!("Could not clear legacy transcript: {}", e);
        }
    }

    /// Write the whole collection to the backend
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails
    pub fn try_persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.sessions)?;
        self.backend.set(SESSIONS_KEY, &raw)
    }

    /// Write the whole collection, logging instead of failing
    pub fn persist(&self) {
        if let Err(e) = self.try_persist() {
            tracing::warn!("Failed to persist chat sessions: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::session;

    fn memory_store() -> (SessionStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (SessionStore::load(Box::new(storage.clone())), storage)
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let (store, _) = memory_store();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.first().is_none());
    }

    #[test]
    fn test_load_malformed_json_is_empty() {
        let storage = MemoryStorage::with_entry(SESSIONS_KEY, "{not json");
        let store = SessionStore::load(Box::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let storage = MemoryStorage::with_entry(SESSIONS_KEY, r#"{"id":1}"#);
        let store = SessionStore::load(Box::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_persists_collection() {
        let (mut store, storage) = memory_store();
        store.append(session(1, "Hello")).unwrap();

        let reloaded = SessionStore::load(Box::new(storage));
        assert_eq!(reloaded.sessions(), store.sessions());
    }

    #[test]
    fn test_append_rejects_duplicate_id() {
        let (mut store, _) = memory_store();
        store.append(session(7, "first")).unwrap();
        assert!(store.append(session(7, "second")).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(7).unwrap().title, "first");
    }

    #[test]
    fn test_allocate_id_keeps_fresh_timestamp() {
        let (mut store, _) = memory_store();
        assert_eq!(store.allocate_id(100), 100);
        store.append(session(50, "older")).unwrap();
        assert_eq!(store.allocate_id(100), 100);
    }

    #[test]
    fn test_allocate_id_bumps_colliding_timestamp() {
        let (mut store, _) = memory_store();
        store.append(session(100, "a")).unwrap();
        assert_eq!(store.allocate_id(100), 101);
        assert_eq!(store.allocate_id(99), 101);
    }

    #[test]
    fn test_allocate_id_does_not_overflow_at_max_id() {
        let (mut store, _) = memory_store();
        store.append(session(SessionId::MAX, "max")).unwrap();
        store.append(session(1_000, "taken")).unwrap();

        let id = store.allocate_id(1_000);
        assert_eq!(id, 1_001);
        assert!(!store.contains(id));

        store.append(session(SessionId::MAX - 1, "near max")).unwrap();
        assert_eq!(store.allocate_id(SessionId::MAX - 1), SessionId::MAX - 2);
    }

    #[test]
    fn test_set_messages_overwrites_transcript() {
        let (mut store, storage) = memory_store();
        store.append(session(1, "Hello")).unwrap();

        let transcript = vec![ChatTurn::user("Hello"), ChatTurn::assistant("Hi there")];
        assert!(store.set_messages(1, &transcript));
        assert!(!store.set_messages(2, &transcript));

        let reloaded = SessionStore::load(Box::new(storage));
        assert_eq!(reloaded.get(1).unwrap().messages, transcript);
    }

    #[test]
    fn test_push_turn_appends() {
        let (mut store, _) = memory_store();
        store.append(session(1, "Hello")).unwrap();
        assert!(store.push_turn(1, ChatTurn::assistant("Hi")));
        assert!(!store.push_turn(9, ChatTurn::assistant("lost")));
        assert_eq!(store.get(1).unwrap().messages.len(), 2);
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        let (mut store, storage) = memory_store();
        store.append(session(1, "a")).unwrap();
        store.append(session(2, "b")).unwrap();
        store.append(session(3, "c")).unwrap();

        let removed = store.remove(2).unwrap();
        assert_eq!(removed.title, "b");
        assert!(store.remove(2).is_none());

        let ids: Vec<_> = SessionStore::load(Box::new(storage))
            .sessions()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_clear_legacy_transcript() {
        let storage = MemoryStorage::with_entry(LEGACY_TRANSCRIPT_KEY, "[]");
        let store = SessionStore::load(Box::new(storage.clone()));
        store.clear_legacy_transcript();
        assert_eq!(storage.get(LEGACY_TRANSCRIPT_KEY).unwrap(), None);
    }

    #[test]
    fn test_summaries_in_order() {
        let (mut store, _) = memory_store();
        store.append(session(2, "second")).unwrap();
        store.append(session(1, "first")).unwrap();
        let titles: Vec<_> = store.summaries().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }
}
