//! Session synchronisation state machine
//!
//! The [`Controller`] owns the four pieces of state that have to agree with
//! each other: the current [`Route`], the active session id, the in-memory
//! transcript and the persisted [`SessionStore`]. It is driven by three event
//! sources, all funnelled through [`Controller::handle`]:
//!
//! - route changes ([`Event::RouteChanged`])
//! - user actions ([`Event::Submit`], [`Event::NewChat`], [`Event::Start`],
//!   [`Event::Select`], [`Event::Delete`])
//! - network completion ([`Event::ReplyReceived`])
//!
//! Transitions never perform I/O other than persisting the store. Anything
//! the outside world has to do is returned as an [`Effect`]. Navigation the
//! controller asks for is applied to the router by the driver and is not fed
//! back in as a route change, so a collection update can never re-trigger
//! route synchronisation.

use crate::backend::ChatRequest;
use crate::session::{ChatSession, ChatTurn, SessionId, SessionSummary};
use crate::storage::SessionStore;
use chrono::{DateTime, Local};

pub mod route;

pub use route::Route;

/// Assistant turn appended when no reply could be obtained
pub const ASSISTANT_ERROR_REPLY: &str = "Error: Could not get a response from the AI.";

/// Source of creation timestamps for new sessions
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Coarse state of the chat view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No active session: welcome screen or a fresh chat
    Empty,
    /// A request for this session is outstanding
    Loading(SessionId),
    /// This session is displayed and idle
    Active(SessionId),
}

/// Outcome of a chat request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The endpoint answered with this text
    Reply(String),
    /// No reply could be obtained; the reason is only logged
    Failed(String),
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The route was changed from outside (startup, explicit navigation)
    RouteChanged(Route),
    /// The user submitted a line of text
    Submit(String),
    /// The user asked for a new chat
    NewChat,
    /// The user dismissed the welcome screen without sending anything
    Start,
    /// The user picked a session from the sidebar
    Select(SessionId),
    /// The user deleted a session from the sidebar
    Delete(SessionId),
    /// A request issued for `session` settled
    ReplyReceived {
        /// Session the request was issued for
        session: SessionId,
        /// What came back
        outcome: ReplyOutcome,
    },
}

/// A request the driver has to send on the controller's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Session the reply belongs to
    pub session: SessionId,
    /// Body to post
    pub request: ChatRequest,
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Point the router at this route without re-entering the controller
    Navigate(Route),
    /// Send this request and report back with [`Event::ReplyReceived`]
    Request(PendingRequest),
}

/// Owner of the chat view state
///
/// # Examples
///
/// ```
/// use nova_scribe::controller::{Controller, Effect, Event, Phase};
/// use nova_scribe::storage::{MemoryStorage, SessionStore};
///
/// let store = SessionStore::load(Box::new(MemoryStorage::new()));
/// let mut controller = Controller::new(store);
///
/// let effects = controller.handle(Event::Submit("Hello".to_string()));
/// assert!(matches!(effects[0], Effect::Navigate(_)));
/// assert!(matches!(effects[1], Effect::Request(_)));
/// assert!(matches!(controller.phase(), Phase::Loading(_)));
/// ```
pub struct Controller<C: Clock = SystemClock> {
    store: SessionStore,
    transcript: Vec<ChatTurn>,
    active: Option<SessionId>,
    pending: Option<SessionId>,
    started: bool,
    clock: C,
}

impl Controller<SystemClock> {
    /// Create a controller using the wall clock
    pub fn new(store: SessionStore) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> Controller<C> {
    /// Create a controller with a custom clock
    pub fn with_clock(store: SessionStore, clock: C) -> Self {
        Self {
            store,
            transcript: Vec::new(),
            active: None,
            pending: None,
            started: false,
            clock,
        }
    }

    /// Apply one event and return the effects it requires
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::RouteChanged(route) => self.on_route_changed(&route),
            Event::Submit(text) => self.on_submit(&text),
            Event::NewChat => {
                self.new_chat();
                Vec::new()
            }
            Event::Start => {
                self.started = true;
                Vec::new()
            }
            Event::Select(id) => self.on_select(id),
            Event::Delete(id) => {
                self.on_delete(id);
                Vec::new()
            }
            Event::ReplyReceived { session, outcome } => self.on_reply(session, outcome),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        match (self.pending, self.active) {
            (Some(id), _) => Phase::Loading(id),
            (None, Some(id)) => Phase::Active(id),
            (None, None) => Phase::Empty,
        }
    }

    /// Transcript currently displayed
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Id of the active session
    pub fn active_session(&self) -> Option<SessionId> {
        self.active
    }

    /// True while a request is outstanding
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// False while the welcome screen should be shown
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The session collection
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Sidebar rows
    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.store.summaries()
    }

    fn on_route_changed(&mut self, route: &Route) -> Vec<Effect> {
        match route {
            Route::Home => match self.store.first().map(|s| s.id) {
                Some(first) => {
                    self.activate(first);
                    vec![Effect::Navigate(Route::session(first))]
                }
                None => {
                    self.reset_view();
                    Vec::new()
                }
            },
            Route::Chat(_) => {
                match route.session_id().filter(|id| self.store.contains(*id)) {
                    Some(id) => self.activate(id),
                    None => {
                        tracing::debug!("Route {} names no stored session, starting new chat", route);
                        self.new_chat();
                    }
                }
                Vec::new()
            }
        }
    }

    fn on_submit(&mut self, text: &str) -> Vec<Effect> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Vec::new();
        }

        if let Some(session) = self.pending {
            tracing::debug!("Ignoring submission while session {} is loading", session);
            return Vec::new();
        }

        self.started = true;
        self.transcript.push(ChatTurn::user(prompt));
        let history = self.transcript.clone();
        let mut effects = self.commit_transcript();

        let Some(session) = self.active else {
            return effects;
        };

        self.pending = Some(session);
        effects.push(Effect::Request(PendingRequest {
            session,
            request: ChatRequest::new(prompt, history),
        }));
        effects
    }

    fn on_select(&mut self, id: SessionId) -> Vec<Effect> {
        if !self.store.contains(id) {
            tracing::warn!("Cannot select unknown session {}", id);
            return Vec::new();
        }

        self.activate(id);
        vec![Effect::Navigate(Route::session(id))]
    }

    fn on_delete(&mut self, id: SessionId) {
        if self.store.remove(id).is_none() {
            tracing::debug!("Delete of unknown session {} ignored", id);
            return;
        }

        if self.active == Some(id) {
            self.new_chat();
        }
    }

    fn on_reply(&mut self, session: SessionId, outcome: ReplyOutcome) -> Vec<Effect> {
        if self.pending == Some(session) {
            self.pending = None;
        }

        let turn = match outcome {
            ReplyOutcome::Reply(text) => ChatTurn::assistant(text),
            ReplyOutcome::Failed(reason) => {
                tracing::debug!("Chat request for session {} failed: {}", session, reason);
                ChatTurn::assistant(ASSISTANT_ERROR_REPLY)
            }
        };

        if self.active == Some(session) {
            self.transcript.push(turn);
            return self.commit_transcript();
        }

        if !self.store.push_turn(session, turn) {
            tracing::debug!("Session {} is gone, dropping its reply", session);
        }
        Vec::new()
    }

    /// Mirror the transcript into the collection, creating a session for a
    /// non-empty transcript that has none yet
    fn commit_transcript(&mut self) -> Vec<Effect> {
        if let Some(id) = self.active {
            if !self.store.set_messages(id, &self.transcript) {
                tracing::warn!("Active session {} is missing from the collection", id);
            }
            return Vec::new();
        }

        if self.transcript.is_empty() {
            return Vec::new();
        }

        let now = self.clock.now();
        let id = self.store.allocate_id(now.timestamp_millis());
        let session = ChatSession::from_transcript(id, &now, self.transcript.clone());
        if let Err(e) = self.store.append(session) {
            tracing::warn!("Could not record new session {}: {}", id, e);
        }

        self.active = Some(id);
        vec![Effect::Navigate(Route::session(id))]
    }

    fn activate(&mut self, id: SessionId) {
        let messages = self
            .store
            .get(id)
            .map(|s| s.messages.clone())
            .unwrap_or_default();

        self.started = !messages.is_empty();
        self.transcript = messages;
        self.active = Some(id);
    }

    fn reset_view(&mut self) {
        self.transcript.clear();
        self.started = false;
        self.active = None;
    }

    fn new_chat(&mut self) {
        self.reset_view();
        self.store.clear_legacy_transcript();
    }
}
