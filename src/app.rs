//! Chat application driver
//!
//! [`ChatApp`] ties the [`Controller`] to the outside world: it keeps the
//! current [`Route`], applies navigation effects to it, and sends requests
//! through a [`ChatBackend`], feeding each outcome back into the controller.
//!
//! Dispatching is split in two so a front end can redraw between the user
//! turn and the reply: [`ChatApp::dispatch`] applies an event and hands back
//! the requests it produced, [`ChatApp::fulfil`] sends one and applies the
//! reply.

use crate::backend::ChatBackend;
use crate::controller::{
    Clock, Controller, Effect, Event, PendingRequest, ReplyOutcome, Route, SystemClock,
};

/// Controller plus router plus backend
pub struct ChatApp<B: ChatBackend, C: Clock = SystemClock> {
    controller: Controller<C>,
    backend: B,
    route: Route,
}

impl<B: ChatBackend, C: Clock> ChatApp<B, C> {
    /// Create a driver; the route starts at home until [`ChatApp::open`] is called
    pub fn new(controller: Controller<C>, backend: B) -> Self {
        Self {
            controller,
            backend,
            route: Route::Home,
        }
    }

    /// Navigate from outside (startup or explicit navigation)
    pub fn open(&mut self, route: Route) -> Vec<PendingRequest> {
        tracing::debug!("Opening route {}", route);
        self.route = route.clone();
        self.dispatch(Event::RouteChanged(route))
    }

    /// Apply an event, returning requests that still have to be sent
    pub fn dispatch(&mut self, event: Event) -> Vec<PendingRequest> {
        let effects = self.controller.handle(event);
        self.apply(effects)
    }

    /// Send one request and apply its outcome
    ///
    /// Backend failures are not errors here; they become
    /// [`ReplyOutcome::Failed`] and the controller records the fixed error
    /// reply.
    pub async fn fulfil(&mut self, pending: PendingRequest) -> Vec<PendingRequest> {
        let outcome = match self.backend.reply(&pending.request).await {
            Ok(text) => ReplyOutcome::Reply(text),
            Err(e) => ReplyOutcome::Failed(e.to_string()),
        };

        self.dispatch(Event::ReplyReceived {
            session: pending.session,
            outcome,
        })
    }

    /// Apply an event and send every request it leads to
    pub async fn dispatch_and_wait(&mut self, event: Event) {
        let mut queue = self.dispatch(event);
        while let Some(pending) = queue.pop() {
            let more = self.fulfil(pending).await;
            queue.extend(more);
        }
    }

    /// Current route
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The state machine
    pub fn controller(&self) -> &Controller<C> {
        &self.controller
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Vec<PendingRequest> {
        let mut requests = Vec::new();
        for effect in effects {
            match effect {
                Effect::Navigate(route) => {
                    tracing::debug!("Navigating to {}", route);
                    self.route = route;
                }
                Effect::Request(pending) => requests.push(pending),
            }
        }
        requests
    }
}
