//! One-shot route parameters delivered by the navigation layer

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Resolution state of a route parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteState {
    Pending,
    Resolved(String),
    /// The sender was dropped without ever delivering a value
    Abandoned,
}

/// Sending half, held by whoever performs the navigation.
pub struct RouteSender {
    sender: Sender<String>,
}

impl RouteSender {
    /// Deliver the parameter. Returns false if the page is already gone.
    pub fn resolve(self, value: impl Into<String>) -> bool {
        self.sender.send(value.into()).is_ok()
    }
}

/// Receiving half, owned by a page controller.
///
/// The first value received is cached for the life of the page; anything
/// after that is ignored.
pub struct RouteParam {
    receiver: Option<Receiver<String>>,
    state: RouteState,
}

impl RouteParam {
    pub fn pending() -> (RouteSender, RouteParam) {
        let (sender, receiver) = channel();
        (
            RouteSender { sender },
            RouteParam {
                receiver: Some(receiver),
                state: RouteState::Pending,
            },
        )
    }

    /// Already-known parameter, e.g. restored from config. Still resolves
    /// through `poll` so controllers see a single code path.
    pub fn ready(value: impl Into<String>) -> RouteParam {
        let (sender, param) = RouteParam::pending();
        sender.resolve(value);
        param
    }

    /// Non-blocking. Returns the value only on the call that resolved it.
    pub fn poll(&mut self) -> Option<&str> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(value) => {
                self.receiver = None;
                self.state = RouteState::Resolved(value);
            }
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                self.state = RouteState::Abandoned;
                return None;
            }
        }
        self.value()
    }

    pub fn value(&self) -> Option<&str> {
        match &self.state {
            RouteState::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }
}
