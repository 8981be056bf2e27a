//! Seam between the controller and the single audio output.
//!
//! The controller drives a [`MediaHandle`] imperatively and receives the
//! element's signals as [`MediaEvent`]s. Listeners are registered through
//! [`MediaSignals::subscribe`] and stay registered exactly as long as the
//! returned [`Subscription`] is alive.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Current position in seconds (`timeupdate`).
    TimeUpdate(f64),
    /// Duration in seconds became known (`loadedmetadata`).
    MetadataLoaded(f64),
    Ended,
    Error(String),
}

pub trait MediaHandle {
    fn set_source(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_position(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f64);
}

pub type MediaListener = Rc<dyn Fn(MediaEvent)>;

pub trait MediaSignals {
    fn subscribe(&self, listener: MediaListener) -> Subscription;
}

/// Registration token; dropping it unregisters the listener.
#[must_use = "dropping a Subscription unregisters its listener immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Combines several registrations into one token.
    pub fn all(subscriptions: Vec<Subscription>) -> Self {
        Self::new(move || drop(subscriptions))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[derive(Default)]
struct HubListeners {
    next_id: u64,
    listeners: Vec<(u64, MediaListener)>,
}

/// In-process signal source for hosts without a DOM element.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubListeners>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every listener in registration order.
    pub fn emit(&self, event: MediaEvent) {
        let listeners: Vec<MediaListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl MediaSignals for EventHub {
    fn subscribe(&self, listener: MediaListener) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener));
            id
        };

        let weak: Weak<RefCell<HubListeners>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(entry, _)| *entry != id);
            }
        })
    }
}
