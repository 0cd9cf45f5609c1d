//! # Keyboard Tracking
//!
//! A zero-content spacer that lives in the keyboard-accessory slot and turns
//! movements of that slot into [`KeyboardEvent`]s.
//!
//! ```text
//! KeyboardHost ──set_frame()──► KeyboardTracker ──mpsc──► screen controller
//!      ▲                              ▲
//!      │ relayout with                │ update_height()
//!      └── intrinsic_height() ◄───────┘ (pushed by InputBar, no signal back)
//! ```
//!
//! The host is whatever owns the accessory slot (the keyboard window on a
//! phone, a simulated keyboard panel in the terminal demo). The tracker never
//! tells anyone about its own height; callers pull `intrinsic_height()`.
//! That keeps the InputBar → tracker push one-directional.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

use log::{debug, warn};

use crate::core::geometry::{Rect, Size};

/// Height the tracker reports until something larger is pushed into it.
pub const DEFAULT_TRACKER_HEIGHT: f64 = 44.0;

/// Platforms older than this need a manual layout pass after a height push
/// and only expose whole-frame changes.
pub const LEGACY_PLATFORM_THRESHOLD: f64 = 8.0;

/// Platform version assumed when the host does not say otherwise.
pub const CURRENT_PLATFORM_VERSION: f64 = 17.0;

/// Broadcast to whoever listens on the tracker's channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyboardEvent {
    /// The accessory slot moved; the payload is its new frame.
    FrameChanged(Rect),
}

/// Which property of the host frame an observer is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// Fires when the center moves (origin or size change that shifts it)
    Center,
    /// Fires on any frame change
    Frame,
}

impl HostSignal {
    pub fn for_platform(version: f64) -> Self {
        if version < LEGACY_PLATFORM_THRESHOLD {
            HostSignal::Frame
        } else {
            HostSignal::Center
        }
    }

    fn changed(self, old: &Rect, new: &Rect) -> bool {
        match self {
            HostSignal::Center => old.center() != new.center(),
            HostSignal::Frame => old != new,
        }
    }
}

/// Something that wants to hear about host position changes.
pub trait PositionObserver {
    /// `id` is the subscription the notification is delivered through.
    fn host_position_changed(&mut self, id: SubscriptionId, frame: Rect);
}

/// Handle returned by [`KeyboardHost::observe`]. Unique across all hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);

impl SubscriptionId {
    fn next() -> Self {
        SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

struct Observer {
    id: SubscriptionId,
    signal: HostSignal,
    target: Weak<RefCell<dyn PositionObserver>>,
}

/// The view that currently hosts the tracker.
pub struct KeyboardHost {
    frame: Rect,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for KeyboardHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardHost")
            .field("frame", &self.frame)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl KeyboardHost {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            observers: Vec::new(),
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Register interest in `signal`. Observers are held weakly.
    pub fn observe(
        &mut self,
        signal: HostSignal,
        target: Weak<RefCell<dyn PositionObserver>>,
    ) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.observers.push(Observer { id, signal, target });
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove_observer(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Move or resize the host and notify observers whose signal changed.
    pub fn set_frame(&mut self, frame: Rect) {
        let old = std::mem::replace(&mut self.frame, frame);
        self.observers.retain(|o| o.target.strong_count() > 0);

        let targets: Vec<_> = self
            .observers
            .iter()
            .filter(|o| o.signal.changed(&old, &frame))
            .filter_map(|o| o.target.upgrade().map(|target| (o.id, target)))
            .collect();

        for (id, target) in targets {
            target.borrow_mut().host_position_changed(id, frame);
        }
    }
}

struct Registration {
    host: Weak<RefCell<KeyboardHost>>,
    id: SubscriptionId,
}

/// Invisible accessory that reports keyboard movement.
pub struct KeyboardTracker {
    default_height: f64,
    height: f64,
    platform_version: f64,
    /// Frame the tracker was given on legacy platforms
    frame: Rect,
    forced_layouts: usize,
    sender: Sender<KeyboardEvent>,
    registration: Option<Registration>,
}

impl std::fmt::Debug for KeyboardTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardTracker")
            .field("default_height", &self.default_height)
            .field("height", &self.height)
            .field("platform_version", &self.platform_version)
            .field("attached", &self.registration.is_some())
            .finish()
    }
}

impl KeyboardTracker {
    /// Create a tracker that broadcasts on `sender`.
    pub fn new(sender: Sender<KeyboardEvent>) -> Self {
        Self {
            default_height: DEFAULT_TRACKER_HEIGHT,
            height: DEFAULT_TRACKER_HEIGHT,
            platform_version: CURRENT_PLATFORM_VERSION,
            frame: Rect::ZERO,
            forced_layouts: 0,
            sender,
            registration: None,
        }
    }

    pub fn with_default_height(mut self, height: f64) -> Self {
        self.default_height = height.max(0.0);
        self.height = self.default_height;
        self
    }

    pub fn with_platform_version(mut self, version: f64) -> Self {
        self.platform_version = version;
        self
    }

    /// Wrap in the shared handle `attach` and `InputBar` expect.
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Move the tracker into `host`, dropping any previous registration.
    pub fn attach(this: &Rc<RefCell<Self>>, host: &Rc<RefCell<KeyboardHost>>) {
        let signal = {
            let mut tracker = this.borrow_mut();
            tracker.detach();
            HostSignal::for_platform(tracker.platform_version)
        };

        let observer: Rc<RefCell<dyn PositionObserver>> = this.clone();
        let id = host.borrow_mut().observe(signal, Rc::downgrade(&observer));
        this.borrow_mut().registration = Some(Registration {
            host: Rc::downgrade(host),
            id,
        });
        debug!("keyboard tracker attached ({signal:?})");
    }

    /// Leave the current host. Safe to call when not attached.
    pub fn detach(&mut self) {
        let Some(registration) = self.registration.take() else {
            return;
        };
        if let Some(host) = registration.host.upgrade() {
            // Host busy notifying: the stale subscription stays behind but
            // no longer matches our registration, so its events are ignored.
            match host.try_borrow_mut() {
                Ok(mut host) => {
                    host.remove_observer(registration.id);
                }
                Err(_) => debug!("keyboard host busy, leaving stale subscription {:?}", registration.id),
            }
        }
        debug!("keyboard tracker detached");
    }

    pub fn is_attached(&self) -> bool {
        self.registration
            .as_ref()
            .is_some_and(|r| r.host.strong_count() > 0)
    }

    /// Height the host should reserve for the accessory slot.
    pub fn intrinsic_height(&self) -> f64 {
        self.height
    }

    pub fn default_height(&self) -> f64 {
        self.default_height
    }

    /// Frame set by the last manual layout pass (legacy platforms only).
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// How many manual layout passes `update_height` has forced.
    pub fn forced_layout_count(&self) -> usize {
        self.forced_layouts
    }

    /// Accept a height pushed from outside, never below the default.
    pub fn update_height(&mut self, height: f64) {
        self.height = height.max(self.default_height);
        if self.platform_version < LEGACY_PLATFORM_THRESHOLD {
            self.frame.size = Size::new(self.frame.width(), self.height);
            self.forced_layouts += 1;
        }
    }
}

impl PositionObserver for KeyboardTracker {
    fn host_position_changed(&mut self, id: SubscriptionId, frame: Rect) {
        if self.registration.as_ref().is_none_or(|r| r.id != id) {
            return;
        }
        if self.sender.send(KeyboardEvent::FrameChanged(frame)).is_err() {
            warn!("keyboard frame listener is gone, dropping {frame:?}");
        }
    }
}

impl Drop for KeyboardTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};

    fn tracker() -> (Rc<RefCell<KeyboardTracker>>, Receiver<KeyboardEvent>) {
        let (tx, rx) = mpsc::channel();
        (KeyboardTracker::new(tx).into_shared(), rx)
    }

    fn host(y: f64) -> Rc<RefCell<KeyboardHost>> {
        Rc::new(RefCell::new(KeyboardHost::new(Rect::new(0.0, y, 320.0, 44.0))))
    }

    #[test]
    fn broadcasts_host_frame_on_move() {
        let (tracker, rx) = tracker();
        let host = host(500.0);
        KeyboardTracker::attach(&tracker, &host);

        let moved = Rect::new(0.0, 260.0, 320.0, 260.0);
        host.borrow_mut().set_frame(moved);
        assert_eq!(rx.try_recv(), Ok(KeyboardEvent::FrameChanged(moved)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn center_signal_ignores_frames_with_same_center() {
        let (tracker, rx) = tracker();
        let host = host(100.0);
        KeyboardTracker::attach(&tracker, &host);

        // Grow by 10 on each side: center unchanged
        host.borrow_mut().set_frame(Rect::new(-10.0, 90.0, 340.0, 64.0));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn legacy_platforms_observe_whole_frame() {
        let (tx, rx) = mpsc::channel();
        let tracker = KeyboardTracker::new(tx).with_platform_version(7.1).into_shared();
        let host = host(100.0);
        KeyboardTracker::attach(&tracker, &host);

        host.borrow_mut().set_frame(Rect::new(-10.0, 90.0, 340.0, 64.0));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn reattach_keeps_a_single_registration() {
        let (tracker, rx) = tracker();
        let first = host(100.0);
        let second = host(200.0);

        KeyboardTracker::attach(&tracker, &first);
        KeyboardTracker::attach(&tracker, &first);
        assert_eq!(first.borrow().observer_count(), 1);

        KeyboardTracker::attach(&tracker, &second);
        assert_eq!(first.borrow().observer_count(), 0);
        assert_eq!(second.borrow().observer_count(), 1);

        first.borrow_mut().set_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn detach_is_idempotent() {
        let (tracker, rx) = tracker();
        let host = host(100.0);
        KeyboardTracker::attach(&tracker, &host);

        tracker.borrow_mut().detach();
        tracker.borrow_mut().detach();
        assert!(!tracker.borrow().is_attached());
        assert_eq!(host.borrow().observer_count(), 0);

        host.borrow_mut().set_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropping_tracker_deregisters() {
        let (tracker, _rx) = tracker();
        let host = host(100.0);
        KeyboardTracker::attach(&tracker, &host);
        drop(tracker);
        assert_eq!(host.borrow().observer_count(), 0);
    }

    #[test]
    fn update_height_never_goes_below_default() {
        let (tracker, _rx) = tracker();
        let mut tracker = tracker.borrow_mut();
        tracker.update_height(20.0);
        assert_eq!(tracker.intrinsic_height(), DEFAULT_TRACKER_HEIGHT);
        tracker.update_height(84.0);
        assert_eq!(tracker.intrinsic_height(), 84.0);
        assert_eq!(tracker.forced_layout_count(), 0);
    }

    #[test]
    fn legacy_platforms_force_layout() {
        let (tx, _rx) = mpsc::channel();
        let mut tracker = KeyboardTracker::new(tx).with_platform_version(7.0);
        tracker.update_height(60.0);
        assert_eq!(tracker.forced_layout_count(), 1);
        assert_eq!(tracker.frame().height(), 60.0);
    }

    #[test]
    fn closed_channel_does_not_panic() {
        let (tracker, rx) = tracker();
        drop(rx);
        let host = host(100.0);
        KeyboardTracker::attach(&tracker, &host);
        host.borrow_mut().set_frame(Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn detach_while_host_is_borrowed_silences_tracker() {
        let (tracker, rx) = tracker();
        let host = host(100.0);
        KeyboardTracker::attach(&tracker, &host);

        {
            let _busy = host.borrow();
            tracker.borrow_mut().detach();
        }
        assert!(!tracker.borrow().is_attached());

        host.borrow_mut().set_frame(Rect::new(0.0, 40.0, 320.0, 60.0));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stale_subscription_is_ignored_after_reattach() {
        let (tracker, rx) = tracker();
        let first = host(100.0);
        let second = host(100.0);
        KeyboardTracker::attach(&tracker, &first);

        {
            let _busy = first.borrow();
            KeyboardTracker::attach(&tracker, &second);
        }

        first.borrow_mut().set_frame(Rect::new(0.0, 40.0, 320.0, 60.0));
        assert!(rx.try_recv().is_err());

        let moved = Rect::new(0.0, 20.0, 320.0, 60.0);
        second.borrow_mut().set_frame(moved);
        assert_eq!(rx.try_recv(), Ok(KeyboardEvent::FrameChanged(moved)));
    }
}
