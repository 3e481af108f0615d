use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    rc::{Rc, Weak},
    sync::mpsc,
    time::Duration,
};

use crate::{
    assets::decode::Frame,
    foundation::core::{FrameIndex, Point, Viewport},
};

/// Identifies a pending timer registered with [`Host::set_timeout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Event categories a listener can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Resize,
    Pointer,
    Timer,
    FrameLoad,
}

/// Everything the page reacts to. All of it is handled on the loop thread.
#[derive(Clone, Debug)]
pub enum HostEvent {
    Scroll {
        scroll_y: f64,
    },
    Resize {
        viewport: Viewport,
        device_pixel_ratio: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
        over_interactive: bool,
    },
    TimerFired {
        timer: TimerId,
    },
    FrameLoaded {
        frame: Frame,
    },
    FrameFailed {
        index: FrameIndex,
        reason: String,
    },
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Resize { .. } => EventKind::Resize,
            Self::PointerMove { .. } => EventKind::Pointer,
            Self::TimerFired { .. } => EventKind::Timer,
            Self::FrameLoaded { .. } | Self::FrameFailed { .. } => EventKind::FrameLoad,
        }
    }
}

/// Window properties the host owns and exposes to the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowState {
    pub viewport: Viewport,
    pub device_pixel_ratio: f64,
    pub scroll_y: f64,
    pub pointer: Option<Point>,
}

struct HostState {
    now: Duration,
    next_id: u64,
    listeners: BTreeMap<u64, EventKind>,
    timers: BTreeMap<u64, Duration>,
    queue: VecDeque<HostEvent>,
    frame_requested: bool,
    window: WindowState,
    tx: mpsc::Sender<HostEvent>,
    rx: mpsc::Receiver<HostEvent>,
}

impl HostState {
    fn listens_to(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    fn enqueue(&mut self, event: HostEvent) {
        if self.listens_to(event.kind()) {
            self.queue.push_back(event);
        }
    }

    fn apply_window(&mut self, event: &HostEvent) {
        match *event {
            HostEvent::Scroll { scroll_y } => self.window.scroll_y = scroll_y,
            HostEvent::Resize {
                viewport,
                device_pixel_ratio,
            } => {
                self.window.viewport = viewport;
                self.window.device_pixel_ratio = device_pixel_ratio;
            }
            HostEvent::PointerMove { x, y, .. } => self.window.pointer = Some(Point::new(x, y)),
            _ => {}
        }
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Single-threaded host event loop model with a virtual clock.
///
/// Listeners and timers are registered through RAII handles; dropping the handle
/// deregisters it. Events of a kind nobody listens to are discarded, the way a
/// detached DOM listener never sees its event. Worker threads deliver events through
/// an [`EventSender`]; they become visible to the loop on [`Host::poll`].
#[derive(Clone)]
pub struct Host {
    inner: Rc<RefCell<HostState>>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.inner.borrow();
        f.debug_struct("Host")
            .field("now", &s.now)
            .field("listeners", &s.listeners.len())
            .field("timers", &s.timers.len())
            .field("queued", &s.queue.len())
            .finish()
    }
}

impl Host {
    pub fn new(viewport: Viewport, device_pixel_ratio: f64) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            inner: Rc::new(RefCell::new(HostState {
                now: Duration::ZERO,
                next_id: 0,
                listeners: BTreeMap::new(),
                timers: BTreeMap::new(),
                queue: VecDeque::new(),
                frame_requested: false,
                window: WindowState {
                    viewport,
                    device_pixel_ratio,
                    scroll_y: 0.0,
                    pointer: None,
                },
                tx,
                rx,
            })),
        }
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn window(&self) -> WindowState {
        self.inner.borrow().window
    }

    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        let mut s = self.inner.borrow_mut();
        let id = s.alloc_id();
        s.listeners.insert(id, kind);
        Subscription {
            host: Rc::downgrade(&self.inner),
            id,
            kind,
        }
    }

    /// Register a one-shot timer firing `delay` after the current virtual time.
    pub fn set_timeout(&self, delay: Duration) -> TimerHandle {
        let mut s = self.inner.borrow_mut();
        let id = s.alloc_id();
        let deadline = s.now.saturating_add(delay);
        s.timers.insert(id, deadline);
        TimerHandle {
            host: Rc::downgrade(&self.inner),
            id: TimerId(id),
        }
    }

    /// Handle for worker threads to post events into this loop.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.inner.borrow().tx.clone(),
        }
    }

    /// Dispatch a window-originated event. Window state is updated even when no listener
    /// is attached.
    pub fn emit(&self, event: HostEvent) {
        let mut s = self.inner.borrow_mut();
        s.apply_window(&event);
        s.enqueue(event);
    }

    /// Move the virtual clock forward to `t` and queue every timer that expired, in
    /// deadline order. The clock never goes backwards.
    pub fn advance_to(&self, t: Duration) {
        let mut s = self.inner.borrow_mut();
        if t > s.now {
            s.now = t;
        }
        let now = s.now;
        let mut due: Vec<(Duration, u64)> = s
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort_unstable();
        for (_, id) in due {
            s.timers.remove(&id);
            s.enqueue(HostEvent::TimerFired { timer: TimerId(id) });
        }
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner.borrow().timers.values().min().copied()
    }

    /// Move events posted by workers into the queue without blocking.
    pub fn poll(&self) -> usize {
        let mut s = self.inner.borrow_mut();
        let incoming: Vec<HostEvent> = s.rx.try_iter().collect();
        let n = incoming.len();
        for ev in incoming {
            s.enqueue(ev);
        }
        n
    }

    /// Block up to `timeout` for one worker event. Returns whether one arrived.
    pub fn wait_external(&self, timeout: Duration) -> bool {
        let mut s = self.inner.borrow_mut();
        match s.rx.recv_timeout(timeout) {
            Ok(ev) => {
                s.enqueue(ev);
                true
            }
            Err(_) => false,
        }
    }

    pub fn next_event(&self) -> Option<HostEvent> {
        self.inner.borrow_mut().queue.pop_front()
    }

    pub fn pending_events(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Ask for a callback on the next animation frame. Repeated requests before the
    /// frame runs collapse into one.
    pub fn request_animation_frame(&self) {
        self.inner.borrow_mut().frame_requested = true;
    }

    /// Consume the pending animation-frame request, if any.
    pub fn take_animation_frame(&self) -> bool {
        std::mem::take(&mut self.inner.borrow_mut().frame_requested)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }
}

/// Scoped listener registration. Dropping it detaches the listener.
#[derive(Debug)]
pub struct Subscription {
    host: Weak<RefCell<HostState>>,
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(host) = self.host.upgrade() {
            host.borrow_mut().listeners.remove(&self.id);
        }
    }
}

/// Scoped timer registration. Dropping it cancels the timer if it has not fired.
#[derive(Debug)]
pub struct TimerHandle {
    host: Weak<RefCell<HostState>>,
    id: TimerId,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(host) = self.host.upgrade() {
            host.borrow_mut().timers.remove(&self.id.0);
        }
    }
}

/// `Send` half of the host queue, handed to loader workers.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::Sender<HostEvent>,
}

impl EventSender {
    /// Post an event. Returns `false` once the host is gone.
    pub fn send(&self, event: HostEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/event_loop.rs"]
mod tests;
