use std::time::{Duration, Instant};

use crate::{
    assets::{
        decode::Frame,
        frames::{FrameSource, FrameStore},
        loader::{FrameLoader, LoadHandle},
    },
    foundation::core::{FrameIndex, Point},
    foundation::error::{ReelError, ReelResult},
    host::event_loop::{EventKind, Host, HostEvent, Subscription, TimerHandle},
    overlay::cursor::CursorTrail,
    page::{config::PageConfig, scroll::ScrollTracker},
    playback::{
        gate::{FailurePolicy, GateTransition, PlaybackState, ReadinessGate},
        mapper::frame_index,
        renderer::{CanvasRenderer, DrawOutcome},
    },
};

/// Placeholder size when no frame loaded successfully.
const PLACEHOLDER_FALLBACK: (u32, u32) = (16, 9);

/// What one [`Session::step`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Events dispatched to the page.
    pub events: usize,
    /// Outcome of the animation frame, when one ran and had a draw pending.
    pub draw: Option<DrawOutcome>,
    pub became_visible: bool,
}

/// One mount of the scroll-driven page on a [`Host`].
///
/// Owns the frame store, readiness gate and canvas renderer, and reacts to host events
/// on the loop thread. Dropping the session detaches every listener and timer and
/// cancels the in-flight frame load.
pub struct Session {
    host: Host,
    config: PageConfig,
    source: FrameSource,
    store: FrameStore,
    gate: ReadinessGate,
    renderer: CanvasRenderer,
    tracker: ScrollTracker,
    cursor: CursorTrail,
    mounted_at: Duration,
    last_step: Duration,
    progress: f64,
    pending_draw: Option<FrameIndex>,
    draw_count: usize,
    last_outcome: Option<DrawOutcome>,
    min_timer: Option<TimerHandle>,
    load: Option<LoadHandle>,
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("frames", &self.source.count)
            .field("state", &self.gate.state())
            .field("progress", &self.progress)
            .field("draw_count", &self.draw_count)
            .finish()
    }
}

impl Session {
    /// Register listeners and the minimum-display timer without loading any frames.
    #[tracing::instrument(skip(host, config), fields(frames = config.frames.count))]
    pub fn new(host: &Host, config: PageConfig) -> ReelResult<Self> {
        config.validate()?;
        let source = config.frame_source()?;
        let subscriptions = [
            EventKind::Scroll,
            EventKind::Resize,
            EventKind::Pointer,
            EventKind::Timer,
            EventKind::FrameLoad,
        ]
        .into_iter()
        .map(|k| host.subscribe(k))
        .collect();
        let min_timer = host.set_timeout(Duration::from_millis(config.min_loading_ms));
        let tracker = ScrollTracker::new(config.scroll_length_vh);
        let window = host.window();
        let now = host.now();

        tracing::debug!(min_loading_ms = config.min_loading_ms, "session mounted");
        Ok(Self {
            host: host.clone(),
            store: FrameStore::new(source.count),
            source,
            gate: ReadinessGate::new(),
            renderer: CanvasRenderer::new(),
            tracker,
            cursor: CursorTrail::new(),
            mounted_at: now,
            last_step: now,
            progress: tracker.progress(window.scroll_y, window.viewport),
            pending_draw: None,
            draw_count: 0,
            last_outcome: None,
            min_timer: Some(min_timer),
            load: None,
            subscriptions,
            config,
        })
    }

    /// Mount and start loading every frame on `loader`.
    pub fn mount(host: &Host, config: PageConfig, loader: &FrameLoader) -> ReelResult<Self> {
        let mut session = Self::new(host, config)?;
        session.start_loading(loader);
        Ok(session)
    }

    /// Start the frame load. A second call while loading is a no-op.
    pub fn start_loading(&mut self, loader: &FrameLoader) {
        if self.load.is_none() {
            self.load = Some(loader.spawn(&self.source, self.host.sender()));
        }
    }

    /// Advance host time to `now`, dispatch every pending event, then run the
    /// animation frame if one was requested.
    ///
    /// Timers that expire on the way fire at their own deadline, so handlers see the
    /// clock as it was when the timer was due.
    pub fn step(&mut self, now: Duration) -> ReelResult<StepReport> {
        let mut report = StepReport::default();
        loop {
            let target = match self.host.next_deadline() {
                Some(d) if d < now => d,
                _ => now,
            };
            self.host.advance_to(target);
            self.host.poll();
            while let Some(event) = self.host.next_event() {
                report.events += 1;
                if self.handle(event) == GateTransition::BecameVisible {
                    report.became_visible = true;
                }
            }
            if target >= now {
                break;
            }
        }

        let now = self.host.now();
        self.cursor.step(now.saturating_sub(self.last_step).as_secs_f64());
        self.last_step = now;

        if self.host.take_animation_frame() {
            report.draw = self.run_animation_frame()?;
        }
        Ok(report)
    }

    /// Block until every frame slot has settled, dispatching completions as they
    /// arrive. Virtual time does not move.
    #[tracing::instrument(skip(self))]
    pub fn wait_for_frames(&mut self, timeout: Duration) -> ReelResult<()> {
        if self.load.is_none() && self.store.pending_count() > 0 {
            return Err(ReelError::asset("no frame load was started"));
        }
        let deadline = Instant::now() + timeout;
        while self.store.pending_count() > 0 {
            if self.host.pending_events() == 0 {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() || !self.host.wait_external(remaining) {
                    return Err(ReelError::asset(format!(
                        "timed out with {} of {} frame(s) outstanding",
                        self.store.pending_count(),
                        self.store.len()
                    )));
                }
            }
            self.step(self.host.now())?;
        }
        Ok(())
    }

    /// Scroll the page so the container sits at `progress`.
    pub fn scroll_to_progress(&self, progress: f64) {
        let window = self.host.window();
        let scroll_y = self.tracker.scroll_y_for(progress, window.viewport);
        self.host.emit(HostEvent::Scroll { scroll_y });
    }

    /// Tear the page down. Equivalent to dropping the session.
    pub fn unmount(self) {
        tracing::debug!(draws = self.draw_count, "session unmounted");
    }

    fn handle(&mut self, event: HostEvent) -> GateTransition {
        match event {
            HostEvent::Scroll { scroll_y } => {
                self.progress = self.tracker.progress(scroll_y, self.host.window().viewport);
                self.schedule_draw();
                GateTransition::Unchanged
            }
            HostEvent::Resize { viewport, .. } => {
                // The scroll span scales with the viewport height.
                self.progress = self.tracker.progress(self.host.window().scroll_y, viewport);
                self.schedule_draw();
                GateTransition::Unchanged
            }
            HostEvent::PointerMove {
                x,
                y,
                over_interactive,
            } => {
                let now_s = self.elapsed().as_secs_f64();
                self.cursor
                    .pointer_moved(Point::new(x, y), over_interactive, now_s);
                GateTransition::Unchanged
            }
            HostEvent::TimerFired { timer } => {
                if self.min_timer.as_ref().is_some_and(|t| t.id() == timer) {
                    self.min_timer = None;
                    let t = self.gate.mark_min_time_ready(self.host.now());
                    self.on_transition(t)
                } else {
                    GateTransition::Unchanged
                }
            }
            HostEvent::FrameLoaded { frame } => {
                let index = frame.index;
                match self.store.fill(index, frame) {
                    Ok(true) => {}
                    Ok(false) => tracing::debug!(index = index.0, "duplicate frame completion"),
                    Err(e) => tracing::warn!(error = %e, "dropping frame completion"),
                }
                self.check_images_ready()
            }
            HostEvent::FrameFailed { index, reason } => {
                tracing::warn!(
                    index = index.0,
                    %reason,
                    policy = ?self.config.failure_policy,
                    "frame failed to load"
                );
                if let Err(e) = self.store.mark_failed(index) {
                    tracing::warn!(error = %e, "dropping frame failure");
                }
                self.check_images_ready()
            }
        }
    }

    fn check_images_ready(&mut self) -> GateTransition {
        if self.gate.state().images_ready {
            return GateTransition::Unchanged;
        }
        let (loaded, failed) = (self.store.loaded_count(), self.store.failed_count());
        if !self
            .config
            .failure_policy
            .all_accounted(loaded, failed, self.store.len())
        {
            return GateTransition::Unchanged;
        }
        if failed > 0 && self.config.failure_policy == FailurePolicy::Placeholder {
            self.fill_placeholders();
        }
        tracing::info!(loaded, failed, "all frames accounted for");
        let t = self.gate.mark_images_ready(self.host.now());
        self.on_transition(t)
    }

    fn fill_placeholders(&mut self) {
        let (w, h) = self
            .store
            .first_loaded()
            .map(|f| (f.width, f.height))
            .unwrap_or(PLACEHOLDER_FALLBACK);
        let template = Frame::solid(
            FrameIndex(0),
            w,
            h,
            self.config.background.to_rgba8_premul(),
        );
        for index in self.store.failed_indices() {
            let frame = Frame {
                index,
                ..template.clone()
            };
            if let Err(e) = self.store.substitute(index, frame) {
                tracing::warn!(error = %e, "placeholder substitution failed");
            }
        }
    }

    fn on_transition(&mut self, t: GateTransition) -> GateTransition {
        if t == GateTransition::BecameVisible {
            tracing::info!(
                at_ms = self.elapsed().as_millis() as u64,
                "readiness gate opened"
            );
            self.pending_draw = Some(FrameIndex(0));
            self.host.request_animation_frame();
        }
        t
    }

    fn schedule_draw(&mut self) {
        if !self.gate.is_visible() {
            return;
        }
        self.pending_draw = Some(frame_index(self.progress, self.store.len()));
        self.host.request_animation_frame();
    }

    fn run_animation_frame(&mut self) -> ReelResult<Option<DrawOutcome>> {
        let Some(index) = self.pending_draw.take() else {
            return Ok(None);
        };
        let window = self.host.window();
        let outcome = self.renderer.draw(
            self.gate.state(),
            &self.store,
            index,
            window.viewport,
            window.device_pixel_ratio,
        )?;
        if outcome.is_drawn() {
            self.draw_count += 1;
        } else {
            tracing::trace!(?outcome, "draw skipped");
        }
        self.last_outcome = Some(outcome);
        Ok(Some(outcome))
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn state(&self) -> PlaybackState {
        self.gate.state()
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn renderer(&self) -> &CanvasRenderer {
        &self.renderer
    }

    pub fn cursor(&self) -> &CursorTrail {
        &self.cursor
    }

    pub fn tracker(&self) -> ScrollTracker {
        self.tracker
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Frame the current progress maps to.
    pub fn current_index(&self) -> FrameIndex {
        frame_index(self.progress, self.store.len())
    }

    /// Completed draws, not counting skips.
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    pub fn last_outcome(&self) -> Option<DrawOutcome> {
        self.last_outcome
    }

    /// Host time since mount.
    pub fn elapsed(&self) -> Duration {
        self.host.now().saturating_sub(self.mounted_at)
    }

    /// Seconds since the gate opened, `None` while closed.
    pub fn since_visible_s(&self) -> Option<f64> {
        self.gate
            .visible_at()
            .map(|at| self.host.now().saturating_sub(at).as_secs_f64())
    }

    pub fn load(&self) -> Option<&LoadHandle> {
        self.load.as_ref()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/session.rs"]
mod tests;
