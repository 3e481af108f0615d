use super::*;
use crate::{
    foundation::core::{Rgba8Premul, Viewport},
    playback::renderer::SkipReason,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn host() -> Host {
    Host::new(Viewport::new(160.0, 90.0).unwrap(), 1.0)
}

fn session(host: &Host, count: usize, policy: FailurePolicy) -> Session {
    let mut cfg = PageConfig::with_frames(count, "frames");
    cfg.failure_policy = policy;
    Session::new(host, cfg).unwrap()
}

fn load(host: &Host, index: usize, rgba: [u8; 4]) {
    let color = Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3]);
    host.emit(HostEvent::FrameLoaded {
        frame: Frame::solid(FrameIndex(index), 16, 9, color),
    });
}

fn fail(host: &Host, index: usize) {
    host.emit(HostEvent::FrameFailed {
        index: FrameIndex(index),
        reason: format!("frame-{:03}.jpg: not found", index + 1),
    });
}

fn load_all(host: &Host, count: usize) {
    for i in 0..count {
        load(host, i, [200, 10, 10, 255]);
    }
}

#[test]
fn opens_at_min_time_when_frames_load_first() {
    let host = host();
    let mut s = session(&host, 3, FailurePolicy::Account);
    load_all(&host, 3);

    let r = s.step(ms(1000)).unwrap();
    assert_eq!(r.events, 3);
    assert!(s.state().images_ready);
    assert!(!s.state().visible);
    assert!(r.draw.is_none());

    assert!(!s.step(ms(2999)).unwrap().became_visible);

    let r = s.step(ms(3000)).unwrap();
    assert!(r.became_visible);
    assert_eq!(
        r.draw,
        Some(DrawOutcome::Drawn {
            index: FrameIndex(0),
            resized: true
        })
    );
    assert_eq!(s.since_visible_s(), Some(0.0));
}

#[test]
fn opens_at_load_completion_when_min_time_passes_first() {
    let host = host();
    let mut s = session(&host, 2, FailurePolicy::Account);
    s.step(ms(3000)).unwrap();
    assert!(s.state().min_time_ready);
    assert!(!s.state().visible);

    load(&host, 0, [0, 0, 255, 255]);
    assert!(!s.step(ms(4000)).unwrap().became_visible);
    load(&host, 1, [0, 0, 255, 255]);
    let r = s.step(ms(5000)).unwrap();
    assert!(r.became_visible);
    assert_eq!(s.draw_count(), 1);
    assert_eq!(s.gate.visible_at(), Some(ms(5000)));
}

#[test]
fn stall_policy_never_opens_after_a_failure() {
    let host = host();
    let mut s = session(&host, 3, FailurePolicy::Stall);
    load(&host, 0, [255, 0, 0, 255]);
    fail(&host, 1);
    load(&host, 2, [255, 0, 0, 255]);
    s.step(ms(60_000)).unwrap();

    assert!(s.state().min_time_ready);
    assert!(!s.state().images_ready);
    s.scroll_to_progress(0.5);
    let r = s.step(ms(61_000)).unwrap();
    assert!(r.draw.is_none());
    assert_eq!(s.draw_count(), 0);
    assert!(s.renderer().surface().is_none());
}

#[test]
fn account_policy_opens_and_skips_the_failed_slot() {
    let host = host();
    let mut s = session(&host, 3, FailurePolicy::Account);
    load(&host, 0, [255, 0, 0, 255]);
    fail(&host, 1);
    load(&host, 2, [255, 0, 0, 255]);
    assert!(s.step(ms(3000)).unwrap().became_visible);
    assert!(s.store().get(FrameIndex(1)).is_none());

    s.scroll_to_progress(0.5);
    let r = s.step(ms(3100)).unwrap();
    assert_eq!(
        r.draw,
        Some(DrawOutcome::Skipped(SkipReason::FrameMissing(FrameIndex(1))))
    );
    // The previous picture stays on the canvas.
    assert_eq!(s.renderer().last_drawn(), Some(FrameIndex(0)));
}

#[test]
fn placeholder_policy_fills_failed_slots_with_background() {
    let host = host();
    let mut s = session(&host, 3, FailurePolicy::Placeholder);
    fail(&host, 0);
    load(&host, 1, [255, 0, 0, 255]);
    fail(&host, 2);
    s.step(ms(3000)).unwrap();
    assert!(s.state().visible);

    let bg = s.config().background.to_rgba8_premul().to_array();
    for i in [0, 2] {
        let f = s.store().get(FrameIndex(i)).unwrap();
        assert_eq!(f.index, FrameIndex(i));
        assert_eq!((f.width, f.height), (16, 9));
        assert_eq!(&f.rgba8_premul[..4], &bg);
    }
    assert_eq!(
        s.last_outcome(),
        Some(DrawOutcome::Drawn {
            index: FrameIndex(0),
            resized: true
        })
    );
}

#[test]
fn out_of_order_completions_land_in_their_own_slots() {
    let host = host();
    let mut s = session(&host, 3, FailurePolicy::Account);
    load(&host, 2, [0, 0, 255, 255]);
    load(&host, 1, [0, 255, 0, 255]);
    load(&host, 0, [255, 0, 0, 255]);
    s.step(ms(10)).unwrap();

    let expect = [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]];
    for (i, px) in expect.iter().enumerate() {
        let f = s.store().get(FrameIndex(i)).unwrap();
        assert_eq!(f.index, FrameIndex(i));
        assert_eq!(&f.rgba8_premul[..4], px);
    }
}

#[test]
fn duplicate_completion_keeps_the_first_frame() {
    let host = host();
    let mut s = session(&host, 1, FailurePolicy::Account);
    load(&host, 0, [255, 0, 0, 255]);
    load(&host, 0, [0, 255, 0, 255]);
    s.step(ms(10)).unwrap();
    assert_eq!(s.store().loaded_count(), 1);
    assert_eq!(
        &s.store().get(FrameIndex(0)).unwrap().rgba8_premul[..4],
        &[255, 0, 0, 255]
    );
}

#[test]
fn scroll_burst_draws_once_with_the_last_index() {
    let host = host();
    let mut s = session(&host, 120, FailurePolicy::Account);
    load_all(&host, 120);
    s.step(ms(3000)).unwrap();
    assert_eq!(s.draw_count(), 1);

    for p in [0.1, 0.3, 0.6, 0.999] {
        s.scroll_to_progress(p);
    }
    let r = s.step(ms(3016)).unwrap();
    assert_eq!(r.events, 4);
    assert_eq!(
        r.draw,
        Some(DrawOutcome::Drawn {
            index: FrameIndex(118),
            resized: false
        })
    );
    assert_eq!(s.draw_count(), 2);

    // Nothing pending, nothing drawn.
    assert!(s.step(ms(3032)).unwrap().draw.is_none());
}

#[test]
fn scrolls_before_visibility_are_not_drawn() {
    let host = host();
    let mut s = session(&host, 3, FailurePolicy::Account);
    s.scroll_to_progress(1.0);
    let r = s.step(ms(100)).unwrap();
    assert!(r.draw.is_none());
    assert_eq!(s.progress(), 1.0);

    load_all(&host, 3);
    let r = s.step(ms(3000)).unwrap();
    assert_eq!(
        r.draw,
        Some(DrawOutcome::Drawn {
            index: FrameIndex(0),
            resized: true
        })
    );
}

#[test]
fn resize_redraws_current_progress_at_new_backing_size() {
    let host = host();
    let mut s = session(&host, 3, FailurePolicy::Account);
    load_all(&host, 3);
    s.step(ms(3000)).unwrap();
    s.scroll_to_progress(0.5);
    s.step(ms(3100)).unwrap();
    assert_eq!(s.renderer().last_drawn(), Some(FrameIndex(1)));

    host.emit(HostEvent::Resize {
        viewport: Viewport::new(160.0, 90.0).unwrap(),
        device_pixel_ratio: 2.0,
    });
    let r = s.step(ms(3200)).unwrap();
    assert_eq!(
        r.draw,
        Some(DrawOutcome::Drawn {
            index: FrameIndex(1),
            resized: true
        })
    );
    assert_eq!(s.progress(), 0.5);
    let size = s.renderer().surface().unwrap().size();
    assert_eq!((size.width, size.height), (320, 180));
    assert_eq!(s.renderer().resize_count(), 2);
}

#[test]
fn height_change_remaps_progress_from_scroll_offset() {
    let host = host();
    let mut s = session(&host, 3, FailurePolicy::Account);
    load_all(&host, 3);
    s.step(ms(3000)).unwrap();
    s.scroll_to_progress(0.5);
    s.step(ms(3100)).unwrap();
    let scroll_y = host.window().scroll_y;

    // Span doubles with the height, so the same offset is a quarter of the way.
    let viewport = Viewport::new(160.0, 180.0).unwrap();
    host.emit(HostEvent::Resize {
        viewport,
        device_pixel_ratio: 1.0,
    });
    let r = s.step(ms(3200)).unwrap();
    assert_eq!(host.window().scroll_y, scroll_y);
    assert_eq!(s.progress(), s.tracker().progress(scroll_y, viewport));
    assert!((s.progress() - 0.25).abs() < 1e-9);
    assert_eq!(
        r.draw,
        Some(DrawOutcome::Drawn {
            index: FrameIndex(0),
            resized: true
        })
    );
}

#[test]
fn unrelated_timers_do_not_open_the_gate() {
    let host = host();
    let mut s = session(&host, 1, FailurePolicy::Account);
    load_all(&host, 1);
    let _other = host.set_timeout(ms(10));
    s.step(ms(20)).unwrap();
    assert!(!s.state().min_time_ready);
}

#[test]
fn pointer_moves_drive_the_cursor_target() {
    let host = host();
    let mut s = session(&host, 1, FailurePolicy::Account);
    host.emit(HostEvent::PointerMove {
        x: 100.0,
        y: 50.0,
        over_interactive: true,
    });
    s.step(ms(16)).unwrap();
    assert!(s.cursor().is_hovering());
    for i in 2..200 {
        s.step(ms(16 * i)).unwrap();
    }
    let pos = s.cursor().visual(s.elapsed().as_secs_f64()).position;
    assert!((pos.x - 100.0).abs() < 1.0 && (pos.y - 50.0).abs() < 1.0);
}

#[test]
fn unmount_releases_listeners_and_timers() {
    let host = host();
    let s = session(&host, 3, FailurePolicy::Account);
    assert_eq!(host.listener_count(), 5);
    assert_eq!(host.timer_count(), 1);
    assert_eq!(s.subscription_count(), 5);

    s.unmount();
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.timer_count(), 0);

    // Late events find nobody listening.
    load(&host, 0, [1, 2, 3, 255]);
    assert_eq!(host.pending_events(), 0);
}

#[test]
fn wait_without_a_load_is_an_error() {
    let host = host();
    let mut s = session(&host, 2, FailurePolicy::Account);
    assert!(s.wait_for_frames(ms(10)).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let host = host();
    let cfg = PageConfig::with_frames(0, "frames");
    assert!(Session::new(&host, cfg).is_err());
    assert_eq!(host.listener_count(), 0);
}

#[test]
fn timer_fires_at_its_deadline_within_a_long_step() {
    let host = host();
    let mut s = session(&host, 1, FailurePolicy::Account);
    load_all(&host, 1);
    let r = s.step(ms(10_000)).unwrap();
    assert!(r.became_visible);
    assert_eq!(s.gate.visible_at(), Some(ms(3000)));
    assert_eq!(s.since_visible_s(), Some(7.0));
}
