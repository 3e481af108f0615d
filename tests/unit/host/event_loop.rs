use super::*;

fn host() -> Host {
    Host::new(Viewport::new(800.0, 600.0).unwrap(), 1.0)
}

fn drain(h: &Host) -> Vec<HostEvent> {
    std::iter::from_fn(|| h.next_event()).collect()
}

#[test]
fn events_without_listeners_are_dropped_but_update_window() {
    let h = host();
    h.emit(HostEvent::Scroll { scroll_y: 120.0 });
    assert_eq!(h.pending_events(), 0);
    assert_eq!(h.window().scroll_y, 120.0);

    let _sub = h.subscribe(EventKind::Scroll);
    h.emit(HostEvent::Scroll { scroll_y: 240.0 });
    h.emit(HostEvent::PointerMove {
        x: 1.0,
        y: 2.0,
        over_interactive: false,
    });
    let evs = drain(&h);
    assert_eq!(evs.len(), 1);
    assert!(matches!(evs[0], HostEvent::Scroll { scroll_y } if scroll_y == 240.0));
    assert_eq!(h.window().pointer, Some(Point::new(1.0, 2.0)));
}

#[test]
fn dropping_subscription_detaches_listener() {
    let h = host();
    let sub = h.subscribe(EventKind::Resize);
    assert_eq!(h.listener_count(), 1);
    drop(sub);
    assert_eq!(h.listener_count(), 0);
    h.emit(HostEvent::Resize {
        viewport: Viewport::new(10.0, 10.0).unwrap(),
        device_pixel_ratio: 2.0,
    });
    assert_eq!(h.pending_events(), 0);
}

#[test]
fn timers_fire_in_deadline_order_once() {
    let h = host();
    let _timers = h.subscribe(EventKind::Timer);
    let late = h.set_timeout(Duration::from_millis(300));
    let early = h.set_timeout(Duration::from_millis(100));

    h.advance_to(Duration::from_millis(50));
    assert_eq!(h.pending_events(), 0);
    assert_eq!(h.next_deadline(), Some(Duration::from_millis(100)));

    h.advance_to(Duration::from_millis(1000));
    let ids: Vec<TimerId> = drain(&h)
        .into_iter()
        .filter_map(|e| match e {
            HostEvent::TimerFired { timer } => Some(timer),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec![early.id(), late.id()]);
    assert_eq!(h.timer_count(), 0);

    h.advance_to(Duration::from_millis(2000));
    assert_eq!(h.pending_events(), 0);
}

#[test]
fn dropping_timer_handle_cancels_it() {
    let h = host();
    let _timers = h.subscribe(EventKind::Timer);
    let t = h.set_timeout(Duration::from_millis(10));
    drop(t);
    h.advance_to(Duration::from_millis(20));
    assert_eq!(h.pending_events(), 0);
    assert_eq!(h.timer_count(), 0);
}

#[test]
fn clock_is_monotonic() {
    let h = host();
    h.advance_to(Duration::from_millis(500));
    h.advance_to(Duration::from_millis(100));
    assert_eq!(h.now(), Duration::from_millis(500));
}

#[test]
fn worker_events_arrive_on_poll() {
    let h = host();
    let _loads = h.subscribe(EventKind::FrameLoad);
    let tx = h.sender();
    let worker = std::thread::spawn(move || {
        tx.send(HostEvent::FrameFailed {
            index: FrameIndex(3),
            reason: "missing".to_owned(),
        })
    });
    assert!(worker.join().unwrap());
    assert_eq!(h.poll(), 1);
    assert!(matches!(
        h.next_event(),
        Some(HostEvent::FrameFailed { index: FrameIndex(3), .. })
    ));
}

#[test]
fn animation_frame_requests_coalesce() {
    let h = host();
    assert!(!h.take_animation_frame());
    h.request_animation_frame();
    h.request_animation_frame();
    assert!(h.take_animation_frame());
    assert!(!h.take_animation_frame());
}

#[test]
fn handles_outliving_host_are_harmless() {
    let h = host();
    let sub = h.subscribe(EventKind::Scroll);
    let t = h.set_timeout(Duration::from_millis(1));
    drop(h);
    drop(sub);
    drop(t);
}
