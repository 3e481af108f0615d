use std::{path::PathBuf, time::Duration};

use super::*;
use crate::{
    assets::frames::FramePattern,
    foundation::core::Viewport,
    host::event_loop::{EventKind, Host},
};

fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_fixtures").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &std::path::Path, w: u32, h: u32, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

fn collect(host: &Host, expected: usize) -> Vec<HostEvent> {
    let mut out = Vec::new();
    while out.len() < expected {
        assert!(
            host.wait_external(Duration::from_secs(10)),
            "loader stalled after {} events",
            out.len()
        );
        while let Some(ev) = host.next_event() {
            out.push(ev);
        }
    }
    out
}

#[test]
fn loads_every_frame_and_reports_missing_files() {
    let dir = fixture_dir("loader_mixed");
    let pattern = FramePattern::parse("f-%02d.png").unwrap();
    write_png(&dir.join("f-01.png"), 4, 2, [255, 0, 0, 255]);
    write_png(&dir.join("f-03.png"), 4, 2, [0, 0, 255, 255]);
    let source = FrameSource::new(3, &dir, pattern).unwrap();

    let host = Host::new(Viewport::new(10.0, 10.0).unwrap(), 1.0);
    let _sub = host.subscribe(EventKind::FrameLoad);
    let loader = FrameLoader::new(Some(2)).unwrap();
    let handle = loader.spawn(&source, host.sender());

    let events = collect(&host, 3);
    let mut loaded = Vec::new();
    let mut failed = Vec::new();
    for ev in events {
        match ev {
            HostEvent::FrameLoaded { frame } => {
                assert_eq!((frame.width, frame.height), (4, 2));
                loaded.push(frame.index.0);
            }
            HostEvent::FrameFailed { index, reason } => {
                assert!(reason.contains("f-02.png"));
                failed.push(index.0);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    loaded.sort_unstable();
    assert_eq!(loaded, vec![0, 2]);
    assert_eq!(failed, vec![1]);
    assert_eq!(handle.finished(), 3);
    assert_eq!(handle.total(), 3);
}

#[test]
fn dropped_handle_stops_queued_jobs() {
    let dir = fixture_dir("loader_cancel");
    let source = FrameSource::new(500, &dir, FramePattern::default()).unwrap();
    let host = Host::new(Viewport::new(10.0, 10.0).unwrap(), 1.0);
    let _sub = host.subscribe(EventKind::FrameLoad);
    let loader = FrameLoader::new(Some(1)).unwrap();

    // Hold the only worker so every frame job is still queued when the handle drops.
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
    loader.pool.spawn(move || {
        let _ = release_rx.recv();
    });
    let handle = loader.spawn(&source, host.sender());
    let finished = handle.finished.clone();
    drop(handle);
    release_tx.send(()).unwrap();

    let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();
    loader.pool.spawn(move || {
        let _ = done_tx.send(());
    });
    done_rx.recv_timeout(Duration::from_secs(10)).unwrap();

    assert_eq!(host.poll(), 0);
    assert_eq!(finished.load(Ordering::Acquire), 0);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(host.poll(), 0);
    assert_eq!(host.pending_events(), 0);
    assert_eq!(finished.load(Ordering::Acquire), 0);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(FrameLoader::new(Some(0)).is_err());
}
