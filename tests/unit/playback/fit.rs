use super::*;

fn vp(w: f64, h: f64) -> Viewport {
    Viewport::new(w, h).unwrap()
}

#[test]
fn backing_size_scales_and_rounds() {
    assert_eq!(
        compute_backing_size(vp(800.0, 600.0), 2.0),
        BackingSize {
            width: 1600,
            height: 1200
        }
    );
    assert_eq!(
        compute_backing_size(vp(333.0, 201.0), 1.5),
        BackingSize {
            width: 500,
            height: 302
        }
    );
}

#[test]
fn backing_size_treats_bad_ratio_as_one() {
    let want = BackingSize {
        width: 10,
        height: 20,
    };
    assert_eq!(compute_backing_size(vp(10.0, 20.0), 0.0), want);
    assert_eq!(compute_backing_size(vp(10.0, 20.0), -2.0), want);
    assert_eq!(compute_backing_size(vp(10.0, 20.0), f64::NAN), want);
}

#[test]
fn zero_viewport_has_empty_backing() {
    assert!(compute_backing_size(vp(0.0, 300.0), 2.0).is_empty());
}

#[test]
fn wide_viewport_pillarboxes() {
    // 4:3 image in a 16:9 viewport.
    let r = fit_rect(400, 300, vp(1600.0, 900.0));
    assert_eq!(r.height(), 900.0);
    assert_eq!(r.width(), 1200.0);
    assert_eq!(r.x0, (1600.0 - 1200.0) / 2.0);
    assert_eq!(r.y0, 0.0);
}

#[test]
fn tall_viewport_letterboxes() {
    // 16:9 image in a 4:3 viewport.
    let r = fit_rect(1920, 1080, vp(800.0, 600.0));
    assert_eq!(r.width(), 800.0);
    assert_eq!(r.height(), 450.0);
    assert_eq!(r.x0, 0.0);
    assert_eq!(r.y0, (600.0 - 450.0) / 2.0);
}

#[test]
fn equal_ratio_fills_viewport() {
    let r = fit_rect(160, 90, vp(1600.0, 900.0));
    assert_eq!(r, Rect::new(0.0, 0.0, 1600.0, 900.0));
}

#[test]
fn degenerate_inputs_give_empty_rect() {
    assert_eq!(fit_rect(0, 10, vp(100.0, 100.0)), Rect::ZERO);
    assert_eq!(fit_rect(10, 10, vp(0.0, 100.0)), Rect::ZERO);
}
