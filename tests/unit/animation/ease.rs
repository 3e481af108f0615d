use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn all_curves_hit_endpoints() {
    for e in [
        Ease::Linear,
        Ease::CircOut,
        Ease::InOut,
        Ease::EXPO_OUT,
        Ease::EASE_OUT,
    ] {
        assert!(close(e.apply(0.0), 0.0), "{e:?} at 0");
        assert!(close(e.apply(1.0), 1.0), "{e:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Linear.apply(-3.0), 0.0);
    assert_eq!(Ease::Linear.apply(7.0), 1.0);
}

#[test]
fn symmetric_in_out_passes_midpoint() {
    assert!(close(Ease::InOut.apply(0.5), 0.5));
    let linear = Ease::CubicBezier {
        x1: 0.25,
        y1: 0.25,
        x2: 0.75,
        y2: 0.75,
    };
    assert!(close(linear.apply(0.3), 0.3));
}

#[test]
fn expo_out_front_loads_motion() {
    // Most of the distance is covered in the first quarter.
    assert!(Ease::EXPO_OUT.apply(0.25) > 0.75);
    assert!(Ease::CircOut.apply(0.25) > 0.6);
}
