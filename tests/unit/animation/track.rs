use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn linear_track_interpolates_and_clamps() {
    let t = Track::linear(&[0.0, 0.1, 0.8, 1.0], &[1.0, 0.4, 0.4, 0.0]).unwrap();
    assert!(close(t.sample(0.0), 1.0));
    assert!(close(t.sample(0.05), 0.7));
    assert!(close(t.sample(0.5), 0.4));
    assert!(close(t.sample(0.9), 0.2));
    assert!(close(t.sample(1.0), 0.0));
    assert!(close(t.sample(-1.0), 1.0));
    assert!(close(t.sample(2.0), 0.0));
}

#[test]
fn track_with_late_first_stop_holds_before_it() {
    let t = Track::linear(&[0.75, 0.85], &[0.0, 1.0]).unwrap();
    assert!(close(t.sample(0.2), 0.0));
    assert!(close(t.sample(0.8), 0.5));
    assert!(close(t.sample(0.95), 1.0));
}

#[test]
fn non_finite_input_samples_first_stop() {
    let t = Track::linear(&[0.0, 1.0], &[3.0, 5.0]).unwrap();
    assert!(close(t.sample(f64::NAN), 3.0));
}

#[test]
fn construction_rejects_bad_stops() {
    assert!(Track::linear(&[0.0, 1.0], &[1.0]).is_err());
    assert!(Track::<f64>::linear(&[], &[]).is_err());
    assert!(Track::linear(&[0.5, 0.1], &[0.0, 1.0]).is_err());
    assert!(Track::linear(&[0.0, f64::INFINITY], &[0.0, 1.0]).is_err());
}

#[test]
fn length_mixes_units() {
    let t = Track::linear(&[0.0, 0.3], &[Length::percent(0.0), Length::vh(-40.0)]).unwrap();
    let mid = t.sample(0.15);
    assert!(close(mid.resolve(1000.0, 200.0), -200.0));
    assert!(close(t.sample(0.3).resolve(800.0, 0.0), -320.0));
    assert!(close(Length::percent(100.0).resolve(800.0, 64.0), 64.0));
}
