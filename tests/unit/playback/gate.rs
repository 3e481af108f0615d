use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn reducer_truth_table() {
    assert!(!is_visible(false, false));
    assert!(!is_visible(true, false));
    assert!(!is_visible(false, true));
    assert!(is_visible(true, true));
}

#[test]
fn images_first_then_timer() {
    let mut g = ReadinessGate::new();
    assert_eq!(g.mark_images_ready(ms(1200)), GateTransition::Unchanged);
    assert!(!g.is_visible());
    assert_eq!(g.mark_min_time_ready(ms(3000)), GateTransition::BecameVisible);
    assert_eq!(g.visible_at(), Some(ms(3000)));
}

#[test]
fn timer_first_then_images() {
    let mut g = ReadinessGate::new();
    assert_eq!(g.mark_min_time_ready(ms(3000)), GateTransition::Unchanged);
    assert!(!g.is_visible());
    assert_eq!(g.mark_images_ready(ms(4500)), GateTransition::BecameVisible);
    assert_eq!(g.visible_at(), Some(ms(4500)));
}

#[test]
fn opens_exactly_once() {
    let mut g = ReadinessGate::new();
    g.mark_images_ready(ms(1));
    assert_eq!(g.mark_min_time_ready(ms(2)), GateTransition::BecameVisible);
    assert_eq!(g.mark_min_time_ready(ms(3)), GateTransition::Unchanged);
    assert_eq!(g.mark_images_ready(ms(4)), GateTransition::Unchanged);
    assert!(g.state().visible);
    assert_eq!(g.visible_at(), Some(ms(2)));
}

#[test]
fn single_signal_never_opens() {
    let mut g = ReadinessGate::new();
    for t in 0..10 {
        g.mark_min_time_ready(ms(t * 1000));
    }
    assert!(!g.is_visible());
    assert_eq!(g.visible_at(), None);
}

#[test]
fn policies_account_for_failures_differently() {
    assert!(!FailurePolicy::Stall.all_accounted(9, 1, 10));
    assert!(FailurePolicy::Stall.all_accounted(10, 0, 10));
    assert!(FailurePolicy::Account.all_accounted(9, 1, 10));
    assert!(FailurePolicy::Placeholder.all_accounted(0, 10, 10));
    assert!(!FailurePolicy::Account.all_accounted(8, 1, 10));
}

#[test]
fn policy_serde_is_lowercase() {
    assert_eq!(FailurePolicy::default(), FailurePolicy::Account);
    let p: FailurePolicy = serde_json::from_str("\"placeholder\"").unwrap();
    assert_eq!(p, FailurePolicy::Placeholder);
    assert_eq!(serde_json::to_string(&FailurePolicy::Stall).unwrap(), "\"stall\"");
}
