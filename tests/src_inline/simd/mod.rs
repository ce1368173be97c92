use super::*;
use crate::datagen::{GenConfig, generate_columns};
use crate::view::UsersView;

fn approx_eq_f32(a: f32, b: f32, rel: f32) -> bool {
    (a - b).abs() <= rel * a.abs().max(b.abs()).max(1.0)
}

fn approx_eq_f64(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_backend_names_are_known() {
    assert!(matches!(backend_name(), "avx2" | "neon" | "scalar"));
    assert!(matches!(unrolled_backend_name(), "avx2" | "scalar"));
}

#[test]
fn test_worked_example_all_entry_points() {
    let ids = [0i32, 1, 2, 3];
    let balances = [100.0f32, 300.0, 250.0, 999.0];
    let active = [1u8, 1, 0, 1];
    let view = UsersView::new(&ids, &balances, &active);
    assert_eq!(sum_active_balances(&view, 250.0), 1299.0);
    assert_eq!(sum_active_balances_wide(&view, 250.0), 1299.0);
}

#[test]
fn test_dispatch_matches_scalar_within_tolerance() {
    let columns = generate_columns(&GenConfig {
        count: 8 * 512 + 3,
        ..GenConfig::default()
    });
    let view = columns.view();
    let dispatched = sum_active_balances(&view, 250.0);
    let reference = scalar::sum_active_balances(&view, 250.0);
    assert!(
        approx_eq_f32(dispatched, reference, 1e-3),
        "dispatched = {dispatched}, reference = {reference}"
    );
}

#[test]
fn test_wide_dispatch_matches_scalar_f64() {
    let columns = generate_columns(&GenConfig {
        count: 16 * 256 + 5,
        ..GenConfig::default()
    });
    let view = columns.view();
    let dispatched = sum_active_balances_wide(&view, 250.0);
    let reference = scalar::sum_active_balances_f64(&view, 250.0);
    assert!(
        approx_eq_f64(dispatched, reference, 1e-11),
        "dispatched = {dispatched}, reference = {reference}"
    );
}

#[test]
fn test_scalar_fallback_is_bit_exact() {
    let columns = generate_columns(&GenConfig {
        count: 1021,
        ..GenConfig::default()
    });
    let view = columns.view();
    if unrolled_backend_name() == "scalar" {
        let dispatched = sum_active_balances(&view, 250.0);
        let reference = scalar::sum_active_balances(&view, 250.0);
        assert_eq!(dispatched.to_bits(), reference.to_bits());
    }
    if backend_name() == "scalar" {
        let dispatched = sum_active_balances_wide(&view, 250.0);
        let reference = scalar::sum_active_balances_f64(&view, 250.0);
        assert_eq!(dispatched.to_bits(), reference.to_bits());
    }
}

#[test]
fn test_empty_view_is_zero() {
    let view = UsersView::new(&[], &[], &[]);
    assert_eq!(sum_active_balances(&view, 0.0), 0.0);
    assert_eq!(sum_active_balances_wide(&view, 0.0), 0.0);
}

#[test]
fn test_threshold_above_every_balance_is_zero() {
    let columns = generate_columns(&GenConfig {
        count: 500,
        ..GenConfig::default()
    });
    let view = columns.view();
    assert_eq!(sum_active_balances(&view, 1000.5), 0.0);
    assert_eq!(sum_active_balances_wide(&view, 1000.5), 0.0);
}

#[test]
fn test_all_inactive_is_zero() {
    let columns = generate_columns(&GenConfig {
        count: 500,
        active_probability: 0.0,
        ..GenConfig::default()
    });
    let view = columns.view();
    assert_eq!(sum_active_balances(&view, 0.0), 0.0);
    assert_eq!(sum_active_balances_wide(&view, 0.0), 0.0);
}

#[test]
fn test_permutation_insensitivity() {
    let columns = generate_columns(&GenConfig {
        count: 2000,
        ..GenConfig::default()
    });
    let mut ids = columns.ids.clone();
    let mut balances = columns.balances.clone();
    let mut active = columns.active.clone();
    ids.reverse();
    balances.reverse();
    active.reverse();

    let forward = sum_active_balances(&columns.view(), 250.0);
    let reversed = sum_active_balances(&UsersView::new(&ids, &balances, &active), 250.0);
    assert!(
        approx_eq_f32(forward, reversed, 1e-3),
        "forward = {forward}, reversed = {reversed}"
    );

    let forward_wide = sum_active_balances_wide(&columns.view(), 250.0);
    let reversed_wide =
        sum_active_balances_wide(&UsersView::new(&ids, &balances, &active), 250.0);
    assert!(
        approx_eq_f64(forward_wide, reversed_wide, 1e-11),
        "forward = {forward_wide}, reversed = {reversed_wide}"
    );
}
