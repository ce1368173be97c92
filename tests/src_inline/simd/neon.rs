use super::*;
use crate::datagen::{GenConfig, generate_columns};
use crate::simd::scalar;

fn approx_eq_f64(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_worked_example() {
    if !std::arch::is_aarch64_feature_detected!("neon") {
        return;
    }
    let ids = [0i32, 1, 2, 3];
    let balances = [100.0f32, 300.0, 250.0, 999.0];
    let active = [1u8, 1, 0, 1];
    let view = UsersView::new(&ids, &balances, &active);
    // SAFETY: NEON support checked above.
    unsafe {
        assert_eq!(sum_active_balances_wide(&view, 250.0), 1299.0);
    }
}

#[test]
fn test_matches_scalar_with_remainder() {
    if !std::arch::is_aarch64_feature_detected!("neon") {
        return;
    }
    // 4k+3 exercises a 3-element scalar tail.
    let columns = generate_columns(&GenConfig {
        count: 4 * 1024 + 3,
        ..GenConfig::default()
    });
    let view = columns.view();
    // SAFETY: NEON support checked above.
    let vectorized = unsafe { sum_active_balances_wide(&view, 250.0) };
    let reference = scalar::sum_active_balances_f64(&view, 250.0);
    assert!(
        approx_eq_f64(vectorized, reference, 1e-11),
        "vectorized = {vectorized}, reference = {reference}"
    );
}

#[test]
fn test_nonzero_flag_bytes_saturate_to_active() {
    if !std::arch::is_aarch64_feature_detected!("neon") {
        return;
    }
    let ids: Vec<i32> = (0..8).collect();
    let balances = vec![300.0f32; 8];
    let active: Vec<u8> = vec![0, 1, 2, 255, 0, 128, 1, 0];
    let view = UsersView::new(&ids, &balances, &active);
    let expected = active.iter().filter(|f| **f != 0).count() as f64 * 300.0;
    // SAFETY: NEON support checked above.
    unsafe {
        assert_eq!(sum_active_balances_wide(&view, 250.0), expected);
    }
}

#[test]
fn test_counts_below_vector_width_run_on_the_tail() {
    if !std::arch::is_aarch64_feature_detected!("neon") {
        return;
    }
    for count in 0..=10usize {
        let columns = generate_columns(&GenConfig {
            count,
            ..GenConfig::default()
        });
        let view = columns.view();
        // SAFETY: NEON support checked above.
        let vectorized = unsafe { sum_active_balances_wide(&view, 250.0) };
        let reference = scalar::sum_active_balances_f64(&view, 250.0);
        assert!(approx_eq_f64(vectorized, reference, 1e-11), "count = {count}");
    }
}
