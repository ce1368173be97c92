//! Reduction backends and capability dispatch.
//!
//! The vector backends are compiled in per target architecture and only ever
//! executed behind a runtime CPU-feature check, so a binary built with these
//! paths present still runs correctly (just slower) on hardware without them.

use crate::view::UsersView;

#[cfg(target_arch = "x86_64")]
pub mod avx2;
#[cfg(target_arch = "aarch64")]
pub mod neon;
pub mod scalar;

/// Same-precision filtered sum. Dispatches to the unrolled AVX2 kernel when
/// the running CPU supports it, otherwise to the scalar reducer.
#[inline]
pub fn sum_active_balances(view: &UsersView<'_>, minimum_balance: f32) -> f32 {
    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("avx2") {
        // SAFETY: AVX2 support was just confirmed on the running CPU.
        return unsafe { avx2::sum_active_balances_unrolled(view, minimum_balance) };
    }
    tracing::debug!("vector path unavailable, reducing on the scalar backend");
    scalar::sum_active_balances(view, minimum_balance)
}

/// Wide-accumulation filtered sum. Dispatches to the AVX2 or NEON kernel when
/// the running CPU supports one, otherwise to the f64 scalar reducer.
#[inline]
pub fn sum_active_balances_wide(view: &UsersView<'_>, minimum_balance: f32) -> f64 {
    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("avx2") {
        // SAFETY: AVX2 support was just confirmed on the running CPU.
        return unsafe { avx2::sum_active_balances_wide(view, minimum_balance) };
    }
    #[cfg(target_arch = "aarch64")]
    if std::arch::is_aarch64_feature_detected!("neon") {
        // SAFETY: NEON support was just confirmed on the running CPU.
        return unsafe { neon::sum_active_balances_wide(view, minimum_balance) };
    }
    tracing::debug!("vector path unavailable, reducing on the scalar backend");
    scalar::sum_active_balances_f64(view, minimum_balance)
}

/// Backend the wide-accumulation entry point takes on this machine.
#[inline]
pub fn backend_name() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("avx2") {
        return "avx2";
    }
    #[cfg(target_arch = "aarch64")]
    if std::arch::is_aarch64_feature_detected!("neon") {
        return "neon";
    }
    "scalar"
}

/// Backend the same-precision entry point takes on this machine. The unrolled
/// kernel is AVX2-only, so everything else reduces on the scalar backend.
#[inline]
pub fn unrolled_backend_name() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("avx2") {
        return "avx2";
    }
    "scalar"
}

#[cfg(test)]
#[path = "../../tests/src_inline/simd/mod.rs"]
mod tests;
