#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::view::UsersView;

/// 4-lane counterpart of the wide-accumulation reducer.
///
/// Activity bytes are widened through u32 lanes, converted to f32 and
/// saturated to 1.0, masked with `vcgeq_f32` against the broadcast threshold,
/// then each contribution half is converted to f64 and added into two
/// independent accumulators. Leftover `len % 4` elements take the scalar
/// predicate with f64 accumulation.
///
/// # Safety
///
/// The running CPU must support NEON.
#[target_feature(enable = "neon")]
pub unsafe fn sum_active_balances_wide(view: &UsersView<'_>, minimum_balance: f32) -> f64 {
    unsafe {
        let count = view.len();
        let balances = view.balances.as_ptr();
        let active_flags = view.active.as_ptr();

        let threshold = vdupq_n_f32(minimum_balance);
        let one = vdupq_n_f32(1.0);

        let mut acc0 = vdupq_n_f64(0.0);
        let mut acc1 = vdupq_n_f64(0.0);

        const VECTOR_WIDTH: usize = 4;
        let n4 = (count / VECTOR_WIDTH) * VECTOR_WIDTH;

        let mut i = 0usize;
        while i < n4 {
            let b = vld1q_f32(balances.add(i));
            let bytes = [
                *active_flags.add(i) as u32,
                *active_flags.add(i + 1) as u32,
                *active_flags.add(i + 2) as u32,
                *active_flags.add(i + 3) as u32,
            ];
            let ints = vld1q_u32(bytes.as_ptr());
            let active = vminq_f32(vcvtq_f32_u32(ints), one);

            let cmp_mask = vcgeq_f32(b, threshold);
            let take = vandq_u32(cmp_mask, vreinterpretq_u32_f32(active));
            let contrib = vmulq_f32(b, vreinterpretq_f32_u32(take));

            acc0 = vaddq_f64(acc0, vcvt_f64_f32(vget_low_f32(contrib)));
            acc1 = vaddq_f64(acc1, vcvt_high_f64_f32(contrib));

            i += VECTOR_WIDTH;
        }

        let mut accumulated = vaddvq_f64(vaddq_f64(acc0, acc1));

        while i < count {
            if *active_flags.add(i) != 0 && *balances.add(i) >= minimum_balance {
                accumulated += *balances.add(i) as f64;
            }
            i += 1;
        }

        accumulated
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/simd/neon.rs"]
mod tests;
