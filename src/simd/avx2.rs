#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::view::UsersView;

/// Prefetch this many bytes ahead of the current group. Tuned for Zen 2.
const PREFETCH_DISTANCE: usize = 256;

/// 8-lane reducer that widens accumulation to f64.
///
/// Per group of 8: load balances, widen the 8 activity bytes to f32 lanes and
/// saturate any nonzero value to exactly 1.0, mask with an ordered `>=`
/// comparison against the broadcast threshold, multiply to get per-lane
/// contributions, then convert each 4-lane half to f64 and add into two
/// independent accumulators. The leftover `len % 8` elements go through the
/// scalar predicate with f64 accumulation.
///
/// # Safety
///
/// The running CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_active_balances_wide(view: &UsersView<'_>, minimum_balance: f32) -> f64 {
    unsafe {
        let count = view.len();
        let balances = view.balances.as_ptr();
        let active_flags = view.active.as_ptr();

        let threshold = _mm256_set1_ps(minimum_balance);
        let one = _mm256_set1_ps(1.0);

        let mut acc0 = _mm256_setzero_pd();
        let mut acc1 = _mm256_setzero_pd();

        const VECTOR_WIDTH: usize = 8;
        let n8 = (count / VECTOR_WIDTH) * VECTOR_WIDTH;

        let mut i = 0usize;
        while i < n8 {
            let b = _mm256_loadu_ps(balances.add(i));
            let bytes = _mm_loadl_epi64(active_flags.add(i) as *const __m128i);
            let ints = _mm256_cvtepu8_epi32(bytes);
            let active = _mm256_min_ps(_mm256_cvtepi32_ps(ints), one);

            let cmp_mask = _mm256_cmp_ps::<_CMP_GE_OQ>(b, threshold);
            let take = _mm256_and_ps(cmp_mask, active);
            let contrib = _mm256_mul_ps(b, take);

            let low = _mm256_castps256_ps128(contrib);
            let high = _mm256_extractf128_ps::<1>(contrib);

            acc0 = _mm256_add_pd(acc0, _mm256_cvtps_pd(low));
            acc1 = _mm256_add_pd(acc1, _mm256_cvtps_pd(high));

            i += VECTOR_WIDTH;
        }

        let acc = _mm256_add_pd(acc0, acc1);
        let low = _mm256_castpd256_pd128(acc);
        let high = _mm256_extractf128_pd::<1>(acc);
        let sum = _mm_add_pd(low, high);
        let mut accumulated = _mm_cvtsd_f64(sum) + _mm_cvtsd_f64(_mm_unpackhi_pd(sum, sum));

        while i < count {
            if *active_flags.add(i) != 0 && *balances.add(i) >= minimum_balance {
                accumulated += *balances.add(i) as f64;
            }
            i += 1;
        }

        accumulated
    }
}

/// 16-element reducer staying in f32: two independent 8-lane streams per
/// iteration with software prefetch on both input columns. Suited to
/// cache-friendly workloads where f32 error accumulation is acceptable.
///
/// # Safety
///
/// The running CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_active_balances_unrolled(view: &UsersView<'_>, minimum_balance: f32) -> f32 {
    unsafe {
        let count = view.len();
        let balances = view.balances.as_ptr();
        let active_flags = view.active.as_ptr();

        let threshold = _mm256_set1_ps(minimum_balance);
        let one = _mm256_set1_ps(1.0);

        let mut acc0 = _mm256_setzero_ps();
        let mut acc1 = _mm256_setzero_ps();

        const VECTOR_WIDTH: usize = 16;
        let n16 = (count / VECTOR_WIDTH) * VECTOR_WIDTH;

        let mut i = 0usize;
        while i < n16 {
            // wrapping_add keeps the hint valid near the end of the columns.
            _mm_prefetch::<_MM_HINT_T0>(
                (balances.add(i) as *const i8).wrapping_add(PREFETCH_DISTANCE),
            );
            _mm_prefetch::<_MM_HINT_T0>(
                (active_flags.add(i) as *const i8).wrapping_add(PREFETCH_DISTANCE),
            );

            let b0 = _mm256_loadu_ps(balances.add(i));
            let bytes0 = _mm_loadl_epi64(active_flags.add(i) as *const __m128i);
            let active0 = _mm256_min_ps(_mm256_cvtepi32_ps(_mm256_cvtepu8_epi32(bytes0)), one);

            let cmp0 = _mm256_cmp_ps::<_CMP_GE_OQ>(b0, threshold);
            let contrib0 = _mm256_mul_ps(b0, _mm256_and_ps(cmp0, active0));

            acc0 = _mm256_add_ps(acc0, contrib0);

            let b1 = _mm256_loadu_ps(balances.add(i + 8));
            let bytes1 = _mm_loadl_epi64(active_flags.add(i + 8) as *const __m128i);
            let active1 = _mm256_min_ps(_mm256_cvtepi32_ps(_mm256_cvtepu8_epi32(bytes1)), one);

            let cmp1 = _mm256_cmp_ps::<_CMP_GE_OQ>(b1, threshold);
            let contrib1 = _mm256_mul_ps(b1, _mm256_and_ps(cmp1, active1));

            acc1 = _mm256_add_ps(acc1, contrib1);

            i += VECTOR_WIDTH;
        }

        let acc = _mm256_add_ps(acc0, acc1);
        let low = _mm256_castps256_ps128(acc);
        let high = _mm256_extractf128_ps::<1>(acc);
        let mut sum = _mm_add_ps(low, high);
        sum = _mm_hadd_ps(sum, sum);
        sum = _mm_hadd_ps(sum, sum);

        let mut accumulated = _mm_cvtss_f32(sum);

        while i < count {
            if *active_flags.add(i) != 0 && *balances.add(i) >= minimum_balance {
                accumulated += *balances.add(i);
            }
            i += 1;
        }

        accumulated
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/simd/avx2.rs"]
mod tests;
