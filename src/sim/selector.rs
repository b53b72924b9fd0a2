//! Random selection and spin geometry
//!
//! The pointer sits at the top of the wheel. Segment 0 starts at the pointer
//! and segments run clockwise, each `360 / n` degrees wide. Rotating the
//! wheel clockwise by `r` degrees puts wheel-local angle `(360 - r) mod 360`
//! under the pointer.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::consts::ANGLE_EPSILON;
use crate::normalize_degrees;

/// Outcome of planning a spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    /// Segment that will come to rest under the pointer
    pub index: usize,
    /// Forward rotation to add to the current rotation (degrees, > 0)
    pub delta: f64,
    /// Full decorative turns included in `delta`
    pub extra_turns: u32,
}

/// Width of one segment in degrees
#[inline]
pub fn segment_angle(n: usize) -> f64 {
    360.0 / n as f64
}

/// Rotation (mod 360) that puts the midpoint of segment `index` under the pointer
#[inline]
pub fn resting_angle(index: usize, n: usize) -> f64 {
    let a = segment_angle(n);
    normalize_degrees(360.0 - (index as f64 * a + a / 2.0))
}

/// Pick an index uniformly in `[0, n)`. `n` must be non-zero.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, n: usize) -> usize {
    debug_assert!(n > 0, "pick_index on an empty pool");
    rng.random_range(0..n)
}

/// Plan a spin that lands on `index` after `extra_turns` full turns.
pub fn plan_spin_to(index: usize, n: usize, current_rotation: f64, extra_turns: u32) -> SpinPlan {
    debug_assert!(index < n, "spin target {} outside pool of {}", index, n);
    let current = normalize_degrees(current_rotation);
    let mut to_target = normalize_degrees(resting_angle(index, n) - current);
    // Already resting on the target: go round once so the wheel still moves
    if to_target < ANGLE_EPSILON {
        to_target += 360.0;
    }
    SpinPlan {
        index,
        delta: to_target + 360.0 * extra_turns as f64,
        extra_turns,
    }
}

/// Pick a random target and plan a spin to it.
pub fn plan_spin<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    current_rotation: f64,
    turns: RangeInclusive<u32>,
) -> SpinPlan {
    let index = pick_index(rng, n);
    let extra_turns = rng.random_range(turns);
    plan_spin_to(index, n, current_rotation, extra_turns)
}

/// Segment currently under the pointer for a wheel rotated by `rotation` degrees
pub fn segment_under_pointer(rotation: f64, n: usize) -> usize {
    debug_assert!(n > 0, "segment_under_pointer on an empty wheel");
    if n == 0 {
        return 0;
    }
    let local = normalize_degrees(360.0 - normalize_degrees(rotation));
    let index = (local / segment_angle(n)).floor() as usize;
    index.min(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Angular distance from the pointer to the midpoint of `index`
    fn midpoint_error(rotation: f64, index: usize, n: usize) -> f64 {
        let local = normalize_degrees(360.0 - normalize_degrees(rotation));
        let a = segment_angle(n);
        let mid = index as f64 * a + a / 2.0;
        let diff = normalize_degrees(local - mid);
        diff.min(360.0 - diff)
    }

    #[test]
    fn test_resting_angles_three_segments() {
        assert!((resting_angle(0, 3) - 300.0).abs() < 1e-9);
        assert!((resting_angle(1, 3) - 180.0).abs() < 1e-9);
        assert!((resting_angle(2, 3) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_segment_always_wins() {
        let plan = plan_spin_to(0, 1, 0.0, 3);
        assert_eq!(segment_under_pointer(plan.delta, 1), 0);
        assert!(plan.delta > 3.0 * 360.0);
    }

    #[test]
    fn test_zero_offset_still_turns() {
        // Start already resting on segment 1 of 4
        let start = resting_angle(1, 4);
        let plan = plan_spin_to(1, 4, start, 0);
        assert!((plan.delta - 360.0).abs() < 1e-9);
        assert_eq!(segment_under_pointer(start + plan.delta, 4), 1);
    }

    #[test]
    fn test_plan_spin_respects_turn_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let plan = plan_spin(&mut rng, 6, 123.4, 3..=5);
            assert!((3..=5).contains(&plan.extra_turns));
            assert!(plan.index < 6);
            assert!(plan.delta > 3.0 * 360.0);
            assert!(plan.delta <= 6.0 * 360.0);
        }
    }

    #[test]
    fn test_pick_index_covers_all_segments() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[pick_index(&mut rng, 5)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic(expected = "empty wheel")]
    fn test_pointer_on_empty_wheel() {
        segment_under_pointer(90.0, 0);
    }

    proptest! {
        #[test]
        fn prop_index_in_range(seed in any::<u64>(), n in 1usize..500) {
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert!(pick_index(&mut rng, n) < n);
        }

        #[test]
        fn prop_spin_lands_on_midpoint(
            n in 1usize..200,
            pick in any::<prop::sample::Index>(),
            rotation in 0.0f64..1.0e6,
            extra_turns in 0u32..6,
        ) {
            let index = pick.index(n);
            let plan = plan_spin_to(index, n, rotation, extra_turns);
            prop_assert!(plan.delta > 0.0);
            let final_rotation = rotation + plan.delta;
            prop_assert!(final_rotation > rotation);
            prop_assert!(midpoint_error(final_rotation, index, n) < 1e-6);
            prop_assert_eq!(segment_under_pointer(final_rotation, n), index);
        }
    }
}
