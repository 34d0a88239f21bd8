use std::time::Duration;

use rand::Rng;

/// Cubic Bézier easing curve over the unit square. Randomized once per
/// planner so every trajectory from one instance shares a motion signature.
#[derive(Debug, Clone, Copy)]
pub struct MotionProfile {
    control_points: [(f64, f64); 4],
}

impl MotionProfile {
    /// Interior control points drawn independently; they are not required to
    /// be ordered, so the easing may overshoot and come back.
    pub fn randomized() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            control_points: [
                (0.0, 0.0),
                (rng.gen_range(0.2..0.4), rng.gen_range(0.3..0.7)),
                (rng.gen_range(0.6..0.8), rng.gen_range(0.3..0.7)),
                (1.0, 1.0),
            ],
        }
    }

    /// Identity easing: progress equals t exactly.
    pub fn linear() -> Self {
        Self {
            control_points: [
                (0.0, 0.0),
                (1.0 / 3.0, 1.0 / 3.0),
                (2.0 / 3.0, 2.0 / 3.0),
                (1.0, 1.0),
            ],
        }
    }

    /// Fraction of the way along the path at curve parameter `t` in [0, 1].
    /// Only the curve's y component is read; the path itself stays a straight
    /// line, so the easing governs speed, not direction.
    pub fn progress(&self, t: f64) -> f64 {
        let [p0, p1, p2, p3] = self.control_points;
        let mt = 1.0 - t;
        mt * mt * mt * p0.1
            + 3.0 * mt * mt * t * p1.1
            + 3.0 * mt * t * t * p2.1
            + t * t * t * p3.1
    }
}

/// Produces the intermediate points of a drag gesture: a straight line from
/// start to end whose progression follows the motion profile.
pub struct TrajectoryPlanner {
    duration_secs: f64,
    steps: u32,
    profile: MotionProfile,
}

impl TrajectoryPlanner {
    pub fn new(duration_secs: f64, steps: u32) -> Self {
        Self::with_profile(duration_secs, steps, MotionProfile::randomized())
    }

    pub fn with_profile(duration_secs: f64, steps: u32, profile: MotionProfile) -> Self {
        Self {
            duration_secs,
            steps: steps.max(1),
            profile,
        }
    }

    /// Nominal pause between consecutive trajectory points.
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs / self.steps as f64)
    }

    /// Returns `steps + 1` points; the first is exactly `start`, the last
    /// exactly `end`. Pure function of the inputs and the fixed profile.
    pub fn plan(&self, start: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32)> {
        let (sx, sy) = (start.0 as f64, start.1 as f64);
        let dx = end.0 as f64 - sx;
        let dy = end.1 as f64 - sy;

        (0..=self.steps)
            .map(|i| {
                let t = i as f64 / self.steps as f64;
                let progress = self.profile.progress(t);
                (
                    (sx + dx * progress).round() as i32,
                    (sy + dy * progress).round() as i32,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_has_step_count_plus_one_points_with_exact_endpoints() {
        for steps in [1, 2, 7, 50] {
            let planner = TrajectoryPlanner::new(1.0, steps);
            let points = planner.plan((100, 200), (-40, 900));
            assert_eq!(points.len(), steps as usize + 1);
            assert_eq!(points[0], (100, 200));
            assert_eq!(points[steps as usize], (-40, 900));
        }
    }

    #[test]
    fn linear_profile_reduces_to_lerp() {
        let planner = TrajectoryPlanner::with_profile(1.0, 10, MotionProfile::linear());
        let points = planner.plan((0, 0), (100, 50));
        for (i, &(x, y)) in points.iter().enumerate() {
            let t = i as f64 / 10.0;
            assert!((x as f64 - 100.0 * t).abs() <= 1.0);
            assert!((y as f64 - 50.0 * t).abs() <= 1.0);
        }
    }

    #[test]
    fn zero_length_path_stays_put() {
        let planner = TrajectoryPlanner::new(0.5, 5);
        let points = planner.plan((30, 30), (30, 30));
        assert!(points.iter().all(|&p| p == (30, 30)));
    }

    #[test]
    fn steps_clamped_to_at_least_one() {
        let planner = TrajectoryPlanner::new(1.0, 0);
        let points = planner.plan((0, 0), (10, 10));
        assert_eq!(points.len(), 2);
        assert!(planner.step_interval() > Duration::ZERO);
    }

    #[test]
    fn step_interval_is_duration_over_steps() {
        let planner = TrajectoryPlanner::new(1.0, 50);
        assert_eq!(planner.step_interval(), Duration::from_secs_f64(0.02));
    }
}
