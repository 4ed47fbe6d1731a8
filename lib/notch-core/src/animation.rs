use std::time::Duration;
use tokio::time::Instant;

/// Overshoot constant of the ease-out-back curve.
const BACK_C1: f64 = 1.70158;
const BACK_C3: f64 = BACK_C1 + 1.0;

/// Trait for types that can be interpolated.
pub trait Interpolatable: Sized + Clone {
    fn interpolate(&self, target: &Self, t: f64) -> Self;
}

impl Interpolatable for f64 {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        self + (target - self) * t
    }
}

/// Eases out past the target and settles back onto it. Exactly 0 at `t = 0` and 1 at
/// `t = 1`, above 1 in between near the end.
pub fn ease_out_back(t: f64) -> f64 {
    let u = t - 1.0;
    1.0 + BACK_C3 * u.powi(3) + BACK_C1 * u.powi(2)
}

pub struct Animator<T>
where
    T: Interpolatable,
{
    pub from: T,
    pub to: T,
    pub duration: Duration,
    pub start_time: Option<Instant>,
    pub ease_fn: fn(f64) -> f64,
    pub animating: bool,
    pub last_value: T,
}

impl<T> Animator<T>
where
    T: Interpolatable,
{
    pub fn new(value: T, ease_fn: fn(f64) -> f64) -> Self {
        Self {
            from: value.clone(),
            to: value.clone(),
            duration: Duration::ZERO,
            start_time: None,
            ease_fn,
            animating: false,
            last_value: value,
        }
    }

    /// Starts a run, replacing any run in progress.
    pub fn start_from(&mut self, from: T, to: T, duration: Duration, now: Instant) {
        self.from = from.clone();
        self.to = to;
        self.duration = duration;
        self.start_time = Some(now);
        self.animating = true;
        self.last_value = from;
    }

    /// Returns Some(new_value) if animating, None if finished. The last value of a run
    /// is always exactly `to`.
    pub fn update(&mut self, now: Instant) -> Option<T> {
        if !self.animating {
            return None;
        }

        let elapsed = self
            .start_time
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or(self.duration);

        if elapsed >= self.duration {
            return Some(self.finish());
        }

        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        let eased_t = (self.ease_fn)(t);
        let value = self.from.interpolate(&self.to, eased_t);
        self.last_value = value.clone();
        Some(value)
    }

    /// Ends the run on its target.
    pub fn finish(&mut self) -> T {
        self.animating = false;
        self.last_value = self.to.clone();
        self.to.clone()
    }

    /// Ends the run where it currently is.
    pub fn stop(&mut self) {
        self.animating = false;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn current_value(&self) -> &T {
        &self.last_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_ease_out_back_endpoints() {
        assert!(ease_out_back(0.0).abs() < EPSILON);
        assert_eq!(ease_out_back(1.0), 1.0);
    }

    #[test]
    fn test_ease_out_back_overshoots() {
        let peak = (1..100)
            .map(|i| ease_out_back(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.05, "peak {peak}");
        assert!(ease_out_back(0.9) > 1.0);
    }

    #[test]
    fn test_update_before_start_is_none() {
        let mut animator = Animator::new(0.0, ease_out_back);
        assert_eq!(animator.update(Instant::now()), None);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_update_interpolates_with_easing() {
        let start = Instant::now();
        let mut animator = Animator::new(0.0, ease_out_back);
        animator.start_from(0.0, 100.0, Duration::from_millis(1000), start);

        let value = animator
            .update(start + Duration::from_millis(500))
            .expect("animating");
        assert!((value - 100.0 * ease_out_back(0.5)).abs() < EPSILON);
        assert!(animator.is_animating());
        assert_eq!(*animator.current_value(), value);
    }

    #[test]
    fn test_update_snaps_to_target() {
        let start = Instant::now();
        let mut animator = Animator::new(10.0, ease_out_back);
        animator.start_from(10.0, 37.3, Duration::from_millis(250), start);

        assert_eq!(animator.update(start + Duration::from_millis(400)), Some(37.3));
        assert!(!animator.is_animating());
        assert_eq!(animator.update(start + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_update() {
        let start = Instant::now();
        let mut animator = Animator::new(1.0, ease_out_back);
        animator.start_from(1.0, 2.0, Duration::ZERO, start);
        assert_eq!(animator.update(start), Some(2.0));
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_restart_replaces_running_run() {
        let start = Instant::now();
        let mut animator = Animator::new(0.0, ease_out_back);
        animator.start_from(0.0, 100.0, Duration::from_millis(1000), start);
        let midway = animator.update(start + Duration::from_millis(400)).unwrap();

        let restart = start + Duration::from_millis(400);
        animator.start_from(midway, 0.0, Duration::from_millis(1000), restart);
        assert_eq!(animator.from, midway);
        assert_eq!(animator.to, 0.0);
        assert_eq!(animator.update(restart), Some(midway));
    }

    #[test]
    fn test_stop_keeps_current_value() {
        let start = Instant::now();
        let mut animator = Animator::new(0.0, ease_out_back);
        animator.start_from(0.0, 100.0, Duration::from_millis(1000), start);
        let value = animator.update(start + Duration::from_millis(100)).unwrap();

        animator.stop();
        assert!(!animator.is_animating());
        assert_eq!(*animator.current_value(), value);
    }
}
