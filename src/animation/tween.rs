use crate::{animation::ease::Ease, animation::track::Lerp};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Play once and hold the end value.
    Once,
    /// Restart from `from` every period.
    Loop,
    /// Play forward, then backward, forever.
    Mirror,
}

/// Time-driven transition from `from` to `to`, sampled at seconds since some origin
/// (mount, or the moment a presentation became visible).
#[derive(Clone, Debug)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub delay_s: f64,
    pub duration_s: f64,
    pub ease: Ease,
    pub repeat: Repeat,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn new(from: T, to: T, duration_s: f64) -> Self {
        Self {
            from,
            to,
            delay_s: 0.0,
            duration_s,
            ease: Ease::Linear,
            repeat: Repeat::Once,
        }
    }

    pub fn delay(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Linear progress in `[0, 1]` before easing.
    pub fn progress(&self, t_s: f64) -> f64 {
        let local = if t_s.is_finite() { t_s - self.delay_s } else { 0.0 };
        if local <= 0.0 {
            return 0.0;
        }
        if self.duration_s <= 0.0 {
            return 1.0;
        }

        let cycles = local / self.duration_s;
        match self.repeat {
            Repeat::Once => cycles.min(1.0),
            Repeat::Loop => cycles.fract(),
            Repeat::Mirror => {
                let phase = cycles % 2.0;
                if phase <= 1.0 { phase } else { 2.0 - phase }
            }
        }
    }

    pub fn is_finished(&self, t_s: f64) -> bool {
        self.repeat == Repeat::Once && t_s >= self.delay_s + self.duration_s.max(0.0)
    }

    pub fn sample(&self, t_s: f64) -> T {
        let p = self.progress(t_s);
        T::lerp(&self.from, &self.to, self.ease.apply(p))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
