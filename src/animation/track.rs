use crate::{
    animation::ease::Ease,
    foundation::core::Vec2,
    foundation::error::{ReelError, ReelResult},
    foundation::math::{inverse_lerp, lerp},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp(*a, *b, t)
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
    }
}

/// A length that mixes absolute pixels with viewport- and element-relative parts.
///
/// Interpolating `0%` toward `-40vh` is well defined because every unit is carried
/// separately and only summed at resolve time.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Length {
    #[serde(default)]
    pub px: f64,
    /// Percent of the viewport height.
    #[serde(default)]
    pub vh: f64,
    /// Percent of the element's own extent along the same axis.
    #[serde(default)]
    pub percent: f64,
}

impl Length {
    pub const ZERO: Length = Length {
        px: 0.0,
        vh: 0.0,
        percent: 0.0,
    };

    pub fn px(px: f64) -> Self {
        Self { px, ..Self::ZERO }
    }

    pub fn vh(vh: f64) -> Self {
        Self { vh, ..Self::ZERO }
    }

    pub fn percent(percent: f64) -> Self {
        Self {
            percent,
            ..Self::ZERO
        }
    }

    pub fn resolve(self, viewport_height: f64, element_extent: f64) -> f64 {
        self.px + self.vh * viewport_height / 100.0 + self.percent * element_extent / 100.0
    }
}

impl Lerp for Length {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            px: lerp(a.px, b.px, t),
            vh: lerp(a.vh, b.vh, t),
            percent: lerp(a.percent, b.percent, t),
        }
    }
}

/// One breakpoint: at input `at`, the track takes `value`.
#[derive(Clone, Debug)]
pub struct Stop<T> {
    pub at: f64,
    pub value: T,
    pub ease: Ease, // applied toward the next stop
}

/// Piecewise interpolation of `T` over sorted input breakpoints, clamped at both ends.
///
/// Construction validates, so a track always holds at least one stop.
#[derive(Clone, Debug)]
pub struct Track<T> {
    stops: Vec<Stop<T>>,
}

impl<T> Track<T>
where
    T: Lerp + Clone,
{
    /// Linear segments between `inputs[i] -> outputs[i]`.
    pub fn linear(inputs: &[f64], outputs: &[T]) -> ReelResult<Self> {
        if inputs.len() != outputs.len() {
            return Err(ReelError::validation(format!(
                "track has {} inputs but {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        Self::from_stops(
            inputs
                .iter()
                .zip(outputs)
                .map(|(&at, value)| Stop {
                    at,
                    value: value.clone(),
                    ease: Ease::Linear,
                })
                .collect(),
        )
    }

    pub fn from_stops(stops: Vec<Stop<T>>) -> ReelResult<Self> {
        validate_stops(&stops)?;
        Ok(Self { stops })
    }

    pub fn constant(value: T) -> Self {
        Self {
            stops: vec![Stop {
                at: 0.0,
                value,
                ease: Ease::Linear,
            }],
        }
    }

    pub fn stops(&self) -> &[Stop<T>] {
        &self.stops
    }

    pub fn sample(&self, x: f64) -> T {
        let first = &self.stops[0];
        let x = if x.is_finite() { x } else { first.at };

        let idx = self.stops.partition_point(|s| s.at <= x);
        if idx == 0 {
            return first.value.clone();
        }
        if idx >= self.stops.len() {
            return self.stops[self.stops.len() - 1].value.clone();
        }

        let a = &self.stops[idx - 1];
        let b = &self.stops[idx];
        let t = inverse_lerp(a.at, b.at, x).clamp(0.0, 1.0);
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }
}

fn validate_stops<T>(stops: &[Stop<T>]) -> ReelResult<()> {
    if stops.is_empty() {
        return Err(ReelError::validation("track must have at least one stop"));
    }
    if stops.iter().any(|s| !s.at.is_finite()) {
        return Err(ReelError::validation("track stops must be finite"));
    }
    if !stops.windows(2).all(|w| w[0].at <= w[1].at) {
        return Err(ReelError::validation("track stops must be sorted"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
