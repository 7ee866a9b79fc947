/// Value model behind a slider, mirroring an HTML range input.
///
/// The value is always inside `min..=max` and, when a step is set, on the
/// step grid anchored at `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeInput {
    min: f64,
    max: f64,
    step: Option<f64>,
    value: f64,
}

impl RangeInput {
    /// Creates a range input. `max` is raised to `min` when smaller.
    pub fn new(min: f64, max: f64, step: Option<f64>, value: f64) -> Self {
        let mut range = Self {
            min,
            max: max.max(min),
            step: step.filter(|s| s.is_finite() && *s > 0.0),
            value: min,
        };
        range.set_value(value);
        range
    }

    /// The playback progress slider, in percent.
    pub fn progress() -> Self {
        Self::new(0.0, 100.0, None, 0.0)
    }

    /// The volume slider, from silent to full in hundredths.
    pub fn volume(value: f64) -> Self {
        Self::new(0.0, 1.0, Some(0.01), value)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Sets the value, clamping and snapping it to the step grid.
    ///
    /// Non-finite values are ignored.
    pub fn set_value(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let mut value = value.clamp(self.min, self.max);
        if let Some(step) = self.step {
            let steps = ((value - self.min) / step).round();
            value = (self.min + steps * step).clamp(self.min, self.max);
        }
        self.value = value;
    }

    /// Fill fraction of the track, `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Sets the value from a pointer position expressed as a track fraction.
    pub fn set_ratio(&mut self, ratio: f64) -> f64 {
        if ratio.is_finite() {
            let ratio = ratio.clamp(0.0, 1.0);
            self.set_value(self.min + (self.max - self.min) * ratio);
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_slider_spans_percentages() {
        let mut progress = RangeInput::progress();
        assert_eq!(progress.value(), 0.0);
        progress.set_value(42.5);
        assert_eq!(progress.value(), 42.5);
        progress.set_value(250.0);
        assert_eq!(progress.value(), 100.0);
        progress.set_value(-3.0);
        assert_eq!(progress.value(), 0.0);
    }

    #[test]
    fn volume_slider_snaps_to_hundredths() {
        let mut volume = RangeInput::volume(1.0);
        volume.set_value(0.333);
        assert!((volume.value() - 0.33).abs() < 1e-9);
        volume.set_value(0.006);
        assert!((volume.value() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn ratio_maps_onto_the_range() {
        let mut volume = RangeInput::volume(0.0);
        let value = volume.set_ratio(0.5);
        assert!((value - 0.5).abs() < 1e-9);
        assert!((volume.ratio() - 0.5).abs() < 1e-9);

        volume.set_ratio(3.0);
        assert_eq!(volume.value(), 1.0);
    }

    #[test]
    fn non_finite_input_keeps_previous_value() {
        let mut progress = RangeInput::progress();
        progress.set_value(10.0);
        progress.set_value(f64::NAN);
        progress.set_ratio(f64::INFINITY);
        assert_eq!(progress.value(), 10.0);
    }

    #[test]
    fn degenerate_range_has_zero_ratio() {
        let range = RangeInput::new(5.0, 1.0, None, 3.0);
        assert_eq!(range.max(), 5.0);
        assert_eq!(range.value(), 5.0);
        assert_eq!(range.ratio(), 0.0);
    }
}
