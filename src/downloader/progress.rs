// Progress normalization: provider byte counts -> fractions in [0, 1]

/// Convert one provider progress notification into a display fraction.
///
/// `(total - remaining) / total`, clamped to [0, 1]. A zero total
/// reports no measurable progress instead of dividing by zero.
pub fn transfer_fraction(total_bytes: u64, bytes_remaining: u64) -> f32 {
    if total_bytes == 0 {
        return 0.0;
    }
    let done = total_bytes.saturating_sub(bytes_remaining);
    (done as f32 / total_bytes as f32).clamp(0.0, 1.0)
}

/// Keeps the observable fraction non-decreasing within one operation.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: f32,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to 0.0 at the start of a new operation.
    pub fn reset(&mut self) {
        self.last = 0.0;
    }

    /// Returns the fraction to display, or `None` when showing it
    /// would move the bar backwards.
    pub fn observe(&mut self, fraction: f32) -> Option<f32> {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction >= self.last {
            self.last = fraction;
            Some(fraction)
        } else {
            None
        }
    }

    pub fn current(&self) -> f32 {
        self.last
    }
}
