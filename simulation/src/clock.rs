use std::time::Duration;

/// Converts host timestamps into frame deltas.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FrameClock {
    last: Option<Duration>,
}

impl FrameClock {
    /// Returns the time since the previous call, or zero after a reset.
    ///
    /// Timestamps that run backwards yield a zero delta.
    pub(crate) fn delta(&mut self, now: Duration) -> Duration {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last = Some(now);
        dt
    }

    pub(crate) fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_after_reset_has_zero_delta() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.delta(Duration::from_millis(500)), Duration::ZERO);
        assert_eq!(
            clock.delta(Duration::from_millis(516)),
            Duration::from_millis(16)
        );

        clock.reset();
        assert_eq!(clock.delta(Duration::from_millis(900)), Duration::ZERO);
    }

    #[test]
    fn clock_tolerates_backwards_timestamps() {
        let mut clock = FrameClock::default();
        let _ = clock.delta(Duration::from_millis(500));
        assert_eq!(clock.delta(Duration::from_millis(400)), Duration::ZERO);
    }
}
