use std::time::Duration;

/// Evenly spaced sample points across a video.
///
/// With `K = count` and `interval = floor(duration / (K + 1))` in whole milliseconds,
/// point `i` is `interval * i + offset` for `i = 1..=K`. Points pushed past the end by
/// the offset wrap around to the start, so a refreshed mosaic still lands inside the video.
#[must_use]
pub fn sample_points(duration: Duration, count: usize, offset: Duration) -> Vec<Duration> {
    let total_ms = duration.as_millis() as u64;
    if count == 0 || total_ms == 0 {
        return Vec::new();
    }

    let interval_ms = total_ms / (count as u64 + 1);
    let offset_ms = offset.as_millis() as u64;

    (1..=count as u64)
        .map(|i| (interval_ms * i + offset_ms) % total_ms)
        .map(Duration::from_millis)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_points_split_into_fifths() {
        let points = sample_points(Duration::from_secs(100), 4, Duration::ZERO);
        assert_eq!(
            points,
            vec![
                Duration::from_secs(20),
                Duration::from_secs(40),
                Duration::from_secs(60),
                Duration::from_secs(80),
            ]
        );
    }

    #[test]
    fn test_interval_is_floored() {
        let points = sample_points(Duration::from_millis(1001), 4, Duration::ZERO);
        assert_eq!(points[0], Duration::from_millis(200));
        assert_eq!(points[3], Duration::from_millis(800));
    }

    #[test]
    fn test_offset_shifts_and_wraps() {
        let points = sample_points(Duration::from_secs(100), 4, Duration::from_secs(30));
        assert_eq!(
            points,
            vec![
                Duration::from_secs(50),
                Duration::from_secs(70),
                Duration::from_secs(90),
                Duration::from_secs(10),
            ]
        );
    }

    #[test]
    fn test_points_increase_and_stay_in_range() {
        let duration = Duration::from_secs(3600);
        let points = sample_points(duration, 54, Duration::ZERO);
        assert_eq!(points.len(), 54);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
        assert!(points.iter().all(|p| *p < duration));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(sample_points(Duration::ZERO, 4, Duration::ZERO).is_empty());
        assert!(sample_points(Duration::from_secs(10), 0, Duration::ZERO).is_empty());
    }
}
