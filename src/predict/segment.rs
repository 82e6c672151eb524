use std::ops::Range;

/// Split an above-horizon series into contiguous half-open index ranges.
///
/// A pass still in progress at the last sample is closed at `above.len()`;
/// it is truncated by the forecast window, not dropped.
pub fn segment_passes(above: &[bool]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut pass_start: Option<usize> = None;

    for (j, &is_above) in above.iter().enumerate() {
        match (is_above, pass_start) {
            (true, None) => pass_start = Some(j),
            (false, Some(start)) => {
                ranges.push(start..j);
                pass_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = pass_start {
        ranges.push(start..above.len());
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    const F: bool = false;
    const T: bool = true;

    #[test]
    fn single_interior_pass() {
        assert_eq!(segment_passes(&[F, F, T, T, T, F, F]), vec![2..5]);
    }

    #[test]
    fn open_pass_at_window_end_is_kept() {
        let above = [F, F, T, F, F, T, T];
        assert_eq!(segment_passes(&above), vec![2..3, 5..7]);
    }

    #[test]
    fn pass_in_progress_at_window_start() {
        assert_eq!(segment_passes(&[T, T, F, T]), vec![0..2, 3..4]);
    }

    #[test]
    fn always_above_is_one_pass() {
        assert_eq!(segment_passes(&[T; 5]), vec![0..5]);
    }

    #[test]
    fn nothing_above_or_empty() {
        assert!(segment_passes(&[F; 4]).is_empty());
        assert!(segment_passes(&[]).is_empty());
    }

    #[test]
    fn ranges_never_overlap() {
        let above = [T, F, T, T, F, F, T, F, T];
        let ranges = segment_passes(&above);
        for pair in ranges.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
        for range in &ranges {
            assert!(above[range.clone()].iter().all(|&a| a));
        }
    }
}
