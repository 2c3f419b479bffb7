use serde::Deserialize;

/// one instruction segment of a route leg, spanning a slice of the leg's
/// shape polyline and carrying an elapsed duration. all fields are optional
/// in the wire format; validation happens in [`Maneuver::span`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Maneuver {
    pub begin_shape_index: Option<i64>,
    pub end_shape_index: Option<i64>,
    pub time: Option<f64>,
}

/// a validated, normalized maneuver: indices are ordered and in bounds for
/// the decoded polyline, and the duration is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManeuverSpan {
    pub begin: usize,
    pub end: usize,
    pub seconds: f64,
}

impl Maneuver {
    /// validates this maneuver against a decoded polyline of `num_points`
    /// vertices. reversed indices are normalized by swapping. missing or
    /// out-of-range indices and non-positive durations yield None: the
    /// maneuver contributes no attribution and is skipped, not repaired.
    /// `begin == end` is a valid degenerate span.
    pub fn span(&self, num_points: usize) -> Option<ManeuverSpan> {
        let begin = self.begin_shape_index?;
        let end = self.end_shape_index?;
        let seconds = self.time.unwrap_or(0.0);
        if seconds <= 0.0 || begin < 0 || end < 0 {
            return None;
        }
        let (begin, end) = if end < begin { (end, begin) } else { (begin, end) };
        let (begin, end) = (begin as usize, end as usize);
        if end >= num_points {
            return None;
        }
        Some(ManeuverSpan {
            begin,
            end,
            seconds,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn maneuver(begin: i64, end: i64, time: f64) -> Maneuver {
        Maneuver {
            begin_shape_index: Some(begin),
            end_shape_index: Some(end),
            time: Some(time),
        }
    }

    #[test]
    fn test_valid_span() {
        let span = maneuver(0, 4, 600.0).span(5).unwrap();
        assert_eq!(span.begin, 0);
        assert_eq!(span.end, 4);
        assert_eq!(span.seconds, 600.0);
    }

    #[test]
    fn test_reversed_indices_are_swapped() {
        let span = maneuver(10, 3, 120.0).span(20).unwrap();
        assert_eq!((span.begin, span.end), (3, 10));
    }

    #[test]
    fn test_zero_duration_is_skipped() {
        assert!(maneuver(0, 4, 0.0).span(5).is_none());
    }

    #[test]
    fn test_out_of_range_is_skipped() {
        assert!(maneuver(0, 5, 60.0).span(5).is_none());
        assert!(maneuver(-1, 3, 60.0).span(5).is_none());
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        assert!(Maneuver::default().span(5).is_none());
        let missing_time = Maneuver {
            begin_shape_index: Some(0),
            end_shape_index: Some(4),
            time: None,
        };
        assert!(missing_time.span(5).is_none());
    }

    #[test]
    fn test_degenerate_span_is_valid() {
        let span = maneuver(2, 2, 30.0).span(5).unwrap();
        assert_eq!((span.begin, span.end), (2, 2));
    }
}
