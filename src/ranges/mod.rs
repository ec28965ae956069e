//! Contig intervals and range validation.
//!
//! All ranges here are zero-based and *right-inclusive*, i.e. `chrM:0-3` covers
//! four basepairs.

use std::fmt;
use std::str::FromStr;

use crate::{error::TwoBitError, traits::GenericInterval, Position};

/// A zero-based, right-inclusive range on a named contig.
///
/// Construction does not validate `start <= stop`; that is checked when the
/// interval is used in a query (see [`validate_range`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContigInterval {
    pub contig: String,
    pub start: Position,
    pub stop: Position,
}

impl ContigInterval {
    /// Create a new zero-based right-inclusive interval.
    pub fn new(contig: impl Into<String>, start: Position, stop: Position) -> Self {
        Self {
            contig: contig.into(),
            start,
            stop,
        }
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn stop(&self) -> Position {
        self.stop
    }

    /// Check that `start <= stop`.
    pub fn validate(&self) -> Result<(), TwoBitError> {
        validate_range(self.start, self.stop)
    }
}

impl GenericInterval for ContigInterval {
    fn start(&self) -> Position {
        self.start
    }
    fn stop(&self) -> Position {
        self.stop
    }
}

impl fmt::Display for ContigInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.stop)
    }
}

/// Parse a `contig:start-stop` region string. Positions are zero-based and inclusive,
/// and may contain `,` thousands separators (e.g. `chr1:1,000-2,000`).
impl FromStr for ContigInterval {
    type Err = TwoBitError;

    fn from_str(region: &str) -> Result<Self, Self::Err> {
        let invalid = || TwoBitError::InvalidRegion(region.to_string());
        let (contig, coords) = region.rsplit_once(':').ok_or_else(invalid)?;
        let (start, stop) = coords.split_once('-').ok_or_else(invalid)?;
        if contig.is_empty() {
            return Err(invalid());
        }
        let start: Position = start.replace(',', "").trim().parse()?;
        let stop: Position = stop.replace(',', "").trim().parse()?;
        Ok(ContigInterval::new(contig, start, stop))
    }
}

/// Validates that `start` is not after `stop`.
///
/// This never clamps or reorders: a reversed range is a caller error.
pub fn validate_range(start: Position, stop: Position) -> Result<(), TwoBitError> {
    if start > stop {
        return Err(TwoBitError::InvalidRange(start, stop));
    }
    Ok(())
}

/// Clamp a validated inclusive range to a sequence of `length` basepairs.
///
/// # Returns
/// `None` if the range starts at or past the end of the sequence.
pub fn clamp_range(
    start: Position,
    stop: Position,
    length: Position,
) -> Option<(Position, Position)> {
    if start >= length {
        return None;
    }
    Some((start, stop.min(length - 1)))
}

#[cfg(test)]
mod tests {
    use super::{clamp_range, validate_range, ContigInterval};
    use crate::{prelude::*, traits::GenericInterval, Position};

    #[test]
    fn test_invalid_range_start_stop() {
        let result = validate_range(5, 1);
        assert!(matches!(result, Err(TwoBitError::InvalidRange(5, 1))));
    }

    #[test]
    fn test_single_base_range_is_valid() {
        assert!(validate_range(7, 7).is_ok());
        assert_eq!(ContigInterval::new("chr1", 7, 7).width(), 1);
    }

    #[test]
    fn test_width_at_position_limits() {
        let whole = ContigInterval::new("chr1", 0, Position::MAX);
        assert!(whole.validate().is_ok());
        assert_eq!(whole.width(), Position::MAX as u64 + 1);
        assert_eq!(ContigInterval::new("chr1", Position::MAX, Position::MAX).width(), 1);
        assert_eq!(ContigInterval::new("chr1", 10, 2).width(), 0);
    }

    #[test]
    fn test_clamp_range() {
        assert_eq!(clamp_range(0, 3, 10), Some((0, 3)));
        assert_eq!(clamp_range(8, 20, 10), Some((8, 9)));
        assert_eq!(clamp_range(10, 20, 10), None);
        assert_eq!(clamp_range(0, 0, 0), None);
    }

    #[test]
    fn test_parse_region() {
        let range: ContigInterval = "chrM:0-3".parse().unwrap();
        assert_eq!(range, ContigInterval::new("chrM", 0, 3));

        let range: ContigInterval = "chr1:1,000-2,000".parse().unwrap();
        assert_eq!(range.as_tuple(), (1000, 2000));

        // names containing ':' keep everything before the final colon
        let range: ContigInterval = "HLA:A*01:5-9".parse().unwrap();
        assert_eq!(range.contig(), "HLA:A*01");
    }

    #[test]
    fn test_parse_region_errors() {
        assert!(matches!(
            "chrM".parse::<ContigInterval>(),
            Err(TwoBitError::InvalidRegion(_))
        ));
        assert!(matches!(
            ":1-2".parse::<ContigInterval>(),
            Err(TwoBitError::InvalidRegion(_))
        ));
        assert!(matches!(
            "chrM:a-2".parse::<ContigInterval>(),
            Err(TwoBitError::ParseIntError(_))
        ));
    }

    #[test]
    fn test_reversed_region_parses_but_fails_validation() {
        let range: ContigInterval = "chrM:10-2".parse().unwrap();
        assert!(matches!(
            range.validate(),
            Err(TwoBitError::InvalidRange(10, 2))
        ));
    }

    #[test]
    fn test_overlap_range() {
        let a = ContigInterval::new("chr1", 5, 10);
        let b = ContigInterval::new("chr1", 10, 20);
        let c = ContigInterval::new("chr1", 11, 20);
        assert_eq!(a.overlap_range(&b), Some((10, 10)));
        assert_eq!(a.overlap_range(&c), None);
    }
}
