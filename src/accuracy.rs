//! Attack outcome from a weapon's accuracy table.

use crate::actor::{AccuracyTable, HitsCrits};

/// Lowest total that lands in the mid band.
pub const MID_BAND: i64 = 8;
/// Lowest total that lands in the high band.
pub const HIGH_BAND: i64 = 16;
/// Lowest total that hits at all.
pub const LOW_BAND: i64 = 2;

/// Hits and crits for one resolved attack roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackOutcome {
    pub hits: u32,
    pub crits: u32,
    pub natural_20: bool,
}

impl AccuracyTable {
    /// The band a roll total falls in, if it hits.
    pub fn band(&self, total: i64) -> Option<&HitsCrits> {
        if total >= HIGH_BAND {
            Some(&self.high)
        } else if total >= MID_BAND {
            Some(&self.mid)
        } else if total >= LOW_BAND {
            Some(&self.low)
        } else {
            None
        }
    }

    /// Resolve a d20 roll.
    ///
    /// A natural 1 misses. A natural 20 adds one crit on top of the band.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bnbstat::actor::{AccuracyTable, HitsCrits};
    ///
    /// let table = AccuracyTable {
    ///     low: HitsCrits { hits: 1, crits: 0 },
    ///     mid: HitsCrits { hits: 2, crits: 0 },
    ///     high: HitsCrits { hits: 2, crits: 1 },
    /// };
    /// let outcome = table.resolve(20, 23);
    /// assert_eq!((outcome.hits, outcome.crits), (2, 2));
    /// ```
    pub fn resolve(&self, natural: i64, total: i64) -> AttackOutcome {
        if natural == 1 {
            return AttackOutcome::default();
        }
        let natural_20 = natural == 20;
        let band = self.band(total).copied().unwrap_or_default();
        AttackOutcome {
            hits: band.hits,
            crits: band.crits + u32::from(natural_20),
            natural_20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AccuracyTable {
        AccuracyTable {
            low: HitsCrits { hits: 1, crits: 0 },
            mid: HitsCrits { hits: 2, crits: 0 },
            high: HitsCrits { hits: 3, crits: 1 },
        }
    }

    #[test]
    fn test_band_edges() {
        let t = table();
        assert_eq!(t.band(1), None);
        assert_eq!(t.band(2).unwrap().hits, 1);
        assert_eq!(t.band(7).unwrap().hits, 1);
        assert_eq!(t.band(8).unwrap().hits, 2);
        assert_eq!(t.band(15).unwrap().hits, 2);
        assert_eq!(t.band(16).unwrap().hits, 3);
    }

    #[test]
    fn test_natural_one_misses() {
        assert_eq!(table().resolve(1, 30), AttackOutcome::default());
    }

    #[test]
    fn test_low_total_misses() {
        let outcome = table().resolve(2, 0);
        assert_eq!(outcome.hits, 0);
        assert_eq!(outcome.crits, 0);
    }
}
