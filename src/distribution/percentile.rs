use crate::error::{Error, Result};

/// Index of the nearest-rank percentile in an ascending-sorted sequence of
/// length `n`: `ceil(percentile / 100 * n)` used as a 0-based index. Ranks
/// that round up to `n` (the 100th percentile and neighbors) are clamped to
/// `n - 1`, selecting the maximum.
pub fn nearest_rank_index(percentile: f64, n: usize) -> Result<usize> {
    if !(percentile > 0.0 && percentile <= 100.0) {
        return Err(Error::InvalidPercentile(percentile));
    }
    if n == 0 {
        return Err(Error::EmptyDistribution);
    }
    let index = (percentile / 100.0 * n as f64).ceil() as usize;
    Ok(index.min(n - 1))
}

/// Percentile cutoff of an ascending-sorted distribution.
pub fn nearest_rank_cutoff(sorted: &[u32], percentile: f64) -> Result<u32> {
    let index = nearest_rank_index(percentile, sorted.len())?;
    Ok(sorted[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ninety_fifth_of_ten_thousand_is_index_9500() {
        assert_eq!(nearest_rank_index(95.0, 10000).unwrap(), 9500);
    }

    #[test]
    fn hundredth_percentile_is_clamped_to_the_last_index() {
        assert_eq!(nearest_rank_index(100.0, 10000).unwrap(), 9999);
        assert_eq!(nearest_rank_index(100.0, 1).unwrap(), 0);
    }

    #[test]
    fn fractional_ranks_round_up() {
        // 95.0 of 101 -> ceil(95.95) = 96
        assert_eq!(nearest_rank_index(95.0, 101).unwrap(), 96);
        // 50.0 of 3 -> ceil(1.5) = 2
        assert_eq!(nearest_rank_index(50.0, 3).unwrap(), 2);
    }

    #[test]
    fn out_of_range_percentiles_are_rejected() {
        assert!(matches!(
            nearest_rank_index(0.0, 10),
            Err(Error::InvalidPercentile(_))
        ));
        assert!(matches!(
            nearest_rank_index(-5.0, 10),
            Err(Error::InvalidPercentile(_))
        ));
        assert!(matches!(
            nearest_rank_index(100.1, 10),
            Err(Error::InvalidPercentile(_))
        ));
    }

    #[test]
    fn empty_distribution_is_rejected() {
        assert!(matches!(
            nearest_rank_index(95.0, 0),
            Err(Error::EmptyDistribution)
        ));
    }

    #[test]
    fn cutoff_reads_the_sorted_distribution() {
        let sorted: Vec<u32> = (0..100).collect();
        // ceil(0.95 * 100) = 95
        assert_eq!(nearest_rank_cutoff(&sorted, 95.0).unwrap(), 95);
        assert_eq!(nearest_rank_cutoff(&sorted, 100.0).unwrap(), 99);
    }
}
