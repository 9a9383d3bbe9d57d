/// Upper bounds of buckets 1..=6 in whole megabytes
///
/// Append-only: the histogram is keyed by bucket index.
///
/// | bucket | range |
/// |---|---|
/// | 0 | 0 MB, or fewer than seven days of history |
/// | 1 | (0, 50) |
/// | 2 | [50, 100) |
/// | 3 | [100, 200) |
/// | 4 | [200, 400) |
/// | 5 | [400, 700) |
/// | 6 | [700, 1500) |
/// | 7 | 1500 and above |
pub const BANDWIDTH_SAVINGS_BUCKETS: [u64; 6] = [50, 100, 200, 400, 700, 1500];

/// Number of histogram buckets, also the exclusive maximum sample
pub const BUCKET_COUNT: usize = BANDWIDTH_SAVINGS_BUCKETS.len() + 2;

const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

/// Bucket index for a total in whole megabytes
pub fn bucket_for_megabytes(megabytes: u64) -> usize {
    if megabytes == 0 {
        return 0;
    }
    1 + BANDWIDTH_SAVINGS_BUCKETS
        .iter()
        .take_while(|&&upper| megabytes >= upper)
        .count()
}

/// Bucket index for a total in bytes, truncated to whole megabytes
pub fn bucket_for_total(total_bytes: u64) -> usize {
    bucket_for_megabytes(total_bytes / BYTES_PER_MEGABYTE)
}
