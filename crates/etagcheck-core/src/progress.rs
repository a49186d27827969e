//! Progress reporting while a local file is being digested.
//!
//! The digest loop hands a snapshot to an optional observer after every part;
//! the CLI turns it into a progress line. Snapshots never influence the result.

/// Snapshot of digest progress for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestProgress {
    /// Bytes read and hashed so far.
    pub bytes_done: u64,
    /// Expected total size in bytes (as given by the caller).
    pub total_bytes: u64,
    /// Number of parts fully hashed.
    pub parts_done: u64,
}

impl DigestProgress {
    /// Fraction complete in [0.0, 1.0]. An empty file counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_done >= self.total_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_of_empty_total_is_one() {
        let p = DigestProgress {
            bytes_done: 0,
            total_bytes: 0,
            parts_done: 1,
        };
        assert_eq!(p.fraction(), 1.0);
        assert!(p.is_complete());
    }

    #[test]
    fn fraction_is_capped() {
        let p = DigestProgress {
            bytes_done: 150,
            total_bytes: 100,
            parts_done: 2,
        };
        assert_eq!(p.fraction(), 1.0);
        let half = DigestProgress {
            bytes_done: 50,
            total_bytes: 100,
            parts_done: 1,
        };
        assert!((half.fraction() - 0.5).abs() < 1e-9);
        assert!(!half.is_complete());
    }
}
