//! Grid sizing for kernel dispatch.
//!
//! The problem size becomes the global size; the work-group (local) size is
//! the largest divisor of the problem size that fits under the ceiling, so
//! the global size always splits into whole work-groups.

use crate::error::{Error, Result};

/// Upper bound on work-items per work-group.
pub const MAX_LOCAL_SIZE: usize = 512;

/// One-dimensional NDRange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub global: usize,
    pub local: usize,
}

impl GridSize {
    pub fn for_problem(size: usize) -> Result<Self> {
        Self::with_limit(size, MAX_LOCAL_SIZE)
    }

    /// Like [`GridSize::for_problem`] with an extra device-specific ceiling.
    pub fn with_limit(size: usize, limit: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::EmptyWorkSize);
        }
        let ceiling = limit.clamp(1, MAX_LOCAL_SIZE).min(size);
        let local = (1..=ceiling)
            .rev()
            .find(|candidate| size % candidate == 0)
            .unwrap_or(1);
        Ok(GridSize {
            global: size,
            local,
        })
    }

    pub fn work_groups(&self) -> usize {
        self.global / self.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_problem_is_one_group() {
        let grid = GridSize::for_problem(100).unwrap();
        assert_eq!(grid, GridSize { global: 100, local: 100 });
        assert_eq!(grid.work_groups(), 1);
    }

    #[test]
    fn test_exact_ceiling() {
        let grid = GridSize::for_problem(512).unwrap();
        assert_eq!(grid.local, 512);
    }

    #[test]
    fn test_largest_divisor_under_ceiling() {
        assert_eq!(GridSize::for_problem(1024).unwrap().local, 512);
        assert_eq!(GridSize::for_problem(1000).unwrap().local, 500);
        assert_eq!(GridSize::for_problem(1_048_576).unwrap().local, 512);
        // 600 = 2^3 * 3 * 5^2, largest divisor <= 512 is 300
        assert_eq!(GridSize::for_problem(600).unwrap().local, 300);
    }

    #[test]
    fn test_prime_problem_falls_back_to_single_items() {
        let grid = GridSize::for_problem(1031).unwrap();
        assert_eq!(grid.local, 1);
        assert_eq!(grid.work_groups(), 1031);
    }

    #[test]
    fn test_device_limit_caps_local_size() {
        let grid = GridSize::with_limit(1024, 256).unwrap();
        assert_eq!(grid.local, 256);
        let grid = GridSize::with_limit(1024, 4096).unwrap();
        assert_eq!(grid.local, 512);
        let grid = GridSize::with_limit(10, 0).unwrap();
        assert_eq!(grid.local, 1);
    }

    #[test]
    fn test_zero_problem_rejected() {
        assert!(matches!(
            GridSize::for_problem(0),
            Err(Error::EmptyWorkSize)
        ));
    }

    #[test]
    fn test_global_splits_evenly() {
        for size in [1usize, 7, 48, 513, 777, 4096, 9973, 65_535] {
            let grid = GridSize::for_problem(size).unwrap();
            assert!(grid.local >= 1 && grid.local <= MAX_LOCAL_SIZE);
            assert_eq!(grid.global % grid.local, 0, "size {}", size);
        }
    }
}
