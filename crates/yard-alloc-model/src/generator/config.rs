// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::fmt::Display;

use rand::Rng;
use rand_distr::{Exp, Poisson};

use super::err::ArrivalGenConfigBuildError;

/// Configuration for synthetic arrival generation.
///
/// The distributions are validated and built once, so a config that exists
/// can always be sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalGenConfig {
    pub(crate) group_count: usize,
    pub(crate) mean_group_size: f64,
    pub(crate) long_ratio: f64,
    pub(crate) mean_dwell: f64,
    pub(crate) group_size_distribution: Poisson<f64>,
    pub(crate) dwell_distribution: Exp<f64>,
    pub(crate) seed: u64,
}

impl ArrivalGenConfig {
    pub fn new(
        group_count: usize,
        mean_group_size: f64,
        long_ratio: f64,
        mean_dwell: f64,
        seed: u64,
    ) -> Result<Self, ArrivalGenConfigBuildError> {
        use ArrivalGenConfigBuildError::*;
        if !(0.0..=1.0).contains(&long_ratio) {
            return Err(InvalidLongRatio(long_ratio));
        }
        let group_size_distribution =
            Poisson::new(mean_group_size).map_err(|_| InvalidMeanGroupSize(mean_group_size))?;
        if !(mean_dwell.is_finite() && mean_dwell > 0.0) {
            return Err(InvalidMeanDwell(mean_dwell));
        }
        let dwell_distribution = Exp::new(mean_dwell.recip()).map_err(|_| InvalidMeanDwell(mean_dwell))?;

        Ok(Self {
            group_count,
            mean_group_size,
            long_ratio,
            mean_dwell,
            group_size_distribution,
            dwell_distribution,
            seed,
        })
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.group_count
    }
    #[inline]
    pub fn mean_group_size(&self) -> f64 {
        self.mean_group_size
    }
    /// Probability that a group is of the long size class.
    #[inline]
    pub fn long_ratio(&self) -> f64 {
        self.long_ratio
    }
    #[inline]
    pub fn mean_dwell(&self) -> f64 {
        self.mean_dwell
    }
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Display for ArrivalGenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ArrivalGenConfig {{ group_count: {}, mean_group_size: {}, long_ratio: {}, mean_dwell: {}, seed: {} }}",
            self.group_count, self.mean_group_size, self.long_ratio, self.mean_dwell, self.seed
        )
    }
}

/// Builder for `ArrivalGenConfig`.
pub struct ArrivalGenConfigBuilder {
    // Required
    group_count: Option<usize>,

    // Optional with defaults
    mean_group_size: f64,
    long_ratio: f64,
    mean_dwell: f64,
    seed: u64,
}

impl Default for ArrivalGenConfigBuilder {
    fn default() -> Self {
        Self {
            group_count: None,
            mean_group_size: 6.5,
            long_ratio: 0.6,
            mean_dwell: 100.0,
            seed: rand::rng().random(),
        }
    }
}

impl ArrivalGenConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn group_count(mut self, v: usize) -> Self {
        self.group_count = Some(v);
        self
    }
    #[inline]
    pub fn mean_group_size(mut self, v: f64) -> Self {
        self.mean_group_size = v;
        self
    }
    #[inline]
    pub fn long_ratio(mut self, v: f64) -> Self {
        self.long_ratio = v;
        self
    }
    #[inline]
    pub fn mean_dwell(mut self, v: f64) -> Self {
        self.mean_dwell = v;
        self
    }
    pub fn random_seed(mut self) -> Self {
        self.seed = rand::rng().random();
        self
    }
    #[inline]
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    pub fn build(self) -> Result<ArrivalGenConfig, ArrivalGenConfigBuildError> {
        use ArrivalGenConfigBuildError::*;
        let group_count = self.group_count.ok_or(MissingGroupCount)?;
        ArrivalGenConfig::new(
            group_count,
            self.mean_group_size,
            self.long_ratio,
            self.mean_dwell,
            self.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_group_count() {
        let err = ArrivalGenConfigBuilder::new().seed(1).build().unwrap_err();
        assert_eq!(err, ArrivalGenConfigBuildError::MissingGroupCount);
    }

    #[test]
    fn test_builder_applies_defaults() {
        let config = ArrivalGenConfigBuilder::new()
            .group_count(12)
            .seed(9)
            .build()
            .unwrap();
        assert_eq!(config.group_count(), 12);
        assert_eq!(config.mean_group_size(), 6.5);
        assert_eq!(config.long_ratio(), 0.6);
        assert_eq!(config.seed(), 9);
    }

    #[test]
    fn test_builder_rejects_bad_parameters() {
        let base = || ArrivalGenConfigBuilder::new().group_count(3).seed(1);
        assert_eq!(
            base().long_ratio(1.5).build().unwrap_err(),
            ArrivalGenConfigBuildError::InvalidLongRatio(1.5)
        );
        assert_eq!(
            base().mean_group_size(0.0).build().unwrap_err(),
            ArrivalGenConfigBuildError::InvalidMeanGroupSize(0.0)
        );
        assert_eq!(
            base().mean_dwell(-2.0).build().unwrap_err(),
            ArrivalGenConfigBuildError::InvalidMeanDwell(-2.0)
        );
    }
}
