//! Display size derived from a cluster's member count.

use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};

/// Maps member counts to a marker size for rendering.
///
/// `size = clamp(base * sqrt(count), min, max)`. The curve is increasing and
/// saturates at `max`; doubling the count grows the size by at most a factor
/// of √2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizePolicy {
    #[serde(default = "SizePolicy::default_base")]
    pub base: f64,
    #[serde(default = "SizePolicy::default_min")]
    pub min: f64,
    #[serde(default = "SizePolicy::default_max")]
    pub max: f64,
}

impl SizePolicy {
    const fn default_base() -> f64 {
        16.0
    }

    const fn default_min() -> f64 {
        30.0
    }

    const fn default_max() -> f64 {
        72.0
    }

    pub fn new(base: f64, min: f64, max: f64) -> Result<Self> {
        let policy = Self { base, min, max };
        policy.validate()?;
        Ok(policy)
    }

    /// Size for a primitive with `count` members.
    ///
    /// Never panics: an unvalidated policy with `min > max` yields `max`, and
    /// NaN bounds are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use vibecluster::SizePolicy;
    ///
    /// let policy = SizePolicy::default();
    /// assert_eq!(policy.display_size(1), policy.min);
    /// assert_eq!(policy.display_size(1_000_000), policy.max);
    /// ```
    pub fn display_size(&self, count: u32) -> f64 {
        (self.base * f64::from(count).sqrt()).max(self.min).min(self.max)
    }

    pub fn validate(&self) -> Result<()> {
        if ![self.base, self.min, self.max].iter().all(|v| v.is_finite()) {
            return Err(ClusterError::InvalidConfig(
                "Size policy values must be finite".to_string(),
            ));
        }
        if self.base <= 0.0 || self.min <= 0.0 {
            return Err(ClusterError::InvalidConfig(
                "Size policy base and min must be positive".to_string(),
            ));
        }
        if self.min > self.max {
            return Err(ClusterError::InvalidConfig(format!(
                "Size policy min ({}) exceeds max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self {
            base: Self::default_base(),
            min: Self::default_min(),
            max: Self::default_max(),
        }
    }
}
