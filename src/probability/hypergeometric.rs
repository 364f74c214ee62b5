//! Hypergeometric draw probabilities.
//!
//! The probability mass function is built without factorials: the term at the
//! mode is fixed at 1, neighbours follow from the ratio of consecutive terms,
//! and the window is normalized at the end. Moving away from the mode every
//! ratio is below one, so nothing overflows. The walk stops on each side once
//! the rest of that tail is negligible, so memory follows the spread of the
//! distribution rather than the width of its support.
//!
//! Distributions wider than [`NORMAL_APPROX_STD_DEV`] are answered with a
//! continuity-corrected normal approximation instead.

use statrs::distribution::{ContinuousCDF, Normal};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Tail mass, relative to the window total, that may be dropped
const NEGLIGIBLE_MASS: f64 = 1e-18;

/// Standard deviation above which the normal approximation is used
pub const NORMAL_APPROX_STD_DEV: f64 = 1e5;

/// Invalid distribution parameters. Never clamped, always reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: i64 },
    #[error("successes in population ({successes}) exceed population size ({population})")]
    SuccessesExceedPopulation { population: u64, successes: u64 },
    #[error("sample size ({sample}) exceeds population size ({population})")]
    SampleExceedsPopulation { population: u64, sample: u64 },
    #[error("distribution for N={population}, K={successes}, n={sample} is too wide to list term by term")]
    TooWideToList {
        population: u64,
        successes: u64,
        sample: u64,
    },
}

/// Hypergeometric distribution with validated parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hypergeometric {
    population: u64,
    successes: u64,
    sample: u64,
}

/// Normalized terms for `start..start + weights.len()`; zero elsewhere
struct Window {
    start: u64,
    weights: Vec<f64>,
}

impl Window {
    fn end(&self) -> u64 {
        self.start + self.weights.len() as u64 - 1
    }

    fn get(&self, k: u64) -> f64 {
        if k < self.start || k > self.end() {
            return 0.0;
        }
        self.weights[(k - self.start) as usize]
    }

    fn sum(&self, from: u64, to: u64) -> f64 {
        let from = from.max(self.start);
        let to = to.min(self.end());
        if from > to {
            return 0.0;
        }
        let terms = &self.weights[(from - self.start) as usize..=(to - self.start) as usize];
        ascending_sum(terms).min(1.0)
    }
}

enum Masses {
    Exact(Window),
    Approximate(Normal),
}

impl Hypergeometric {
    /// `population` (N), `successes` (K) in the population, `sample` (n) drawn
    pub fn new(population: i64, successes: i64, sample: i64) -> Result<Self, DomainError> {
        let population = non_negative("population", population)?;
        let successes = non_negative("successes", successes)?;
        let sample = non_negative("sample", sample)?;

        if successes > population {
            return Err(DomainError::SuccessesExceedPopulation {
                population,
                successes,
            });
        }
        if sample > population {
            return Err(DomainError::SampleExceedsPopulation { population, sample });
        }

        Ok(Hypergeometric {
            population,
            successes,
            sample,
        })
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn sample(&self) -> u64 {
        self.sample
    }

    /// Smallest feasible success count: `max(0, n - (N - K))`
    pub fn min_successes(&self) -> u64 {
        self.sample.saturating_sub(self.population - self.successes)
    }

    /// Largest feasible success count: `min(n, K)`
    pub fn max_successes(&self) -> u64 {
        self.sample.min(self.successes)
    }

    /// Values of k with nonzero probability
    pub fn support(&self) -> RangeInclusive<u64> {
        self.min_successes()..=self.max_successes()
    }

    /// P(X = k); zero for any k outside the support
    pub fn exactly(&self, k: i64) -> f64 {
        let Ok(k) = u64::try_from(k) else {
            return 0.0;
        };
        if !self.support().contains(&k) {
            return 0.0;
        }
        match self.masses() {
            Masses::Exact(window) => window.get(k),
            Masses::Approximate(normal) => continuity_corrected(&normal, k, k),
        }
    }

    /// P(X >= k_min)
    pub fn at_least(&self, k_min: i64) -> f64 {
        self.between(k_min, self.max_successes() as i64)
    }

    /// P(X <= k_max)
    pub fn at_most(&self, k_max: i64) -> f64 {
        self.between(self.min_successes() as i64, k_max)
    }

    /// P(k_min <= X <= k_max), with the range clamped to the support
    pub fn between(&self, k_min: i64, k_max: i64) -> f64 {
        let lo = self.min_successes() as i64;
        let hi = self.max_successes() as i64;
        let from = k_min.max(lo);
        let to = k_max.min(hi);

        if from > to {
            return 0.0;
        }
        if from == lo && to == hi {
            return 1.0;
        }

        match self.masses() {
            Masses::Exact(window) => window.sum(from as u64, to as u64),
            Masses::Approximate(normal) => continuity_corrected(&normal, from as u64, to as u64),
        }
    }

    /// Mean number of successes, `n * K / N` (zero for an empty population)
    pub fn expected(&self) -> f64 {
        if self.population == 0 {
            return 0.0;
        }
        self.sample as f64 * self.successes as f64 / self.population as f64
    }

    pub fn std_dev(&self) -> f64 {
        if self.population < 2 {
            return 0.0;
        }
        let big_n = self.population as f64;
        let p = self.successes as f64 / big_n;
        let q = (self.population - self.successes) as f64 / big_n;
        let fpc = (self.population - self.sample) as f64 / (big_n - 1.0);
        (self.sample as f64 * p * q * fpc).sqrt()
    }

    /// `(k, P(X = k))` for every k with non-negligible probability, lowest k first.
    ///
    /// Fails for distributions too wide to walk term by term.
    pub fn distribution(&self) -> Result<Vec<(u64, f64)>, DomainError> {
        match self.masses() {
            Masses::Exact(window) => Ok((window.start..)
                .zip(window.weights)
                .collect()),
            Masses::Approximate(_) => Err(DomainError::TooWideToList {
                population: self.population,
                successes: self.successes,
                sample: self.sample,
            }),
        }
    }

    fn mode(&self) -> u64 {
        let raw = (self.sample as u128 + 1) * (self.successes as u128 + 1)
            / (self.population as u128 + 2);
        (raw as u64).clamp(self.min_successes(), self.max_successes())
    }

    fn masses(&self) -> Masses {
        let std_dev = self.std_dev();
        if std_dev > NORMAL_APPROX_STD_DEV {
            if let Ok(normal) = Normal::new(self.expected(), std_dev) {
                return Masses::Approximate(normal);
            }
        }
        Masses::Exact(self.window())
    }

    /// Normalized terms around the mode, walking out until each tail is negligible
    fn window(&self) -> Window {
        let lo = self.min_successes();
        let hi = self.max_successes();
        let mode = self.mode();

        let big_k = self.successes as f64;
        let n = self.sample as f64;
        // Failures left in the population beyond those the sample must take
        let spare = (self.population as i128 - self.successes as i128 - self.sample as i128) as f64;

        let mut total = 1.0;

        // P(k+1) / P(k) = (K-k)(n-k) / ((k+1)(N-K-n+k+1))
        let mut above = Vec::new();
        let mut weight = 1.0;
        let mut k = mode;
        while k < hi {
            let kf = k as f64;
            let ratio = (big_k - kf) * (n - kf) / ((kf + 1.0) * (spare + kf + 1.0));
            if rest_is_negligible(weight, ratio, total) {
                break;
            }
            weight *= ratio;
            above.push(weight);
            total += weight;
            k += 1;
        }

        // P(k-1) / P(k) = k(N-K-n+k) / ((K-k+1)(n-k+1))
        let mut below = Vec::new();
        weight = 1.0;
        k = mode;
        while k > lo {
            let kf = k as f64;
            let ratio = kf * (spare + kf) / ((big_k - kf + 1.0) * (n - kf + 1.0));
            if rest_is_negligible(weight, ratio, total) {
                break;
            }
            weight *= ratio;
            below.push(weight);
            total += weight;
            k -= 1;
        }

        let mut weights: Vec<f64> = below.into_iter().rev().collect();
        weights.push(1.0);
        weights.extend(above);

        let total = ascending_sum(&weights);
        for w in &mut weights {
            *w /= total;
        }
        Window { start: k, weights }
    }
}

/// Ratios shrink moving away from the mode, so the remaining tail is bounded
/// by a geometric series in the next ratio.
fn rest_is_negligible(weight: f64, ratio: f64, total: f64) -> bool {
    ratio < 1.0 && weight * ratio / (1.0 - ratio) <= total * NEGLIGIBLE_MASS
}

/// P(from <= X <= to) under the normal approximation
fn continuity_corrected(normal: &Normal, from: u64, to: u64) -> f64 {
    let upper = normal.cdf(to as f64 + 0.5);
    let lower = normal.cdf(from as f64 - 0.5);
    (upper - lower).clamp(0.0, 1.0)
}

/// Sum smallest terms first to limit rounding error
fn ascending_sum(terms: &[f64]) -> f64 {
    let mut sorted = terms.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.iter().sum()
}

fn non_negative(name: &'static str, value: i64) -> Result<u64, DomainError> {
    u64::try_from(value).map_err(|_| DomainError::Negative { name, value })
}

/// P(X = k) for population N, K successes, n drawn
pub fn exactly(population: i64, successes: i64, sample: i64, k: i64) -> Result<f64, DomainError> {
    Ok(Hypergeometric::new(population, successes, sample)?.exactly(k))
}

/// P(X >= k_min)
pub fn at_least(
    population: i64,
    successes: i64,
    sample: i64,
    k_min: i64,
) -> Result<f64, DomainError> {
    Ok(Hypergeometric::new(population, successes, sample)?.at_least(k_min))
}

/// P(X <= k_max)
pub fn at_most(
    population: i64,
    successes: i64,
    sample: i64,
    k_max: i64,
) -> Result<f64, DomainError> {
    Ok(Hypergeometric::new(population, successes, sample)?.at_most(k_max))
}

/// P(k_min <= X <= k_max)
pub fn between(
    population: i64,
    successes: i64,
    sample: i64,
    k_min: i64,
    k_max: i64,
) -> Result<f64, DomainError> {
    Ok(Hypergeometric::new(population, successes, sample)?.between(k_min, k_max))
}

/// Expected successes `n * K / N`
pub fn expected_successes(population: i64, successes: i64, sample: i64) -> Result<f64, DomainError> {
    Ok(Hypergeometric::new(population, successes, sample)?.expected())
}

/// Distribution over the non-negligible part of the feasible range
pub fn distribution(
    population: i64,
    successes: i64,
    sample: i64,
) -> Result<Vec<(u64, f64)>, DomainError> {
    Hypergeometric::new(population, successes, sample)?.distribution()
}
