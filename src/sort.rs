// Copyright (c) Skipsort Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! Skipsort: sort by inserting everything into a [`SkipList`] and reading the
//! bottom level back out.
//!
//! Equal elements collapse into one node with a count, so the output keeps
//! multiplicity but not the identity of equal elements. Inputs with lots of
//! repeats get cheaper, since a repeat is a single hash lookup.

use std::{
    cmp::Ordering,
    hash::{
        Hash,
        Hasher,
    },
};

use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};
use tracing::instrument;

use crate::{
    config::Config,
    errs::Error,
    skiplist::SkipList,
    stats::Stats,
};

/// A sorting routine that an external harness can time next to skipsort.
///
/// Implementations leave `data` fully ordered and do nothing else, so elapsed
/// times are comparable.
pub trait Sorter<T> {
    /// A short human readable name for reports.
    fn name(&self) -> &'static str;
    fn sort(&mut self, data: &mut [T]) -> Result<(), Error>;
}

/// Sort `items` with a fresh list using `probability_base`.
///
/// Element types are checked by the compiler, so the only runtime failures
/// are a bad base or running out of memory.
#[instrument(level = "debug", skip(items))]
pub fn sort<T, I>(items: I, probability_base: f64) -> Result<Vec<T>, Error>
where
    T: Ord + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let config = Config::new(probability_base)?;
    let (sorted, _) = sort_with_stats(items, config, SmallRng::from_entropy())?;
    Ok(sorted)
}

/// Sort `items` drawing tower heights from `rng`, and report what the list
/// did along the way.
#[instrument(level = "debug", skip(items, rng))]
pub fn sort_with_stats<T, I, R>(items: I, config: Config, rng: R) -> Result<(Vec<T>, Stats), Error>
where
    T: Ord + Hash + Clone,
    I: IntoIterator<Item = T>,
    R: Rng,
{
    let list = fill(items, config, rng)?;
    Ok((list.to_sorted_vec()?, *list.stats()))
}

fn fill<T, I, R>(items: I, config: Config, rng: R) -> Result<SkipList<T, R>, Error>
where
    T: Ord + Hash,
    I: IntoIterator<Item = T>,
    R: Rng,
{
    let mut list = SkipList::with_rng(config, rng);
    for item in items {
        list.insert(item)?;
    }
    Ok(list)
}

mod private {
    pub trait Sealed {}
}

/// Floating point types skipsort can order once NaN is ruled out.
pub trait Float: Copy + PartialOrd + private::Sealed {
    #[doc(hidden)]
    fn is_nan(self) -> bool;
    #[doc(hidden)]
    fn canonical_bits(self) -> u64;
    #[doc(hidden)]
    fn canonical(self) -> Self;
    #[doc(hidden)]
    fn total_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_float {
    ($($t:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl Float for $t {
                #[inline]
                fn is_nan(self) -> bool {
                    <$t>::is_nan(self)
                }

                #[inline]
                fn canonical_bits(self) -> u64 {
                    self.to_bits() as u64
                }

                // folds -0.0 into 0.0 so equal values share one node
                #[inline]
                fn canonical(self) -> Self {
                    self + 0.0
                }

                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    <$t>::total_cmp(self, other)
                }
            }
        )*
    };
}

impl_float!(f32, f64);

/// A float that is known not to be NaN, and so is totally ordered.
#[derive(Debug, Clone, Copy)]
struct Ordered<F>(F);

impl<F: Float> Ordered<F> {
    fn new(value: F) -> Option<Self> {
        (!value.is_nan()).then(|| Ordered(value.canonical()))
    }
}

impl<F: Float> PartialEq for Ordered<F> {
    fn eq(&self, other: &Self) -> bool {
        self.0.canonical_bits() == other.0.canonical_bits()
    }
}

impl<F: Float> Eq for Ordered<F> {}

impl<F: Float> PartialOrd for Ordered<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Float> Ord for Ordered<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl<F: Float> Hash for Ordered<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.canonical_bits().hash(state);
    }
}

/// Sort floating point `items` with skipsort.
///
/// Every element is checked before anything is inserted; a NaN fails the whole
/// sort with [`Error::TypeMismatch`] pointing at the first one. Negative zero
/// comes back as positive zero.
#[instrument(level = "debug", skip(items))]
pub fn sort_floats<F: Float>(items: &[F], probability_base: f64) -> Result<Vec<F>, Error> {
    let config = Config::new(probability_base)?;
    let keys = items
        .iter()
        .enumerate()
        .map(|(index, &value)| Ordered::new(value).ok_or(Error::TypeMismatch { index }))
        .collect::<Result<Vec<_>, _>>()?;

    let (sorted, _) = sort_with_stats(keys, config, SmallRng::from_entropy())?;
    Ok(sorted.into_iter().map(|key| key.0).collect())
}

/// Skipsort packaged behind [`Sorter`], reusing one generator across sorts.
#[derive(Debug)]
pub struct SkipSort<R = SmallRng> {
    config: Config,
    rng: R,
}

impl SkipSort<SmallRng> {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }
}

impl<R: Rng> SkipSort<R> {
    pub fn with_rng(config: Config, rng: R) -> Self {
        SkipSort { config, rng }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<T, R> Sorter<T> for SkipSort<R>
where
    T: Ord + Hash + Clone,
    R: Rng,
{
    fn name(&self) -> &'static str {
        "skipsort"
    }

    fn sort(&mut self, data: &mut [T]) -> Result<(), Error> {
        let list = fill(data.iter().cloned(), self.config, &mut self.rng)?;

        let mut slots = data.iter_mut();
        for (key, count) in list.iter() {
            for slot in slots.by_ref().take(count) {
                slot.clone_from(key);
            }
        }
        Ok(())
    }
}
