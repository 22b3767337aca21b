// Copyright (c) Skipsort Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! A counting skiplist used as the ordering engine for skipsort.
//!
//! SkipLists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `n > 0` will contain a random subset of the nodes on level `n - 1`.
//! Here the chance that a node occupies level `n` is `1/b` times the chance of
//! occupying level `n-1`, where `b` is the configured probability base.
//!
//! Each distinct key gets exactly one node. Inserting a key that is already
//! present goes through a hash index and only bumps the node's count, so
//! heavily duplicated inputs never pay for a descent. The index holds node
//! positions only and hashes through the arena, so every key is stored once.
//!
//! Nodes live in an arena owned by the list and link to each other by
//! position, so nothing outlives the list and nothing needs `unsafe`.

use std::{
    borrow::Borrow,
    fmt,
    hash::{
        BuildHasher,
        Hash,
    },
    iter::FusedIterator,
};

use hashbrown::HashTable;
use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};
use rustc_hash::FxBuildHasher;
use tracing::{
    debug,
    instrument,
    trace,
};

pub use self::level_generator::{
    GeometricalLevelGenerator,
    LevelGenerator,
};
use self::node::{
    Link,
    Node,
    NodeId,
};
use crate::{
    config::Config,
    errs::Error,
    stats::Stats,
};

mod level_generator;
mod node;

/// Hash a key, or anything it borrows as, for the index.
#[inline]
fn hash_key<Q: Hash + ?Sized>(key: &Q) -> u64 {
    FxBuildHasher.hash_one(key)
}

/// Where a traversal currently stands: on the sentinel, or on a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeId),
}

/// What an [`SkipList::insert`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The key was already present; `count` is its multiplicity after the
    /// insert.
    Duplicate { count: usize },
    /// A new node was spliced in with a tower of `height` levels, after
    /// following `steps` forward links.
    Structural { height: usize, steps: usize },
}

/// A skiplist of distinct keys, each carrying a multiplicity.
///
/// The list is single threaded and owns every node it creates. Nodes are never
/// removed; they go away together when the list is dropped.
#[derive(Debug)]
pub struct SkipList<K, R = SmallRng> {
    /// The sentinel's tower, which sorts before every key. It is as tall as
    /// the tallest node and grows along with it, up to `max_tower_height`.
    head: Vec<Link>,
    nodes: Vec<Node<K>>,
    /// Node positions keyed by the hash of the node's key.
    index: HashTable<NodeId>,
    /// Tallest tower among the nodes, and 1 when there are none.
    height: usize,
    config: Config,
    level_generator: GeometricalLevelGenerator<R>,
    stats: Stats,
}

impl<K> SkipList<K, SmallRng>
where
    K: Ord + Hash,
{
    /// Create a list whose towers are drawn from an entropy-seeded [`SmallRng`].
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Validate `probability_base` and create a list with the default tower
    /// cap for it.
    pub fn from_base(probability_base: f64) -> Result<Self, Error> {
        Ok(Self::new(Config::new(probability_base)?))
    }
}

impl<K, R> SkipList<K, R>
where
    K: Ord + Hash,
    R: Rng,
{
    /// Create a list that draws tower heights from `rng`.
    #[instrument(level = "debug", skip(rng))]
    pub fn with_rng(config: Config, rng: R) -> Self {
        SkipList {
            head: vec![None],
            nodes: Vec::new(),
            index: HashTable::new(),
            height: 1,
            config,
            level_generator: GeometricalLevelGenerator::new(&config, rng),
            stats: Stats::default(),
        }
    }

    /// Insert `key`, either bumping its count or splicing in a new node.
    ///
    /// If memory for the new node can't be reserved the list is left exactly
    /// as it was.
    pub fn insert(&mut self, key: K) -> Result<Insertion, Error> {
        let hash = hash_key(&key);
        let nodes = &self.nodes;
        if let Some(&id) = self.index.find(hash, |id| nodes[id.idx()].key == key) {
            let node = &mut self.nodes[id.idx()];
            node.count += 1;
            self.stats.record_duplicate();
            return Ok(Insertion::Duplicate { count: node.count });
        }

        // reserve everything up front so a failure can't strand a half-linked
        // node
        self.nodes.try_reserve(1)?;
        let nodes = &self.nodes;
        self.index
            .try_reserve(1, |id| hash_key(&nodes[id.idx()].key))?;

        let height = self.level_generator.random();
        if height > self.head.len() {
            self.head.try_reserve(height - self.head.len())?;
        }

        // nothing below can fail, so the list only changes from here on
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(key, height));
        if height > self.head.len() {
            self.head.resize(height, None);
        }

        // levels above the current height are empty on the head, so starting
        // at the taller of the two only costs a few empty checks
        let mut at = Cursor::Head;
        let mut steps = 0;
        for level in (0..self.height.max(height)).rev() {
            while let Some(next) = self.next(at, level) {
                if self.nodes[next.idx()].key >= self.nodes[id.idx()].key {
                    break;
                }
                at = Cursor::Node(next);
                steps += 1;
            }

            if level < height {
                // `at` is the last node on this level that sorts before `key`
                self.nodes[id.idx()].forward[level] = self.next(at, level);
                self.set_next(at, level, Some(id));
            }
        }

        let nodes = &self.nodes;
        self.index
            .insert_unique(hash, id, |id| hash_key(&nodes[id.idx()].key));
        if height > self.height {
            debug!(from = self.height, to = height, "skiplist grew taller");
            self.height = height;
        }
        self.stats.record_structural(steps);
        trace!(height, steps, total = self.nodes.len(), "spliced new node");

        Ok(Insertion::Structural { height, steps })
    }
}

impl<K, R> SkipList<K, R>
where
    K: Ord,
{
    /// Return the largest key in the list that is `<= key`.
    ///
    /// `None` stands for the sentinel's minimum, meaning every stored key is
    /// greater than `key` (or the list is empty).
    pub fn search<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut at = Cursor::Head;
        for level in (0..self.height).rev() {
            while let Some(next) = self.next(at, level) {
                if self.nodes[next.idx()].key.borrow() > key {
                    break;
                }
                at = Cursor::Node(next);
            }
        }

        match at {
            | Cursor::Head => None,
            | Cursor::Node(id) => Some(&self.nodes[id.idx()].key),
        }
    }

    /// Walk level 0 from the head, yielding each key with its count in
    /// ascending order.
    pub fn iter(&self) -> Iter<'_, K, R> {
        Iter {
            list: self,
            next: self.head[0],
            remaining: self.nodes.len(),
        }
    }

    /// Flatten the list into a sorted vector, repeating each key by its count.
    ///
    /// The bottom level is checked while it is walked, so a broken ordering
    /// surfaces as [`Error::InvariantViolation`] instead of a wrong answer.
    pub fn to_sorted_vec(&self) -> Result<Vec<K>, Error>
    where
        K: Clone,
    {
        let mut out = Vec::with_capacity(self.stats.inserts());
        let mut prev: Option<&K> = None;
        for (key, count) in self.iter() {
            if prev.is_some_and(|p| p >= key) {
                return Err(Error::InvariantViolation {
                    level: 0,
                    reason: "keys are not strictly increasing",
                });
            }
            out.extend(std::iter::repeat(key).take(count).cloned());
            prev = Some(key);
        }
        Ok(out)
    }

    /// Check every structural invariant of the list.
    ///
    /// This walks every level in full, so it is meant for tests and debugging
    /// rather than hot paths.
    pub fn validate(&self) -> Result<(), Error>
    where
        K: Hash,
    {
        let violation = |level, reason| Err(Error::InvariantViolation { level, reason });

        if self.height == 0 || self.height > self.config.max_tower_height() {
            return violation(self.height, "height outside of [1, max_tower_height]");
        }
        if self.head.len() != self.height {
            return violation(self.head.len(), "head is not as tall as the list");
        }

        let tallest = self.nodes.iter().map(Node::height).max().unwrap_or(1);
        if tallest != self.height {
            return violation(self.height, "height does not match the tallest tower");
        }

        for level in 0..self.head.len() {
            let mut seen = 0;
            let mut prev: Option<&K> = None;
            let mut at = self.head[level];
            while let Some(id) = at {
                let node = &self.nodes[id.idx()];
                if node.height() <= level {
                    return violation(level, "node linked above its own tower");
                }
                if prev.is_some_and(|p| p >= &node.key) {
                    return violation(level, "keys are not strictly increasing");
                }
                if seen == self.nodes.len() {
                    return violation(level, "level is longer than the node count");
                }
                prev = Some(&node.key);
                seen += 1;
                at = node.forward[level];
            }

            let expected = self.nodes.iter().filter(|n| n.height() > level).count();
            if seen != expected {
                return violation(level, "tower is not reachable at every one of its levels");
            }
        }

        if self.index.len() != self.nodes.len() {
            return violation(0, "index and node count disagree");
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.count == 0 {
                return violation(0, "node has a zero count");
            }
            let found = self
                .index
                .find(hash_key(&node.key), |id| self.nodes[id.idx()].key == node.key);
            match found {
                | Some(id) if id.idx() == idx => {},
                | _ => return violation(0, "index points at the wrong node"),
            }
        }

        Ok(())
    }
}

impl<K, R> SkipList<K, R> {
    /// How many times `key` has been inserted.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key)
            .map_or(0, |id| self.nodes[id.idx()].count)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// The number of distinct keys, regardless of their counts.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of levels currently in use.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .find(hash_key(key), |id| self.nodes[id.idx()].key.borrow() == key)
            .copied()
    }

    #[inline]
    fn next(&self, at: Cursor, level: usize) -> Link {
        match at {
            | Cursor::Head => self.head[level],
            | Cursor::Node(id) => self.nodes[id.idx()].forward[level],
        }
    }

    #[inline]
    fn set_next(&mut self, at: Cursor, level: usize, to: Link) {
        match at {
            | Cursor::Head => self.head[level] = to,
            | Cursor::Node(id) => self.nodes[id.idx()].forward[level] = to,
        }
    }
}

/// Prints the active levels top down, one line each, as `level: key key ...`.
/// Keys inserted more than once are printed as `keyxcount`.
impl<K, R> fmt::Display for SkipList<K, R>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in (0..self.height).rev() {
            write!(f, "{level}:")?;
            let mut at = self.head[level];
            while let Some(id) = at {
                let node = &self.nodes[id.idx()];
                write!(f, " {node}")?;
                at = node.forward[level];
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over a [`SkipList`]'s bottom level. See [`SkipList::iter`].
pub struct Iter<'a, K, R> {
    list: &'a SkipList<K, R>,
    next: Link,
    remaining: usize,
}

impl<'a, K, R> Iterator for Iter<'a, K, R> {
    type Item = (&'a K, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.list.nodes[self.next?.idx()];
        self.next = node.forward[0];
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, node.count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, R> ExactSizeIterator for Iter<'_, K, R> {}

impl<K, R> FusedIterator for Iter<'_, K, R> {}

impl<'a, K: Ord, R> IntoIterator for &'a SkipList<K, R> {
    type IntoIter = Iter<'a, K, R>;
    type Item = (&'a K, usize);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
