// Copyright (c) Skipsort Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! Sort by insertion into a counting [`skip list`].
//!
//! Every element goes into a [`skiplist::SkipList`], where repeats only bump a
//! count, and the list's bottom level is then read back out in order.
//!
//! ```
//! let sorted = skipsort::sort(vec![5, 3, 8, 3, 1], 2.0).unwrap();
//! assert_eq!(sorted, vec![1, 3, 3, 5, 8]);
//! ```
//!
//! [`skip list`]: https://en.wikipedia.org/wiki/Skip_list

pub mod config;
pub mod errs;
pub mod skiplist;
pub mod sort;
pub mod stats;

pub use crate::{
    config::Config,
    errs::Error,
    skiplist::{
        Insertion,
        SkipList,
    },
    sort::{
        sort,
        sort_floats,
        sort_with_stats,
        SkipSort,
        Sorter,
    },
    stats::Stats,
};
