//! Shared [Transposition Table] for parallel game-tree search.
//!
//! The table is a fixed-size cache of search results keyed by a 64-bit
//! position fingerprint. Many worker threads probe and save entries
//! concurrently without any per-access locking; the entry format and the
//! replacement policy are designed so that racing writers can cost a cache
//! hit, never correctness.
//!
//! ```
//! use tabia::{Bound, Move, TranspositionTable};
//!
//! let mut table = TranspositionTable::new(16);
//! table.new_search();
//!
//! let key = 0x9D39_247E_3377_6D41;
//! let (entry, found) = table.probe(key);
//! assert!(!found);
//! entry.save(key, 91, Bound::EXACT, 12, Move::from_raw(0x1A2B), table.generation());
//!
//! let (entry, found) = table.probe(key);
//! assert!(found);
//! assert_eq!(entry.depth(), 12);
//! assert_eq!(entry.value(), 91);
//! ```
//!
//! [Transposition Table]: https://www.chessprogramming.org/Transposition_Table

#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
// Performance is extremely important.
#![deny(clippy::perf)]

pub mod core;
pub mod options;
pub mod transposition;

pub use crate::core::{Bound, Depth, Key, Move, Value};
pub use crate::options::Options;
pub use crate::transposition::{Entry, TranspositionTable};
