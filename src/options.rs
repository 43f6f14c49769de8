//! Engine-facing configuration consumed by the table lifecycle.
//!
//! The table itself never reads configuration: the embedding engine holds an
//! [`Options`] value, updates it from its `setoption` protocol handler, and
//! passes the relevant numbers into [`resize`] and [`clear`].
//!
//! [`resize`]: crate::transposition::TranspositionTable::resize
//! [`clear`]: crate::transposition::TranspositionTable::clear

use std::num::NonZeroUsize;

use anyhow::{bail, ensure};

use crate::transposition::TranspositionTable;

/// Smallest accepted table budget in megabytes.
pub const MIN_HASH_MB: usize = 1;
/// Largest accepted table budget in megabytes.
pub const MAX_HASH_MB: usize = 131_072;
/// Largest accepted worker-thread count.
pub const MAX_THREADS: usize = 512;

/// Typed option store: the table memory budget and the worker-thread count,
/// which doubles as the parallelism used when zeroing the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Transposition table budget in megabytes.
    pub hash: usize,
    /// Search worker threads.
    pub threads: NonZeroUsize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            hash: TranspositionTable::DEFAULT_SIZE_MB,
            threads: NonZeroUsize::MIN,
        }
    }
}

impl Options {
    /// Updates a single option from its protocol name and string value.
    ///
    /// Unknown names and out-of-range values are rejected; the stored
    /// configuration is left untouched on error.
    pub fn set(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        match name {
            "Hash" => {
                let megabytes: usize = value.parse()?;
                ensure!(
                    (MIN_HASH_MB..=MAX_HASH_MB).contains(&megabytes),
                    "Hash must be in {MIN_HASH_MB}..={MAX_HASH_MB} MB, got {megabytes}"
                );
                self.hash = megabytes;
            },
            "Threads" => {
                let count: usize = value.parse()?;
                let Some(threads) = NonZeroUsize::new(count) else {
                    bail!("Threads must be at least 1");
                };
                ensure!(
                    threads.get() <= MAX_THREADS,
                    "Threads must be at most {MAX_THREADS}, got {threads}"
                );
                self.threads = threads;
            },
            _ => bail!("unknown option: {name}"),
        }
        Ok(())
    }
}
