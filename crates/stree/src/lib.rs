//! Generalized suffix tree over small alphabets.
//!
//! Built for bioinformatics-scale indexing: hundreds of thousands to tens
//! of millions of symbols drawn from a handful of values (nucleotides plus
//! a terminator). Construction is online — symbols are appended one at a
//! time and the structure is a valid implicit suffix tree after every
//! append — using Ukkonen's linear-time algorithm. Child edges for the
//! whole tree live in a single two-level hash map (the `stree-map` crate)
//! rather than one map per node, which is what lets multi-million-node
//! trees fit in memory.
//!
//! # Example
//!
//! ```
//! use stree::{Dna, SuffixTree};
//!
//! let mut tree = SuffixTree::new(Dna);
//! tree.append(b"TAA")?.terminate()?;
//! assert_eq!(tree.len(), 3);
//! # Ok::<(), stree::Error>(())
//! ```

mod alphabet;
mod dot;
mod error;
mod node;
mod tree;

#[cfg(test)]
mod testing;

pub use alphabet::{Alphabet, Base, Dna};
pub use error::{Error, Result};
pub use node::{Node, NodeIdx, NodeKind};
pub use tree::SuffixTree;
