//! Library target for the `minireset` package.
//!
//! The primary deliverable of this package is the `minireset` CLI binary
//! (`src/main.rs`). This library exists so `cargo test -p minireset --doc`
//! can check the feature combinations.

#[doc(hidden)]
pub use puzzle_archive;
