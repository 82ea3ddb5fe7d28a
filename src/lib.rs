//! Combinatoria: exhaustive, filterable combinations for parameterized tests.
//!
//! Build [`Dimension`]s (in code or from a YAML file through [`loader`]),
//! hand them to a [`CombinatorialEngine`], and call
//! [`advance`](CombinatorialEngine::advance) until it returns false:
//!
//! ```rust
//! use combinatoria::{CombinatorialEngine, Dimension};
//!
//! let mut engine = CombinatorialEngine::new(vec![
//!     Dimension::new("Size", ["Small", "Medium", "Large"])?,
//!     Dimension::with_filters("Color", ["Red", "Green"], [None, Some("Size==0")])?,
//! ])?;
//!
//! let mut seen = Vec::new();
//! while engine.advance() {
//!     seen.push(engine.snapshot().identifier());
//! }
//! assert_eq!(seen.len(), 4);
//! assert_eq!(seen[3], "Size=Small;Color=Green");
//! # Ok::<(), combinatoria::CombinatoriaError>(())
//! ```

pub use crate::diagnostics::{CombinatoriaError, ErrorContext, ErrorType, Span};

pub mod cli;
pub mod combination;
pub mod diagnostics;
pub mod dimension;
pub mod engine;
pub mod filter;
pub mod loader;
pub mod value;

pub use crate::combination::Combination;
pub use crate::dimension::Dimension;
pub use crate::engine::{CombinatorialEngine, Combinations, OverrideHook};
pub use crate::value::Value;
