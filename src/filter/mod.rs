//! The filter expression language.
//!
//! A filter is attached to one value of a dimension and decides, given the
//! full current combination, whether that value may be selected. Filters
//! compare dimension cursors with zero-based value positions:
//!
//! ```text
//! Size==0 AND (Color!=1 OR Font==2)
//! ```

pub mod ast;
pub mod eval;
pub mod parser;

pub use ast::{ComparisonOp, FilterExpr, LogicalOp};
pub use eval::{accepts, evaluate};
pub use parser::{compile, FilterCompiler};
