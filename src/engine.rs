//! The combinatorial engine.
//!
//! The engine treats its dimensions as the digits of a mixed-radix odometer.
//! Dimension 0 is the least significant digit and varies fastest. Every
//! candidate the odometer reaches is checked against the filters of all
//! currently selected values and, when registered, an [`OverrideHook`].
//!
//! A rejected candidate restarts the scan at digit 0 instead of resuming the
//! carry chain. Enumeration order depends on this, so callers that record
//! combination numbers get the same numbering on every run.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace};

use crate::combination::Combination;
use crate::dimension::Dimension;
use crate::filter::{accepts, FilterCompiler, FilterExpr};
use crate::value::Value;
use crate::{err_msg, CombinatoriaError};

// ============================================================================
// OVERRIDE HOOK
// ============================================================================

/// External veto/rescue of candidate combinations.
///
/// The hook sees every candidate the engine examines, including the ones
/// its filters already rejected, together with the filters' verdict. The
/// returned value replaces that verdict.
pub trait OverrideHook {
    fn review(&mut self, combination: &Combination, acceptable: bool) -> bool;
}

impl<F> OverrideHook for F
where
    F: FnMut(&Combination, bool) -> bool,
{
    fn review(&mut self, combination: &Combination, acceptable: bool) -> bool {
        self(combination, acceptable)
    }
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// No combination has been committed yet.
    Pending,
    /// The cursor holds an accepted combination.
    Positioned,
    /// Every candidate has been visited.
    Exhausted,
}

/// Enumerates every accepted combination of one value per dimension.
pub struct CombinatorialEngine {
    dimensions: Vec<Dimension>,
    /// Compiled filter per dimension, per value.
    filters: Vec<Vec<Option<FilterExpr>>>,
    cursor: Vec<usize>,
    before_start: bool,
    status: Status,
    /// Set once any candidate has been accepted; survives exhaustion.
    committed: bool,
    hook: Option<Box<dyn OverrideHook>>,
}

impl CombinatorialEngine {
    /// Builds an engine and compiles every filter of every dimension.
    ///
    /// Fails on the first duplicate dimension name, malformed filter or
    /// filter that names an unknown dimension.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self, CombinatoriaError> {
        let mut seen = HashSet::new();
        for dimension in &dimensions {
            if !seen.insert(dimension.name()) {
                return Err(err_msg!(
                    Shape,
                    "dimension '{}' is declared more than once",
                    dimension.name()
                ));
            }
        }

        let names: Vec<&str> = dimensions.iter().map(Dimension::name).collect();
        let compiler = FilterCompiler::new(&names);
        let mut filters = Vec::with_capacity(dimensions.len());
        for dimension in &dimensions {
            let mut compiled = Vec::with_capacity(dimension.len());
            for index in 0..dimension.len() {
                let source = dimension.filter(index).unwrap_or("");
                let origin = format!("{}[{}]", dimension.name(), index);
                compiled.push(compiler.compile(&origin, source)?);
            }
            filters.push(compiled);
        }

        debug!(
            dimensions = dimensions.len(),
            filters = filters.iter().flatten().filter(|f| f.is_some()).count(),
            "combinatorial engine compiled"
        );

        Ok(Self {
            cursor: vec![0; dimensions.len()],
            dimensions,
            filters,
            before_start: true,
            status: Status::Pending,
            committed: false,
            hook: None,
        })
    }

    /// Moves to the next accepted combination.
    ///
    /// Returns false once every candidate has been visited, and on every
    /// call after that.
    pub fn advance(&mut self) -> bool {
        if self.dimensions.is_empty() || self.status == Status::Exhausted {
            return false;
        }

        let mut digit = 0;
        loop {
            let candidate = if self.before_start {
                self.before_start = false;
                self.cursor[digit]
            } else {
                self.cursor[digit] + 1
            };

            if candidate == self.dimensions[digit].len() {
                self.cursor[..=digit].fill(0);
                digit += 1;
                if digit == self.dimensions.len() {
                    debug!("combinations exhausted");
                    self.status = Status::Exhausted;
                    return false;
                }
                continue;
            }

            self.cursor[digit] = candidate;
            if self.is_acceptable() {
                self.status = Status::Positioned;
                self.committed = true;
                return true;
            }
            trace!(cursor = ?self.cursor, "candidate rejected");
            digit = 0;
        }
    }

    fn is_acceptable(&mut self) -> bool {
        let cursor = &self.cursor;
        let acceptable = self
            .filters
            .iter()
            .zip(cursor)
            .all(|(filters, &index)| accepts(filters[index].as_ref(), cursor));

        if self.hook.is_none() {
            return acceptable;
        }
        let snapshot = self.snapshot();
        match self.hook.as_mut() {
            Some(hook) => hook.review(&snapshot, acceptable),
            None => acceptable,
        }
    }

    /// The value currently selected in every dimension.
    pub fn snapshot(&self) -> Combination {
        Combination::new(
            self.dimensions
                .iter()
                .zip(&self.cursor)
                .map(|(d, &index)| (d.name().to_string(), d.values()[index].clone()))
                .collect(),
        )
    }

    /// Writes the current name/value pairs into `table`.
    pub fn populate(&self, table: &mut HashMap<String, Value>) {
        self.snapshot().apply_to(table);
    }

    /// One `name: [value]` line per dimension, or `[none]` until the first
    /// accepted combination.
    ///
    /// After exhaustion the lines describe the reset cursor, the same state
    /// [`snapshot`](Self::snapshot) reports.
    pub fn describe_state(&self) -> String {
        if !self.committed {
            return "[none]".to_string();
        }
        self.snapshot().to_string()
    }

    /// Registers a hook consulted on every candidate, replacing any previous one.
    pub fn set_override_hook<H>(&mut self, hook: H)
    where
        H: OverrideHook + 'static,
    {
        self.hook = Some(Box::new(hook));
    }

    pub fn clear_override_hook(&mut self) {
        self.hook = None;
    }

    /// Drives [`advance`](Self::advance) and yields each accepted combination.
    pub fn combinations(&mut self) -> Combinations<'_> {
        Combinations { engine: self }
    }

    /// True when the engine has no dimensions and will never produce a combination.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.status == Status::Exhausted
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Selected value index per dimension.
    pub fn cursor(&self) -> &[usize] {
        &self.cursor
    }
}

impl fmt::Debug for CombinatorialEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinatorialEngine")
            .field("dimensions", &self.dimensions)
            .field("cursor", &self.cursor)
            .field("before_start", &self.before_start)
            .field("status", &self.status)
            .field("committed", &self.committed)
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

/// Iterator over the accepted combinations of an engine.
pub struct Combinations<'a> {
    engine: &'a mut CombinatorialEngine,
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.engine.advance() {
            Some(self.engine.snapshot())
        } else {
            None
        }
    }
}
