//! YAML combination files.
//!
//! A combination file declares dimensions either in a top-level
//! `combinations` block or per test under `tests.<name>.combinations`:
//!
//! ```yaml
//! combinations:
//!   - name: Size
//!     values: [Small, Medium, Large]
//!   - name: Color
//!     values:
//!       - Red
//!       - { value: Green, filter: "Size==0" }
//! tests:
//!   CaretNavigation:
//!     combinations:
//!       - name: Direction
//!         values: [Left, Right]
//! ```
//!
//! The loader only shapes data into [`Dimension`]s; filters are compiled by
//! the engine.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::dimension::Dimension;
use crate::engine::CombinatorialEngine;
use crate::value::Value;
use crate::CombinatoriaError;

// =============================================================================
// FILE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CombinationFile {
    #[serde(default)]
    combinations: Option<Vec<DimensionSpec>>,
    #[serde(default)]
    tests: BTreeMap<String, TestSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TestSpec {
    combinations: Vec<DimensionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DimensionSpec {
    name: String,
    values: Vec<ValueSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ValueSpec {
    Detailed(DetailedValue),
    Plain(Value),
}

/// A value written as a mapping. Unknown keys are rejected so a misspelled
/// `filter` cannot drop its rule.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedValue {
    #[serde(alias = "text")]
    value: Value,
    #[serde(default)]
    filter: Option<String>,
}

impl DimensionSpec {
    fn into_dimension(self) -> Result<Dimension, CombinatoriaError> {
        let has_filters = self
            .values
            .iter()
            .any(|v| matches!(v, ValueSpec::Detailed(DetailedValue { filter: Some(_), .. })));

        let (values, filters): (Vec<Value>, Vec<Option<String>>) = self
            .values
            .into_iter()
            .map(|v| match v {
                ValueSpec::Detailed(DetailedValue { value, filter }) => (value, filter),
                ValueSpec::Plain(value) => (value, None),
            })
            .unzip();

        if has_filters {
            Dimension::with_filters(self.name, values, filters)
        } else {
            Dimension::new(self.name, values)
        }
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Reads dimensions from YAML source.
///
/// With `test` set, the block under `tests.<test>` is used. Otherwise the
/// top-level `combinations` block is used, falling back to the first test
/// block in name order.
pub fn dimensions_from_str(
    source: &str,
    test: Option<&str>,
) -> Result<Vec<Dimension>, CombinatoriaError> {
    let file: CombinationFile = serde_yaml::from_str(source)
        .map_err(|e| CombinatoriaError::load("invalid combination file", e))?;

    let specs = select_block(file, test)?;
    specs
        .into_iter()
        .map(DimensionSpec::into_dimension)
        .collect()
}

/// Reads dimensions from a YAML file on disk.
pub fn dimensions_from_file(
    path: impl AsRef<Path>,
    test: Option<&str>,
) -> Result<Vec<Dimension>, CombinatoriaError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| {
        CombinatoriaError::load(format!("failed to read '{}'", path.display()), e)
    })?;
    debug!(path = %path.display(), "loading combination file");
    dimensions_from_str(&source, test)
}

/// Builds an engine from YAML source.
pub fn from_str(source: &str, test: Option<&str>) -> Result<CombinatorialEngine, CombinatoriaError> {
    CombinatorialEngine::new(dimensions_from_str(source, test)?)
}

/// Builds an engine from a YAML file on disk.
pub fn from_file(
    path: impl AsRef<Path>,
    test: Option<&str>,
) -> Result<CombinatorialEngine, CombinatoriaError> {
    CombinatorialEngine::new(dimensions_from_file(path, test)?)
}

/// Names of the blocks a file declares; `None` stands for the top-level block.
pub fn block_names(source: &str) -> Result<Vec<Option<String>>, CombinatoriaError> {
    let file: CombinationFile = serde_yaml::from_str(source)
        .map_err(|e| CombinatoriaError::load("invalid combination file", e))?;
    let top = file.combinations.is_some().then_some(None);
    Ok(top.into_iter().chain(file.tests.into_keys().map(Some)).collect())
}

fn select_block(
    mut file: CombinationFile,
    test: Option<&str>,
) -> Result<Vec<DimensionSpec>, CombinatoriaError> {
    match test {
        Some(name) => {
            let known = file.tests.keys().cloned().collect::<Vec<_>>().join(", ");
            let spec = file.tests.remove(name).ok_or_else(|| {
                CombinatoriaError::load_message(
                    format!("no combinations declared for test '{name}'"),
                    (!known.is_empty()).then(|| format!("declared tests: {known}")),
                )
            })?;
            debug!(test = name, "using test-scoped combinations");
            Ok(spec.combinations)
        }
        None => {
            if let Some(specs) = file.combinations {
                return Ok(specs);
            }
            let first = file.tests.into_iter().next();
            match first {
                Some((name, spec)) => {
                    debug!(test = %name, "no top-level combinations, using first test block");
                    Ok(spec.combinations)
                }
                None => Err(CombinatoriaError::load_message(
                    "file declares no combinations",
                    Some("add a top-level `combinations` list".to_string()),
                )),
            }
        }
    }
}
