//! Comparison harness for collector tests.
//!
//! Collector output is compared structurally rather than textually:
//! both texts are parsed into canonical `(family, sorted labels, value)`
//! sets, so line order and indentation in expectations do not matter.
//!
//! ```
//! use kube_state_exporter::testutil::compare_text;
//!
//! let actual = "# HELP up Up.\n# TYPE up gauge\nup{b=\"2\",a=\"1\"} 1\n";
//! let expected = "up{a=\"1\",b=\"2\"} 1\n  # TYPE up gauge\n  # HELP up Up.\n";
//! assert!(compare_text(actual, expected).is_ok());
//! ```

mod parse;

pub use parse::{format_labels, parse_exposition, Exposition, LabelSet, ParseError, ParsedFamily};

use thiserror::Error;

use crate::collector::{CollectError, KindCollector};

/// First structural difference between actual and expected output.
#[derive(Debug, Error)]
pub enum CompareError {
    /// The collector itself failed.
    #[error("collecting metrics failed: {0}")]
    Collect(#[from] CollectError),
    /// One of the two texts is not valid exposition.
    #[error("parsing {which} output: {source}")]
    Parse {
        /// `"actual"` or `"expected"`.
        which: &'static str,
        /// Parser error.
        #[source]
        source: ParseError,
    },
    /// A family expected but not produced.
    #[error("missing family {0}")]
    MissingFamily(String),
    /// A family produced but not expected.
    #[error("unexpected family {0}")]
    UnexpectedFamily(String),
    /// Help text differs.
    #[error("family {family}: help is {actual:?}, expected {expected:?}")]
    HelpMismatch {
        /// Family name.
        family: String,
        /// Help in the collected output.
        actual: Option<String>,
        /// Help in the expectation.
        expected: Option<String>,
    },
    /// Type differs.
    #[error("family {family}: type is {actual:?}, expected {expected:?}")]
    TypeMismatch {
        /// Family name.
        family: String,
        /// Type in the collected output.
        actual: Option<String>,
        /// Type in the expectation.
        expected: Option<String>,
    },
    /// A sample expected but not produced.
    #[error("missing sample {family}{labels}")]
    MissingSample {
        /// Family name.
        family: String,
        /// Rendered label set.
        labels: String,
    },
    /// A sample produced but not expected.
    #[error("unexpected sample {family}{labels}")]
    UnexpectedSample {
        /// Family name.
        family: String,
        /// Rendered label set.
        labels: String,
    },
    /// Same series, different value.
    #[error("sample {family}{labels} is {actual}, expected {expected}")]
    ValueMismatch {
        /// Family name.
        family: String,
        /// Rendered label set.
        labels: String,
        /// Collected value.
        actual: f64,
        /// Expected value.
        expected: f64,
    },
}

/// Collects from `collector` and compares the result with `expected`.
pub fn compare<C>(collector: &C, expected: &str) -> Result<(), CompareError>
where
    C: KindCollector + ?Sized,
{
    let actual = collector.collect()?;
    compare_text(&actual, expected)
}

/// Compares two exposition texts.
pub fn compare_text(actual: &str, expected: &str) -> Result<(), CompareError> {
    let actual = parse_exposition(actual).map_err(|source| CompareError::Parse {
        which: "actual",
        source,
    })?;
    let expected = parse_exposition(expected).map_err(|source| CompareError::Parse {
        which: "expected",
        source,
    })?;
    diff(&actual, &expected)
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Reports the first difference between two parsed expositions, checking
/// families in name order.
pub fn diff(actual: &Exposition, expected: &Exposition) -> Result<(), CompareError> {
    for (name, want) in expected {
        let Some(got) = actual.get(name) else {
            return Err(CompareError::MissingFamily(name.clone()));
        };

        if got.help != want.help {
            return Err(CompareError::HelpMismatch {
                family: name.clone(),
                actual: got.help.clone(),
                expected: want.help.clone(),
            });
        }
        if got.kind != want.kind {
            return Err(CompareError::TypeMismatch {
                family: name.clone(),
                actual: got.kind.clone(),
                expected: want.kind.clone(),
            });
        }

        for (labels, &expected_value) in &want.samples {
            match got.samples.get(labels) {
                None => {
                    return Err(CompareError::MissingSample {
                        family: name.clone(),
                        labels: format_labels(labels),
                    })
                }
                Some(&actual_value) if !same_value(actual_value, expected_value) => {
                    return Err(CompareError::ValueMismatch {
                        family: name.clone(),
                        labels: format_labels(labels),
                        actual: actual_value,
                        expected: expected_value,
                    })
                }
                Some(_) => {}
            }
        }

        if let Some(labels) = got.samples.keys().find(|l| !want.samples.contains_key(*l)) {
            return Err(CompareError::UnexpectedSample {
                family: name.clone(),
                labels: format_labels(labels),
            });
        }
    }

    if let Some(name) = actual.keys().find(|n| !expected.contains_key(*n)) {
        return Err(CompareError::UnexpectedFamily(name.clone()));
    }

    Ok(())
}
