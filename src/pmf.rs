use itertools::Itertools;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::hash::Hash;

/// a value that can be tallied into a pmf
///
/// numeric values report themselves through `as_f64`, everything else returns
/// `None` and can still be counted and queried, but has no moments
pub trait Observation: Ord + Hash + Clone + fmt::Debug {
    fn as_f64(&self) -> Option<f64>;
}

macro_rules! numeric_observation {
    ($($t:ty),*) => {
        $(
            impl Observation for $t {
                fn as_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

numeric_observation!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl Observation for String {
    fn as_f64(&self) -> Option<f64> {
        None
    }
}

impl<'a> Observation for &'a str {
    fn as_f64(&self) -> Option<f64> {
        None
    }
}

impl Observation for char {
    fn as_f64(&self) -> Option<f64> {
        None
    }
}

impl Observation for bool {
    fn as_f64(&self) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PmfError {
    /// a moment was requested over a support that isn't numeric
    UnsupportedOperation {
        operation: &'static str,
        value: String,
    },
}

impl PmfError {
    pub fn unsupported<V: fmt::Debug>(operation: &'static str, value: &V) -> Self {
        PmfError::UnsupportedOperation {
            operation,
            value: format!("{:?}", value),
        }
    }

    /// the same failure, reported against the operation that was asked for
    pub fn for_operation(self, operation: &'static str) -> Self {
        match self {
            PmfError::UnsupportedOperation { value, .. } => {
                PmfError::UnsupportedOperation { operation, value }
            }
        }
    }
}

impl fmt::Display for PmfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PmfError::UnsupportedOperation { operation, value } => write!(
                f,
                "{} is not defined for non-numeric value {}",
                operation, value
            ),
        }
    }
}

impl Error for PmfError {}

/// anything that can hand out (value, probability) pairs and summarize them
pub trait Distribution {
    type Value: Observation;

    fn items(&self) -> Box<dyn Iterator<Item = (&Self::Value, f64)> + '_>;
    fn prob(&self, value: &Self::Value) -> f64;
    fn mean(&self) -> Result<f64, PmfError>;
    fn variance(&self) -> Result<f64, PmfError>;
}

/// probability mass function built from observed samples
///
/// the table is ordered by value, so every walk over it (and therefore every
/// moment sum) happens in ascending value order
#[derive(Debug, Clone, PartialEq)]
pub struct Pmf<V: Observation> {
    table: BTreeMap<V, f64>,
    label: Option<String>,
}

impl<V: Observation> Pmf<V> {
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        let counts = samples.into_iter().counts();
        let total: usize = counts.values().sum();

        debug!(
            "tallied {} observations into {} distinct values",
            total,
            counts.len()
        );

        let table = counts
            .into_iter()
            .map(|(value, count)| (value, count as f64 / total as f64))
            .collect();

        Self { table, label: None }
    }

    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// sum of all probabilities, 1.0 for anything built from a non-empty sample
    pub fn total(&self) -> f64 {
        self.table.values().sum()
    }

    /// values outside the support have probability zero
    pub fn prob(&self, value: &V) -> f64 {
        self.table.get(value).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.table.keys()
    }

    pub fn items(&self) -> impl Iterator<Item = (&V, f64)> + '_ {
        self.table.iter().map(|(value, p)| (value, *p))
    }

    /// Σ p·x over the support. An empty pmf has mean 0.0 (the empty sum).
    pub fn mean(&self) -> Result<f64, PmfError> {
        if self.is_empty() {
            self.warn_empty("mean");
            return Ok(0.0);
        }

        self.items().try_fold(0.0, |mean, (value, p)| {
            value
                .as_f64()
                .map(|x| mean + p * x)
                .ok_or_else(|| PmfError::unsupported("mean", value))
        })
    }

    /// Σ p·(x - mean)² over the support, using exactly the value `mean` returns
    pub fn variance(&self) -> Result<f64, PmfError> {
        if self.is_empty() {
            self.warn_empty("variance");
            return Ok(0.0);
        }

        let mean = self.mean().map_err(|e| e.for_operation("variance"))?;

        self.items().try_fold(0.0, |var, (value, p)| {
            value
                .as_f64()
                .map(|x| var + p * (x - mean).powi(2))
                .ok_or_else(|| PmfError::unsupported("variance", value))
        })
    }

    pub fn std(&self) -> Result<f64, PmfError> {
        self.variance().map(f64::sqrt)
    }

    fn warn_empty(&self, operation: &str) {
        warn!(
            "{} of empty pmf {:?} taken as 0.0",
            operation,
            self.label().unwrap_or("<unlabelled>")
        );
    }
}

impl<V: Observation> Distribution for Pmf<V> {
    type Value = V;

    fn items(&self) -> Box<dyn Iterator<Item = (&V, f64)> + '_> {
        Box::new(Pmf::items(self))
    }

    fn prob(&self, value: &V) -> f64 {
        Pmf::prob(self, value)
    }

    fn mean(&self) -> Result<f64, PmfError> {
        Pmf::mean(self)
    }

    fn variance(&self) -> Result<f64, PmfError> {
        Pmf::variance(self)
    }
}
