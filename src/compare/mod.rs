//! Property comparator over an explicit accessor table.
//!
//! Each dotted path (`"address.city"`) is registered once with a function
//! that extracts its value, so lookups never rely on runtime reflection.
//! Missing values are `PropertyValue::Null`, which sorts before everything.
//!
//! ```
//! use toolbelt::compare::{PropertyComparator, SortKey};
//!
//! struct City { name: &'static str, population: i64 }
//!
//! let comparator = PropertyComparator::builder()
//!     .property("name", |c: &City| c.name.into())
//!     .property("stats.population", |c: &City| c.population.into())
//!     .build()
//!     .unwrap();
//!
//! let mut cities = vec![
//!     City { name: "Lyon", population: 520_000 },
//!     City { name: "Paris", population: 2_100_000 },
//! ];
//! comparator.sort(&mut cities, &[SortKey::desc("stats.population")]).unwrap();
//! assert_eq!(cities[0].name, "Paris");
//! ```

use crate::utils::error::CompareError;
use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Value extracted from one property
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    fn rank(&self) -> u8 {
        match self {
            PropertyValue::Null => 0,
            PropertyValue::Bool(_) => 1,
            PropertyValue::Int(_) | PropertyValue::Float(_) => 2,
            PropertyValue::Text(_) => 3,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use PropertyValue::*;

        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropertyValue {}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Int(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Null, Into::into)
    }
}

/// Sort direction of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One property in a multi-key ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub path: String,
    pub direction: Direction,
}

impl SortKey {
    pub fn asc(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direction: Direction::Descending,
        }
    }
}

type Accessor<T> = Box<dyn Fn(&T) -> PropertyValue + Send + Sync>;

/// Builder collecting the accessor table
pub struct PropertyComparatorBuilder<T> {
    accessors: Vec<(String, Accessor<T>)>,
}

impl<T> PropertyComparatorBuilder<T> {
    /// Register `accessor` under the dotted `path`
    pub fn property<F>(mut self, path: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> PropertyValue + Send + Sync + 'static,
    {
        self.accessors.push((path.into(), Box::new(accessor)));
        self
    }

    /// # Errors
    /// * `CompareError::DuplicateProperty` - a path was registered twice
    pub fn build(self) -> Result<PropertyComparator<T>, CompareError> {
        let mut accessors = HashMap::with_capacity(self.accessors.len());
        for (path, accessor) in self.accessors {
            if accessors.contains_key(&path) {
                return Err(CompareError::DuplicateProperty(path));
            }
            accessors.insert(path, accessor);
        }

        debug!("Built property comparator with {} properties", accessors.len());
        Ok(PropertyComparator { accessors })
    }
}

/// Compares values of `T` by registered properties
pub struct PropertyComparator<T> {
    accessors: HashMap<String, Accessor<T>>,
}

impl<T> PropertyComparator<T> {
    pub fn builder() -> PropertyComparatorBuilder<T> {
        PropertyComparatorBuilder {
            accessors: Vec::new(),
        }
    }

    /// Registered paths, sorted
    pub fn properties(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.accessors.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Extract the value of `path` from `item`
    pub fn value(&self, item: &T, path: &str) -> Result<PropertyValue, CompareError> {
        self.accessor(path).map(|accessor| accessor(item))
    }

    /// Compare two items by one property, ascending
    pub fn compare(&self, a: &T, b: &T, path: &str) -> Result<Ordering, CompareError> {
        let accessor = self.accessor(path)?;
        Ok(accessor(a).cmp(&accessor(b)))
    }

    /// Compare by several keys; later keys break ties of earlier ones
    pub fn compare_by(&self, a: &T, b: &T, keys: &[SortKey]) -> Result<Ordering, CompareError> {
        let accessors = self.resolve(keys)?;
        Ok(Self::compare_resolved(&accessors, a, b))
    }

    /// Stable sort of `items` by `keys`
    ///
    /// All keys are checked before anything moves.
    pub fn sort(&self, items: &mut [T], keys: &[SortKey]) -> Result<(), CompareError> {
        let accessors = self.resolve(keys)?;
        items.sort_by(|a, b| Self::compare_resolved(&accessors, a, b));
        Ok(())
    }

    fn accessor(&self, path: &str) -> Result<&Accessor<T>, CompareError> {
        self.accessors
            .get(path)
            .ok_or_else(|| CompareError::UnknownProperty(path.to_string()))
    }

    fn resolve(&self, keys: &[SortKey]) -> Result<Vec<(&Accessor<T>, Direction)>, CompareError> {
        keys.iter()
            .map(|key| {
                self.accessor(&key.path)
                    .map(|accessor| (accessor, key.direction))
            })
            .collect()
    }

    fn compare_resolved(accessors: &[(&Accessor<T>, Direction)], a: &T, b: &T) -> Ordering {
        for (accessor, direction) in accessors {
            let ordering = accessor(a).cmp(&accessor(b));
            let ordering = match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
