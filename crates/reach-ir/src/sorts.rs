use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Name of the universal top sort.
pub const TOP_SORT: &str = "K";

/// A sort of the language definition, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort(String);

impl Sort {
    pub fn new(name: impl Into<String>) -> Self {
        Sort(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// The universal top sort `K`.
    pub fn top() -> Self {
        Sort::new(TOP_SORT)
    }

    pub fn is_top(&self) -> bool {
        self.0 == TOP_SORT
    }

    pub fn k_item() -> Self {
        Sort::new("KItem")
    }

    pub fn bool() -> Self {
        Sort::new("Bool")
    }

    pub fn int() -> Self {
        Sort::new("Int")
    }

    /// Sort of a complete configuration.
    pub fn generated_top_cell() -> Self {
        Sort::new("GeneratedTopCell")
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by sort computations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("Sorts have no common subsort: {left}, {right}")]
    NoCommonSubsort { left: Sort, right: Sort },
    #[error("Sorts {left} and {right} have several maximal common subsorts: {}", format_sorts(.candidates))]
    AmbiguousMeet {
        left: Sort,
        right: Sort,
        candidates: Vec<Sort>,
    },
    #[error("Sort {actual} is not a subsort of {expected}")]
    NotSubsort { actual: Sort, expected: Sort },
    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(String),
    #[error("Symbol '{label}' expects {expected} argument(s), found {found}")]
    ArityMismatch {
        label: String,
        expected: usize,
        found: usize,
    },
    #[error("Variable '{0}' has no sort")]
    UnsortedVariable(String),
}

fn format_sorts(sorts: &[Sort]) -> String {
    sorts
        .iter()
        .map(Sort::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Subsort relation of a definition.
///
/// Maps each sort to the set of its direct and transitive subsorts. The top
/// sort is a supersort of every sort without having to be declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortLattice {
    subsorts: IndexMap<Sort, IndexSet<Sort>>,
}

impl SortLattice {
    /// Build the lattice from declared `(subsort, supersort)` facts.
    pub fn new(facts: impl IntoIterator<Item = (Sort, Sort)>) -> Self {
        let mut subsorts: IndexMap<Sort, IndexSet<Sort>> = IndexMap::new();
        for (sub, sup) in facts {
            if sub != sup {
                subsorts.entry(sup).or_default().insert(sub);
            }
        }

        // Close under transitivity.
        loop {
            let mut changed = false;
            let supers: Vec<Sort> = subsorts.keys().cloned().collect();
            for sup in &supers {
                let direct: Vec<Sort> = subsorts[sup].iter().cloned().collect();
                let mut inherited = Vec::new();
                for sub in &direct {
                    if let Some(below) = subsorts.get(sub) {
                        inherited.extend(below.iter().filter(|s| *s != sup).cloned());
                    }
                }
                let entry = subsorts.entry(sup.clone()).or_default();
                for sort in inherited {
                    changed |= entry.insert(sort);
                }
            }
            if !changed {
                break;
            }
        }

        Self { subsorts }
    }

    /// Declared subsorts of `sort` (direct and transitive).
    pub fn subsorts(&self, sort: &Sort) -> impl Iterator<Item = &Sort> {
        self.subsorts.get(sort).into_iter().flat_map(|s| s.iter())
    }

    fn subsort_count(&self, sort: &Sort) -> usize {
        self.subsorts.get(sort).map_or(0, IndexSet::len)
    }

    /// Return whether `sort1` is a subsort of `sort2`.
    pub fn is_subsort(&self, sort1: &Sort, sort2: &Sort) -> bool {
        if sort1 == sort2 {
            return true;
        }
        if sort2.is_top() {
            return true;
        }
        if sort1.is_top() {
            return false;
        }
        self.subsorts
            .get(sort2)
            .is_some_and(|subs| subs.contains(sort1))
    }

    /// Most specific common subsort of two sorts.
    ///
    /// Among the common subsorts the one with the largest subsort set wins.
    /// When several candidates tie, the meet is ambiguous and an error is
    /// returned.
    pub fn meet(&self, sort1: &Sort, sort2: &Sort) -> Result<Sort, SortError> {
        if self.is_subsort(sort1, sort2) {
            return Ok(sort1.clone());
        }
        if self.is_subsort(sort2, sort1) {
            return Ok(sort2.clone());
        }

        let below1: IndexSet<&Sort> = self.subsorts(sort1).chain([sort1]).collect();
        let below2: IndexSet<&Sort> = self.subsorts(sort2).chain([sort2]).collect();
        let common: Vec<&Sort> = below1.intersection(&below2).copied().collect();

        let Some(max_count) = common.iter().map(|s| self.subsort_count(s)).max() else {
            return Err(SortError::NoCommonSubsort {
                left: sort1.clone(),
                right: sort2.clone(),
            });
        };
        let mut maximal: Vec<Sort> = common
            .into_iter()
            .filter(|s| self.subsort_count(s) == max_count)
            .cloned()
            .collect();

        if maximal.len() == 1 {
            return Ok(maximal.remove(0));
        }
        maximal.sort();
        Err(SortError::AmbiguousMeet {
            left: sort1.clone(),
            right: sort2.clone(),
            candidates: maximal,
        })
    }

    /// Left fold of [`SortLattice::meet`] starting from the top sort.
    pub fn meet_all<'a>(&self, sorts: impl IntoIterator<Item = &'a Sort>) -> Result<Sort, SortError> {
        sorts
            .into_iter()
            .try_fold(Sort::top(), |acc, sort| self.meet(&acc, sort))
    }
}
