use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::sorts::{Sort, SortError, SortLattice};
use crate::terms::Term;

/// Declared signature of a symbol: argument sorts and result sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub label: String,
    pub arg_sorts: Vec<Sort>,
    pub result: Sort,
}

impl Symbol {
    pub fn new(label: impl Into<String>, arg_sorts: Vec<Sort>, result: Sort) -> Self {
        Self {
            label: label.into(),
            arg_sorts,
            result,
        }
    }
}

/// The parts of a language definition the prover needs: the main module
/// name, the subsort lattice and the symbol signatures.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    main_module: String,
    lattice: SortLattice,
    symbols: IndexMap<String, Symbol>,
}

impl Definition {
    pub fn new(
        main_module: impl Into<String>,
        lattice: SortLattice,
        symbols: impl IntoIterator<Item = Symbol>,
    ) -> Self {
        Self {
            main_module: main_module.into(),
            lattice,
            symbols: symbols
                .into_iter()
                .map(|s| (s.label.clone(), s))
                .collect(),
        }
    }

    pub fn main_module(&self) -> &str {
        &self.main_module
    }

    pub fn lattice(&self) -> &SortLattice {
        &self.lattice
    }

    pub fn symbol(&self, label: &str) -> Result<&Symbol, SortError> {
        self.symbols
            .get(label)
            .ok_or_else(|| SortError::UnknownSymbol(label.to_string()))
    }

    /// Sort of a term as determined by its head.
    pub fn infer_sort(&self, term: &Term) -> Result<Sort, SortError> {
        match term {
            Term::Var { sort: Some(sort), .. } => Ok(sort.clone()),
            Term::Var { name, sort: None } => Err(SortError::UnsortedVariable(name.clone())),
            Term::Token { sort, .. } => Ok(sort.clone()),
            Term::Apply { label, .. } => Ok(self.symbol(label)?.result.clone()),
            Term::Inj { to, .. } => Ok(to.clone()),
        }
    }

    /// Sorts the head of `term` requires of its immediate children.
    pub fn argument_sorts(&self, term: &Term) -> Result<Vec<Sort>, SortError> {
        match term {
            Term::Apply { label, args } => {
                let symbol = self.symbol(label)?;
                if symbol.arg_sorts.len() != args.len() {
                    return Err(SortError::ArityMismatch {
                        label: label.clone(),
                        expected: symbol.arg_sorts.len(),
                        found: args.len(),
                    });
                }
                Ok(symbol.arg_sorts.clone())
            }
            Term::Inj { from, .. } => Ok(vec![from.clone()]),
            Term::Var { .. } | Term::Token { .. } => Ok(Vec::new()),
        }
    }

    /// Insert explicit injections so that every subterm has exactly the sort
    /// its context requires.
    ///
    /// Children are processed first against the parent's declared argument
    /// sorts, then the term itself is checked against `sort` (the top sort
    /// when `None`).
    pub fn add_injections(&self, term: &Term, sort: Option<&Sort>) -> Result<Term, SortError> {
        let required = sort.cloned().unwrap_or_else(Sort::top);
        let retyped = match term {
            Term::Apply { label, args } => {
                let arg_sorts = self.argument_sorts(term)?;
                let args = args
                    .iter()
                    .zip(&arg_sorts)
                    .map(|(arg, s)| self.add_injections(arg, Some(s)))
                    .collect::<Result<Vec<_>, _>>()?;
                Term::Apply {
                    label: label.clone(),
                    args,
                }
            }
            Term::Inj { from, to, arg } => Term::Inj {
                from: from.clone(),
                to: to.clone(),
                arg: Box::new(self.add_injections(arg, Some(from))?),
            },
            Term::Var { .. } | Term::Token { .. } => term.clone(),
        };
        self.inject(retyped, &required)
    }

    fn inject(&self, term: Term, required: &Sort) -> Result<Term, SortError> {
        let actual = self.infer_sort(&term)?;
        if &actual == required {
            return Ok(term);
        }
        if self.lattice.is_subsort(&actual, required) {
            return Ok(Term::Inj {
                from: actual,
                to: required.clone(),
                arg: Box::new(term),
            });
        }
        Err(SortError::NotSubsort {
            actual,
            expected: required.clone(),
        })
    }

    /// Annotate unsorted variables with the most specific sort compatible
    /// with every position they occur in.
    ///
    /// `sort` is the sort expected of `term` itself. Variables occurring only
    /// under undeclared symbols are left unsorted.
    pub fn sort_vars(&self, term: &Term, sort: Option<&Sort>) -> Result<Term, SortError> {
        let mut occurrences: BTreeMap<String, Vec<Sort>> = BTreeMap::new();
        self.collect_occurrences(term, sort, &mut occurrences);

        let mut assigned = BTreeMap::new();
        for (name, sorts) in occurrences {
            assigned.insert(name, self.lattice.meet_all(&sorts)?);
        }
        Ok(annotate(term, &assigned))
    }

    fn collect_occurrences(
        &self,
        term: &Term,
        expected: Option<&Sort>,
        out: &mut BTreeMap<String, Vec<Sort>>,
    ) {
        match term {
            Term::Var { name, sort: None } => {
                if let Some(sort) = expected {
                    out.entry(name.clone()).or_default().push(sort.clone());
                }
            }
            _ => {
                let arg_sorts = self.argument_sorts(term).ok();
                for (i, child) in term.children().iter().enumerate() {
                    let child_sort = arg_sorts.as_ref().and_then(|s| s.get(i));
                    self.collect_occurrences(child, child_sort, out);
                }
            }
        }
    }
}

fn annotate(term: &Term, assigned: &BTreeMap<String, Sort>) -> Term {
    match term {
        Term::Var { name, sort: None } => match assigned.get(name) {
            Some(sort) => Term::sorted_var(name.clone(), sort.clone()),
            None => term.clone(),
        },
        Term::Var { .. } | Term::Token { .. } => term.clone(),
        Term::Apply { label, args } => Term::Apply {
            label: label.clone(),
            args: args.iter().map(|a| annotate(a, assigned)).collect(),
        },
        Term::Inj { from, to, arg } => Term::Inj {
            from: from.clone(),
            to: to.clone(),
            arg: Box::new(annotate(arg, assigned)),
        },
    }
}
