use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::terms::Term;

/// Mapping from variable names to terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subst(BTreeMap<String, Term>);

impl Subst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: String, term: Term) -> Option<Term> {
        self.0.insert(name, term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Term)> {
        self.0.iter()
    }

    /// Replace every bound variable in `term` by its binding.
    pub fn apply(&self, term: &Term) -> Term {
        if self.is_empty() {
            return term.clone();
        }
        match term {
            Term::Var { name, .. } => self.0.get(name).cloned().unwrap_or_else(|| term.clone()),
            Term::Token { .. } => term.clone(),
            Term::Apply { label, args } => Term::Apply {
                label: label.clone(),
                args: args.iter().map(|a| self.apply(a)).collect(),
            },
            Term::Inj { from, to, arg } => Term::Inj {
                from: from.clone(),
                to: to.clone(),
                arg: Box::new(self.apply(arg)),
            },
        }
    }

    /// The substitution as a conjunction of `#Equals(var, term)` predicates.
    pub fn ml_pred(&self) -> Term {
        Term::ml_and(
            self.0
                .iter()
                .map(|(name, term)| Term::equals(Term::var(name.clone()), term.clone())),
        )
    }
}

impl FromIterator<(String, Term)> for Subst {
    fn from_iter<I: IntoIterator<Item = (String, Term)>>(iter: I) -> Self {
        Subst(iter.into_iter().collect())
    }
}

impl fmt::Display for Subst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, term)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name} |-> {term}")?;
        }
        write!(f, "}}")
    }
}

/// A substitution together with extra constraints that must hold for it.
///
/// Witnesses subsumption on Cover edges and guards the branches of a Split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CSubst {
    #[serde(default)]
    pub subst: Subst,
    #[serde(default)]
    pub constraints: Vec<Term>,
}

impl CSubst {
    pub fn new(subst: Subst, constraints: impl IntoIterator<Item = Term>) -> Self {
        Self {
            subst,
            constraints: constraints
                .into_iter()
                .flat_map(Term::flatten_and)
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A constraint-only witness, as produced by a case split.
    pub fn from_constraints(constraints: impl IntoIterator<Item = Term>) -> Self {
        Self::new(Subst::default(), constraints)
    }

    /// Conjunction of all constraints.
    pub fn constraint(&self) -> Term {
        Term::ml_and(self.constraints.iter().cloned())
    }

    /// Conjunction of the substitution equalities and the constraints.
    pub fn pred(&self) -> Term {
        Term::ml_and([self.subst.ml_pred(), self.constraint()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_bound_variables_only() {
        let subst: Subst = [("X".to_string(), Term::int(7))].into_iter().collect();
        let term = Term::apply("f", vec![Term::var("X"), Term::var("Y")]);
        assert_eq!(
            subst.apply(&term),
            Term::apply("f", vec![Term::int(7), Term::var("Y")])
        );
    }

    #[test]
    fn ml_pred_of_empty_subst_is_top() {
        assert!(Subst::new().ml_pred().is_top());
        let subst: Subst = [("X".to_string(), Term::int(1))].into_iter().collect();
        assert_eq!(subst.ml_pred(), Term::equals(Term::var("X"), Term::int(1)));
    }

    #[test]
    fn csubst_flattens_conjunctions() {
        let a = Term::equals_true(Term::var("A"));
        let b = Term::equals_true(Term::var("B"));
        let csubst = CSubst::from_constraints([Term::ml_and([a.clone(), b.clone()]), Term::top()]);
        assert_eq!(csubst.constraints, vec![a, b]);
    }
}
