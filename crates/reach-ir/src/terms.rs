use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::sorts::Sort;
use crate::subst::Subst;

/// Label of the matching-logic equality predicate.
pub const EQUALS_LABEL: &str = "#Equals";
/// Label of the matching-logic conjunction.
pub const AND_LABEL: &str = "#And";
/// Label of the matching-logic top predicate.
pub const TOP_LABEL: &str = "#Top";
/// Label of boolean negation.
pub const NOT_BOOL_LABEL: &str = "notBool_";
/// Label of boolean conjunction.
pub const AND_BOOL_LABEL: &str = "_andBool_";

/// A term of the definition's language.
///
/// Configurations, path constraints and substitution values are all terms.
/// The serialized form is tagged by `node` so records stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum Term {
    /// Variable, optionally annotated with its sort.
    #[serde(rename = "KVariable")]
    Var {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sort: Option<Sort>,
    },
    /// Literal token of a builtin sort.
    #[serde(rename = "KToken")]
    Token { token: String, sort: Sort },
    /// Application of a symbol to arguments.
    #[serde(rename = "KApply")]
    Apply { label: String, args: Vec<Term> },
    /// Explicit upcast of a term from a subsort to a supersort.
    #[serde(rename = "KInj")]
    Inj { from: Sort, to: Sort, arg: Box<Term> },
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var {
            name: name.into(),
            sort: None,
        }
    }

    pub fn sorted_var(name: impl Into<String>, sort: Sort) -> Self {
        Term::Var {
            name: name.into(),
            sort: Some(sort),
        }
    }

    pub fn token(token: impl Into<String>, sort: Sort) -> Self {
        Term::Token {
            token: token.into(),
            sort,
        }
    }

    pub fn int(n: i64) -> Self {
        Term::token(n.to_string(), Sort::int())
    }

    pub fn bool(b: bool) -> Self {
        Term::token(b.to_string(), Sort::bool())
    }

    pub fn apply(label: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Apply {
            label: label.into(),
            args,
        }
    }

    /// The matching-logic top predicate.
    pub fn top() -> Self {
        Term::apply(TOP_LABEL, vec![])
    }

    /// `#Equals(lhs, rhs)`.
    pub fn equals(lhs: Term, rhs: Term) -> Self {
        Term::apply(EQUALS_LABEL, vec![lhs, rhs])
    }

    /// `#Equals(true, term)`: lifts a boolean expression to a predicate.
    pub fn equals_true(term: Term) -> Self {
        Term::equals(Term::bool(true), term)
    }

    pub fn not_bool(term: Term) -> Self {
        Term::apply(NOT_BOOL_LABEL, vec![term])
    }

    /// Conjunction of predicates, flattened and without `#Top` units.
    pub fn ml_and(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut conjuncts: Vec<Term> = terms.into_iter().flat_map(Term::flatten_and).collect();
        match conjuncts.len() {
            0 => Term::top(),
            1 => conjuncts.remove(0),
            _ => Term::apply(AND_LABEL, conjuncts),
        }
    }

    /// Split a predicate into its conjuncts, dropping `#Top`.
    pub fn flatten_and(self) -> Vec<Term> {
        match self {
            Term::Apply { label, args } if label == AND_LABEL => {
                args.into_iter().flat_map(Term::flatten_and).collect()
            }
            t if t.is_top() => vec![],
            t => vec![t],
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Term::Apply { label, args } if label == TOP_LABEL && args.is_empty())
    }

    /// Convert a predicate to a boolean expression where the shape allows it.
    ///
    /// `#Equals(true, e)` and `#Equals(e, true)` become `e`, `#Top` becomes
    /// `true`; anything else is returned unchanged.
    pub fn pred_to_bool(&self) -> Term {
        let truth = Term::bool(true);
        match self {
            Term::Apply { label, args } if label == EQUALS_LABEL && args.len() == 2 => {
                if args[0] == truth {
                    args[1].clone()
                } else if args[1] == truth {
                    args[0].clone()
                } else {
                    self.clone()
                }
            }
            t if t.is_top() => truth,
            _ => self.clone(),
        }
    }

    /// Immediate subterms.
    pub fn children(&self) -> &[Term] {
        match self {
            Term::Apply { args, .. } => args,
            Term::Inj { arg, .. } => std::slice::from_ref(arg.as_ref()),
            Term::Var { .. } | Term::Token { .. } => &[],
        }
    }

    /// Names of all variables occurring in the term.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut BTreeSet<String>) {
        if let Term::Var { name, .. } = self {
            out.insert(name.clone());
        }
        for child in self.children() {
            child.collect_vars(out);
        }
    }

    /// Find the first subterm (pre-order) applying `label` and return its
    /// single argument.
    pub fn cell(&self, label: &str) -> Option<&Term> {
        match self {
            Term::Apply { label: l, args } if l == label && args.len() == 1 => Some(&args[0]),
            _ => self.children().iter().find_map(|c| c.cell(label)),
        }
    }

    /// Match `self` as a pattern against `term`.
    ///
    /// Pattern variables bind to subterms of `term`; repeated variables must
    /// bind consistently. Sort annotations on pattern variables are not
    /// checked.
    pub fn match_term(&self, term: &Term) -> Option<Subst> {
        let mut subst = Subst::default();
        if self.match_into(term, &mut subst) {
            Some(subst)
        } else {
            None
        }
    }

    fn match_into(&self, term: &Term, subst: &mut Subst) -> bool {
        match (self, term) {
            (Term::Var { name, .. }, _) => match subst.get(name) {
                Some(bound) => bound == term,
                None => {
                    subst.insert(name.clone(), term.clone());
                    true
                }
            },
            (Term::Token { .. }, _) => self == term,
            (Term::Apply { label: l1, args: a1 }, Term::Apply { label: l2, args: a2 }) => {
                l1 == l2
                    && a1.len() == a2.len()
                    && a1.iter().zip(a2).all(|(p, t)| p.match_into(t, subst))
            }
            (
                Term::Inj {
                    from: f1,
                    to: t1,
                    arg: p,
                },
                Term::Inj {
                    from: f2,
                    to: t2,
                    arg: t,
                },
            ) => f1 == f2 && t1 == t2 && p.match_into(t, subst),
            _ => false,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var { name, sort: None } => write!(f, "{name}"),
            Term::Var {
                name,
                sort: Some(sort),
            } => write!(f, "{name}:{sort}"),
            Term::Token { token, .. } => write!(f, "{token}"),
            Term::Apply { label, args } if args.is_empty() => write!(f, "{label}"),
            Term::Apply { label, args } => {
                write!(f, "{label}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Term::Inj { from, to, arg } => write!(f, "inj{{{from}, {to}}}({arg})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ml_and_flattens_and_drops_top() {
        let a = Term::equals_true(Term::var("A"));
        let b = Term::equals_true(Term::var("B"));
        let nested = Term::ml_and([a.clone(), Term::top(), Term::ml_and([b.clone()])]);
        assert_eq!(nested, Term::apply(AND_LABEL, vec![a.clone(), b]));
        assert_eq!(Term::ml_and([Term::top()]), Term::top());
        assert_eq!(Term::ml_and([a.clone()]), a);
    }

    #[test]
    fn pred_to_bool_unwraps_equals_true() {
        let e = Term::apply("_<Int_", vec![Term::var("X"), Term::int(3)]);
        assert_eq!(Term::equals_true(e.clone()).pred_to_bool(), e);
        assert_eq!(Term::equals(e.clone(), Term::bool(true)).pred_to_bool(), e);
        assert_eq!(Term::top().pred_to_bool(), Term::bool(true));
    }

    #[test]
    fn matching_binds_variables_consistently() {
        let pattern = Term::apply("pair", vec![Term::var("X"), Term::var("X")]);
        let same = Term::apply("pair", vec![Term::int(1), Term::int(1)]);
        let different = Term::apply("pair", vec![Term::int(1), Term::int(2)]);

        let subst = pattern.match_term(&same).expect("should match");
        assert_eq!(subst.get("X"), Some(&Term::int(1)));
        assert!(pattern.match_term(&different).is_none());
    }

    #[test]
    fn cell_finds_nested_cell_contents() {
        let config = Term::apply(
            "<generatedTop>",
            vec![
                Term::apply("<k>", vec![Term::var("K")]),
                Term::apply("<pc>", vec![Term::int(4)]),
            ],
        );
        assert_eq!(config.cell("<pc>"), Some(&Term::int(4)));
        assert_eq!(config.cell("<missing>"), None);
    }

    #[test]
    fn serialized_form_is_tagged_by_node_kind() {
        let t = Term::apply("f", vec![Term::var("X")]);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["node"], "KApply");
        assert_eq!(json["args"][0]["node"], "KVariable");
        let back: Term = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}
