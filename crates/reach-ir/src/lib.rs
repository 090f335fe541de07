#![doc = include_str!("../README.md")]

//! Reachability intermediate representation.
//!
//! This crate defines the sort lattice and symbol signatures of a language
//! definition, the term language symbolic states are written in, constrained
//! terms (`CTerm`) and constrained substitutions (`CSubst`), rewrite claims,
//! and the opaque log entries a rewrite backend attaches to states.

pub mod claim;
pub mod cterm;
pub mod definition;
pub mod hash;
pub mod log_entry;
pub mod sorts;
pub mod subst;
pub mod terms;

pub use claim::Claim;
pub use cterm::CTerm;
pub use definition::{Definition, Symbol};
pub use log_entry::LogEntry;
pub use sorts::{Sort, SortError, SortLattice};
pub use subst::{CSubst, Subst};
pub use terms::Term;
