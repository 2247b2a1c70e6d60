//! Timing algebra.
//!
//! Pure operations over [`Signal`](crate::Signal) values:
//! - Intersection of two domains, the pretest of every binary operator
//! - The AND/OR/XOR/NOT merge engine and its operator impls
//! - Split, join, chop and bounded streaming

mod intersect;
mod logic;
mod structure;

pub use intersect::{Intersection, Window};
pub use logic::LogicOp;
