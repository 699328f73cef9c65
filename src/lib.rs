#![cfg_attr(not(test), no_std)]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

//! Maximum flow on directed, capacitated graphs.
//!
//! A [`FlowGraph`] is built with 1-based vertex ids and solved with either
//! [`solve_augmenting_path`] (Edmonds-Karp) or [`solve_push_relabel`] (highest-label
//! push-relabel). Both leave a maximum flow in the graph and return its value; both maintain the
//! residual network incrementally through [`ResidualNetwork`].
//!
//! ```
//! use maxflow::{solve_augmenting_path, solve_push_relabel, FlowGraph};
//!
//! let mut g = FlowGraph::<i64>::new(4);
//! g.add_edge_normalized(1, 2, 3).unwrap();
//! g.add_edge_normalized(1, 3, 2).unwrap();
//! g.add_edge_normalized(2, 3, 1).unwrap();
//! g.add_edge_normalized(2, 4, 2).unwrap();
//! g.add_edge_normalized(3, 4, 3).unwrap();
//!
//! assert_eq!(solve_augmenting_path(&mut g, 1, 4), Ok(5));
//! assert_eq!(solve_push_relabel(&mut g, 1, 4), Ok(5));
//! assert_eq!(g.min_cut(1).unwrap().capacity, 5);
//! ```

extern crate alloc;

pub mod algo;
pub mod amount;
pub mod cut;
pub mod edge;
pub mod error;
pub mod graph;
pub mod interop;
pub mod residual;
pub mod vertex;

pub use crate::algo::edmonds_karp::{
    shortest_augmenting_path, solve_augmenting_path, AugmentingPath, EdmondsKarp,
};
pub use crate::algo::push_relabel::{solve_push_relabel, PushRelabel};
pub use crate::algo::{Algorithm, MaxFlow};
pub use crate::amount::Amount;
pub use crate::cut::MinCut;
pub use crate::edge::EdgeSpec;
pub use crate::error::Error;
pub use crate::graph::FlowGraph;
pub use crate::residual::ResidualNetwork;
pub use crate::vertex::{Edge, Vertex, VertexId};
