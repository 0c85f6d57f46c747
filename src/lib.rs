//! Selection and query engine for metadata dependency graphs.
//!
//! The engine keeps track of which nodes a user has selected in a force-directed view
//! of the graph. It turns dragged boxes into graph-space hit tests, runs regex searches
//! over node attributes, grows and shrinks selections along edges and projects the
//! selection into the grouped listing a side panel shows. Layout and rendering stay
//! outside: the engine reads a [`graph::layout::Layout`] snapshot and a
//! [`geometry::Transform`] and notifies subscribers of a
//! [`selection::store::SelectionStore`] after every change.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod loader;
pub mod query;
pub mod selection;
pub mod session;
