#![forbid(unsafe_code)]

//! Headless graph layout: a deterministic radial cluster layout for trees and
//! a steppable force-directed simulation for node/link sets.
//!
//! Both pipelines emit plain coordinates ([`PlacedNode`] polar pairs, or
//! per-step [`Simulation::positions`] snapshots) for a rendering collaborator
//! to draw; nothing here touches a drawing surface. Algorithms are ports of
//! d3-hierarchy `cluster` and d3-force, with randomness made explicit and
//! seedable.

pub mod cluster;
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod sim;

pub use cluster::{PlacedNode, layout_hierarchy};
pub use error::{Error, Result};
pub use graph::{Extent, Graph, Link, Node, Point};
pub use hierarchy::{Hierarchy, HierarchyEntry, TreeNode};
pub use sim::{SimNode, SimOptions, Simulation, drag::DragController};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
