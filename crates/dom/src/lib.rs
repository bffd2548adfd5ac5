//! In-memory document model standing in for the live page.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Removing a node only
//! detaches it, so handles held by widgets stay valid and removal can be
//! repeated safely. [`Document::parse`] and [`Document::to_markup`] move a page
//! between well-formed markup and the model, and [`Scheduler`] replaces the
//! browser's timers with a manually advanced clock.

mod document;
mod markup;
mod scheduler;

pub use document::{Document, NodeId};
pub use markup::DomError;
pub use scheduler::{Scheduler, TimerId};
