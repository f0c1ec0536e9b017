//! # Guidance interface types
//!
//! This crate defines the data exchanged between the guidance core and its
//! external collaborators: pose samples in, path primitives and target
//! waypoint markers out. How these travel (middleware, serial link, shared
//! memory) is the collaborator's business, so everything here is plain data
//! with serde support.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod path;
mod pose;
mod waypoint;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use path::*;
pub use pose::*;
pub use waypoint::*;
