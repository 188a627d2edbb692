//! Pure, read-only views derived from an acquired snapshot.
//!
//! Nothing here touches the network or the filesystem, and every function
//! returns a new value without modifying its input.

pub mod kpi;
pub mod trends;
pub mod windows;
