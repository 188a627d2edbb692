pub mod cardinal;
pub mod frames;
pub mod frequency;
pub mod location;
pub mod records;
pub mod snapshot;
