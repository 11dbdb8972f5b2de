//! Counter data model

pub mod counter;
pub mod location;
