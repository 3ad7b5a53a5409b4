//! Domain types.
//!
//! - attribute descriptors, typed values and the error policy (`types`)
//! - the full vehicle profile document and associated-vehicle listing (`profile`)
//! - partner authorization and user context shapes (`partner`)

pub mod partner;
pub mod profile;
pub mod types;

pub use partner::*;
pub use profile::*;
pub use types::*;
