pub use strata_types::prelude::*;

// vim: ts=4
