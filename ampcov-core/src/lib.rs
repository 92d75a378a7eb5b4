//! Core library for ampcov: shared models, errors, and IO utilities for
//! aggregating per-position sequencing depth over amplicon target windows.

pub mod errors;
pub mod models;
pub mod utils;
