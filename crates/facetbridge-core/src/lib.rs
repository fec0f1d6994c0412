#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! facetbridge-core
//!
//! Engine-agnostic request/response model, collaborator traits, errors and
//! configuration shared by the translation layer and the engine adapters.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
