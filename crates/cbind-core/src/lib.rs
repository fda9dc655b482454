//! Core data model for the cbind binding generator.
//!
//! Describes foreign (C-ABI) functions after type resolution, and the
//! identifier rules that turn foreign spellings into target-language names.
//!
//! ## Modules
//!
//! - [`types`] - Normalized type descriptors and the type tags shape rules key on
//! - [`function`] - Functions, parameters, receivers and array accessors
//! - [`naming`] - Prefix trimming, receiver names and reserved-word substitution
//! - [`error`] - Naming precondition errors

pub mod error;
pub mod function;
pub mod naming;
pub mod types;

pub use error::NamingError;
pub use function::{
    ArrayDimensions, ArraySize, Function, FunctionParameter, FunctionSliceReturn, Receiver,
};
pub use naming::{upper_first, NamingConfig, Normalizer};
pub use types::{NormalizedType, TypeTags};
