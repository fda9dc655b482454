//! Binding synthesis for C-ABI functions.
//!
//! Turns normalized foreign function records into cgo wrapper source:
//! declared signature, argument marshalling, the foreign call, scheduled
//! releases and return-value reshaping.
//!
//! ## Modules
//!
//! - [`resolve`] - Type handles and the type-resolution seam
//! - [`extract`] - Foreign symbols → normalized [`Function`](cbind_core::Function) records
//! - [`shape`] - Parameter and return shape classification
//! - [`syntax`] - Statement/expression nodes and the source formatter
//! - [`synth`] - The general wrapper synthesizer
//! - [`template`] - Struct-field getter and array accessor renderers
//! - [`declaration`] - `.bind.toml` declaration file parsing
//! - [`config`] - Generator configuration
//! - [`bindings`] - Whole-declaration generation

pub mod bindings;
pub mod config;
pub mod declaration;
pub mod error;
pub mod extract;
pub mod resolve;
pub mod shape;
pub mod syntax;
pub mod synth;
pub mod template;

// Re-export key types for convenience
pub use bindings::{generate_bindings, normalize, Binding, GeneratedBinding};
pub use config::GenConfig;
pub use declaration::BindingDeclaration;
pub use error::GenError;
pub use extract::{ArrayElement, Extractor, ForeignArgument, ForeignSymbol, MemberAccess};
pub use resolve::{TypeHandle, TypeResolver, TypeTable};
pub use synth::Synthesizer;
