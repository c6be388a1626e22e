#![deny(
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![warn(unreachable_pub, clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

extern crate alloc;

#[macro_use]
mod log;

mod error;
pub use error::{Error, Result};
mod identity;
pub use identity::UdtIdentity;
mod value;
pub use value::{Record, Value};
mod kind;
pub use kind::{OracleDbType, MAX_VARCHAR2_LENGTH};
mod bind;
pub use bind::{BindParameter, BindSink, Direction};
pub mod convert;
pub mod udt;
mod correspondence;
pub use correspondence::PropertyCorrespondence;
mod preset;
pub use preset::{Preset, PresetConfiguration};
mod definition;
pub use definition::{AttributeDefinition, AttributeKind, UdtDefinition};
mod cursor;
pub use cursor::Cursor;
pub mod metadata;
pub use metadata::{Fragment, TypeMetadata, UdtKind};
mod registry;
pub use registry::MetadataRegistry;
pub mod parameter;
pub use parameter::{
    InputFragment, Marshaller, ObjectParam, OutputFragment, Parameter, RawOutput,
    ScalarManagedParam, ScalarNativeParam,
};
mod statement;
pub use statement::{OutputRoute, Statement, StatementAssembler};

#[cfg(test)]
mod test_utils;
