//! # svcdbg-core - Core Domain Types
//!
//! Foundation crate for the service debugger. Provides the reflected schema model,
//! the persistent value tree edited by the request editor, the scalar codec, and
//! error handling.
//!
//! ## Public API
//!
//! ### Schema (`schema`)
//! - [`FieldType`], [`FieldLabel`], [`FieldSchema`] - Reflected field definitions
//! - [`MessageSchema`], [`EnumMember`] - Message and enum entries
//! - [`SchemaRegistry`] - Type name to schema lookup for one method
//! - [`RpcInfo`], [`MethodCatalog`] - Describe and list results
//!
//! ### Values (`value`)
//! - [`Value`] - Copy-on-write value tree
//! - [`ValuePath`] - Address of a node, displayed as `/a/0/b`
//!
//! ### Scalar Codec (`codec`)
//! - [`codec::parse()`], [`codec::format()`] - Text ⇄ value for leaf fields
//! - [`FieldParseError`] - Field-local parse failure
//!
//! ### Validation (`validate`)
//! - [`validate::conform()`] - Check a tree against a schema
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`SyncParseError`] - Text view commit failure
//! - [`NetworkFailure`] - Gateway failure in notification form
//!
//! ## Prelude
//!
//! ```rust
//! use svcdbg_core::prelude::*;
//! ```

pub mod codec;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod schema;
pub mod validate;
pub mod value;

pub use codec::{FieldParseError, NumericFamily, ScalarKind};
pub use error::{Error, NetworkFailure, Result, SyncParseError};
pub use schema::{
    EnumMember, FieldLabel, FieldSchema, FieldType, MessageSchema, MethodCatalog, RpcInfo,
    SchemaRegistry,
};
pub use value::{PathSegment, Value, ValuePath};
