//! # Reinforcer Types
//!
//! The type-representation model behind reinforcer's proxy generator.
//!
//! Discovery hands over resolved [`TypeDescriptor`]s; [`lower`] turns them
//! into [`TypeExpr`] syntax that the generator emits, qualifying package
//! references through an [`Imports`] table. [`Predicates`] recognize the
//! well-known error and context types during signature analysis.
//!
//! ## Example
//!
//! ```rust
//! use reinforcer_types::{lower, TypeDescriptor};
//!
//! let user = TypeDescriptor::named("example.com/app/models", "User");
//! let ty = TypeDescriptor::slice(TypeDescriptor::pointer(user));
//!
//! assert_eq!(lower(&ty, false).unwrap().to_string(), "[]*models.User");
//! ```

pub mod descriptor;
pub mod error;
pub mod expr;
pub mod lower;
pub mod predicate;

pub use descriptor::{
    ChanDir, FieldDescriptor, FuncDescriptor, MethodDescriptor, NamedDescriptor,
    TypeDescriptor, TypeParamDescriptor,
};
pub use error::{LowerError, LowerResult};
pub use expr::{guess_alias, Imports, TypeExpr};
pub use lower::lower;
pub use predicate::{ContextTypePredicate, ErrorTypePredicate, Predicates, TypePredicate};
