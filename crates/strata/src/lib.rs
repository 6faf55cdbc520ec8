//! Strata
//!
//! A single-inheritance object model over dynamic [`Value`]s:
//! - **Classes**: a name, at most one base, instance members and static attributes
//! - **Member tables**: instance member lookup delegating up the base chain
//! - **Instances**: own fields, with reads falling through to the class's members
//! - **Queries**: `extends` and `instanceof` over the base chain
//!
//! # Example
//!
//! ```rust,ignore
//! use strata::{create, method, Value};
//!
//! let animal = create("Animal", None)?;
//! animal.define([Value::map([(
//!     "speak",
//!     method("speak", |_, _| Ok(Value::from("..."))),
//! )])])?;
//!
//! let dog = create("Dog", Some(&animal))?;
//! let rex = dog.construct(&[])?;
//! assert!(rex.instanceof(&animal));
//! assert_eq!(rex.call_method("speak", &[])?, Value::from("..."));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod class;
pub mod config;
pub mod error;
pub mod factory;
pub mod instance;
pub mod member_table;
pub mod registry;
pub mod value;

pub use class::{Class, CLASS_CAPABILITIES, CTOR};
pub use config::{FactoryConfig, DEFAULT_STATIC_MARKER};
pub use error::{ObjectError, ObjectResult};
pub use factory::{create, create_value, ClassFactory, FactoryId};
pub use instance::{method, Instance, CLASS_PROPERTY, INSTANCEOF_PROPERTY};
pub use member_table::MemberTable;
pub use registry::ClassRegistry;
pub use value::{MemberMap, NativeFn, NativeFunction, Value};
