#[macro_use]
extern crate lazy_static;

pub mod date;
mod fields;
mod parser;
mod types;

pub use fields::{FieldId, UnknownFieldError};
pub use parser::*;
pub use types::*;
