pub mod api;
pub mod binder;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod schema;
pub mod tree;
mod serialization;

pub use api::{interpret, interpret_argv, Interpretation};
