//! Path expressions for reading and editing JSON-like trees.
//!
//! A path such as `$.store.book[?(@.price < 10)].title` is compiled once
//! with [`parse`] and can then be evaluated against any number of
//! [`Value`] trees:
//!
//! ```
//! use jpath::{convert, parse};
//!
//! let mut data = convert::parse_json(r#"{"store": {"book": [
//!     {"title": "A", "price": 8},
//!     {"title": "B", "price": 12}
//! ]}}"#).unwrap();
//!
//! let cheap = parse("$.store.book[?(@.price < 10)].title").unwrap();
//! assert_eq!(cheap.get(&data).len(), 1);
//!
//! parse("$.store.book[1].price").unwrap().set(&mut data, 9).unwrap();
//! assert_eq!(cheap.get(&data).len(), 2);
//! ```
pub mod ast;
pub mod cli;
pub mod convert;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod query;
pub mod transform;
pub mod value;

pub use ast::{Expr, Fragment, Script, Selector};
pub use error::{ConvertError, Operation, ParseError, PathError};
pub use lexer::Lexer;
pub use parser::{Parser, must_parse, must_parse_script, parse, parse_script};
pub use transform::PathSegment;
pub use value::Value;
