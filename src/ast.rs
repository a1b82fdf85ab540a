//! # Path Expressions - Abstract Syntax Tree
//!
//! This module defines the compiled form of path expressions and of the
//! filter scripts embedded in them.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[fragment]** - One step of a path (`$`, `.name`, `[0]`, `..`, `[?(...)]`, ...)
//! - **[expr]** - An ordered, immutable list of fragments
//! - **[script]** - Flattened filter predicates evaluated per candidate
//! - **[operators]** - Script operator table (precedence, arity)
//! - **[tokens]** - Lexical tokens of the script sub-language
//!
//! ## Quick Start
//!
//! ```text
//! $.store.book[?(@.price < 10)].title
//! ```
//!
//! This path selects the titles of every book cheaper than 10.
//!
//! ## Core Concepts
//!
//! ### Fragments
//!
//! | Text            | Fragment                 |
//! |-----------------|--------------------------|
//! | `$`             | `Root`                   |
//! | `@`             | `Current`                |
//! | `.name`         | `Child("name")`          |
//! | `['a b']`       | `Child("a b")`           |
//! | `[-1]`          | `Nth(-1)`                |
//! | `*`, `[*]`      | `Wildcard`               |
//! | `..`            | `Descent`                |
//! | `[1:5:2]`       | `Slice`                  |
//! | `[0,'a']`       | `Union`                  |
//! | `[?(@.x > 1)]`  | `Filter(Script)`         |
//!
//! ### Rooting
//!
//! A path starting with `$` is evaluated against the document root, one
//! starting with `@` against the current node. A bare path such as `a.b`
//! behaves like `@.a.b`, which at the top level is the root.
//!
//! ### Filter Scripts
//!
//! Scripts are compiled once into a prefix template and evaluated once
//! per candidate. Operands are literals, the `Nothing` sentinel, regular
//! expressions, or nested paths.
//!
//! ```text
//! [?(@.tags has true && length(@.tags) > 2)]
//! [?(@.name =~ /^a.*/)]
//! [?(@.missing == Nothing)]
//! ```
pub mod expr;
pub mod fragment;
pub mod operators;
pub mod script;
pub mod tokens;

pub use expr::Expr;
pub use fragment::{Fragment, Selector};
pub use operators::Op;
pub use script::{Entry, Operand, Pattern, Script};
pub use tokens::Token;
