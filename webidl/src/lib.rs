/* Copyright (c) 2022-2023 Jeremy Davis (jeremydavis519@gmail.com)
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the "Software"), to deal in the Software without restriction,
 * including without limitation the rights to use, copy, modify, merge, publish, distribute,
 * sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
 * NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 */

//! This crate parses Web IDL fragments into a small AST. It understands the 2011 draft of the
//! standard along with the extensions WebKit's IDL files use: modules, callbacks, enums, union
//! types, `::`-scoped names, `caller`/`legacycaller` operations, and exception-raising clauses on
//! attributes.
//!
//! Everything goes through [`parse`]:
//! ```
//! use webidl::{Definition, Member};
//!
//! let defs = webidl::parse(r#"
//!     module dom {
//!         interface Node {
//!             const unsigned short ELEMENT_NODE = 1;
//!             readonly attribute Node? parentNode;
//!             Node appendChild(in Node newChild) raises(DOMException);
//!         };
//!     };
//! "#).unwrap();
//!
//! assert_eq!(defs, vec![Definition::Interface {
//!     name: String::from("Node"),
//!     members: vec![
//!         Member::Const { name: String::from("ELEMENT_NODE") },
//!         Member::Attribute { name: String::from("parentNode") },
//!         Member::Method { name: Some(String::from("appendChild")) },
//!     ],
//! }]);
//! ```
//!
//! ## What's kept
//! The AST only records what each definition and member *is* and what it's called. Types,
//! extended attributes, default values, argument lists, inheritance, and raises clauses all have
//! to be syntactically valid, but they're dropped once they've been checked. The exceptions are:
//! * an `enum`'s values, in source order;
//! * a `typedef`'s underlying type, rendered as canonical text (e.g. `sequence<unsigned long>?` or
//!   `(DOMString or long)[]`);
//! * both names in an `implements` statement.
//!
//! Modules don't show up in the AST at all. Their definitions are spliced into the surrounding
//! list. Partial interfaces aren't merged with the interfaces they extend.
//!
//! ## Errors
//! Any illegal character makes the whole parse fail with [`Error::Lexical`], which lists every one
//! of them. Otherwise, the first token that doesn't fit the grammar fails it with
//! [`Error::Syntax`]. There is no error recovery, and no partial AST is returned. Callers with
//! several independent fragments should parse them one at a time.
//!
//! Modules, `sequence<...>` and union types, and parenthesized groups inside extended attributes
//! can each nest up to [`MAX_NESTING`] levels deep. The token that would open one more level is
//! reported as a syntax error.
//!
//! ## Reserved words
//! The words listed in [`Keyword`] can't be used as identifiers anywhere except inside an extended
//! attribute, whose contents are never interpreted.

pub mod ast;
pub mod error;
pub mod lexer;
mod parser;

pub use {
    ast::{Definition, Member},
    error::{Error, LexError, SyntaxError},
    lexer::Keyword,
    parser::MAX_NESTING,
};

/// Parses one IDL fragment.
///
/// Each call is independent of every other one, so it's fine to call this from several threads
/// at once.
pub fn parse(source: &str) -> Result<Vec<Definition>, Error> {
    let (tokens, errors) = lexer::lex(source);
    if !errors.is_empty() {
        return Err(Error::Lexical(errors));
    }
    Ok(parser::parse(&tokens)?)
}
