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

//! The AST produced by the parser. It's deliberately lossy: definitions and members keep their
//! kind and name, and almost nothing else. Types, extended attributes, default values, argument
//! lists, raises clauses, and inheritance are checked by the grammar and then thrown away. The
//! only exceptions are an enum's values, a typedef's underlying type, and the two names in an
//! `implements` statement.

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(tag = "kind", rename_all = "snake_case"))]
pub enum Definition {
    Interface { name: String, members: Vec<Member> },
    /// Not merged with the interface it extends.
    PartialInterface { name: String, members: Vec<Member> },
    Dictionary { name: String, members: Vec<Member> },
    Exception { name: String, members: Vec<Member> },
    Enum { name: String, values: Vec<String> },
    /// `underlying_type` is rendered canonically, e.g. `sequence<unsigned long>?`.
    Typedef { name: String, underlying_type: String },
    /// A callback function. Its signature is checked but not kept.
    Callback { name: String },
    CallbackInterface { name: String, members: Vec<Member> },
    Implements { subject_name: String, target_name: String },
}

impl Definition {
    /// The name this definition introduces. For an `implements` statement, that's the subject.
    pub fn name(&self) -> &str {
        match self {
            Self::Interface { name, .. }
                | Self::PartialInterface { name, .. }
                | Self::Dictionary { name, .. }
                | Self::Exception { name, .. }
                | Self::Enum { name, .. }
                | Self::Typedef { name, .. }
                | Self::Callback { name }
                | Self::CallbackInterface { name, .. } => name,
            Self::Implements { subject_name, .. } => subject_name,
        }
    }

    /// The members of an interface-like definition. Empty for every other kind.
    pub fn members(&self) -> &[Member] {
        match self {
            Self::Interface { members, .. }
                | Self::PartialInterface { members, .. }
                | Self::Dictionary { members, .. }
                | Self::Exception { members, .. }
                | Self::CallbackInterface { members, .. } => members,
            Self::Enum { .. }
                | Self::Typedef { .. }
                | Self::Callback { .. }
                | Self::Implements { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(tag = "kind", rename_all = "snake_case"))]
pub enum Member {
    Const { name: String },
    /// Also used for dictionary members and exception fields.
    Attribute { name: String },
    /// `name` is `None` for special operations that don't give one (e.g. a bare `getter`).
    Method { name: Option<String> },
}

impl Member {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Const { name } | Self::Attribute { name } => Some(name),
            Self::Method { name } => name.as_deref(),
        }
    }
}
