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

//! Changing a type never changes the AST, except where a typedef keeps it.

use {
    proptest::prelude::*,
    webidl::{Definition, parse},
};

fn suffix() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("?"), Just("[]"), Just("[]?"), Just("?[]"), Just("[][]?")]
}

fn named_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::from("long")),
        Just(String::from("unsigned long long")),
        Just(String::from("short")),
        Just(String::from("boolean")),
        Just(String::from("double")),
        Just(String::from("DOMString")),
        Just(String::from("::dom::Node")),
        "[A-Z][A-Za-z0-9_]{0,8}",
    ]
}

/// Types that can appear anywhere, written the way they're rendered.
fn any_type() -> impl Strategy<Value = String> {
    let leaf = (named_type(), suffix()).prop_map(|(ty, suffix)| ty + suffix);
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (inner.clone(), any::<bool>())
                .prop_map(|(ty, nullable)| format!("sequence<{ty}>{}", if nullable { "?" } else { "" })),
            (prop::collection::vec(inner, 2 .. 4), suffix())
                .prop_map(|(members, suffix)| format!("({}){suffix}", members.join(" or "))),
        ]
    })
}

/// Types that can be used for attributes and exception fields, which can't be bare sequences.
fn attribute_type() -> impl Strategy<Value = String> {
    any_type().prop_filter("no top-level sequence", |ty| !ty.starts_with("sequence<"))
}

fn interface_members(ty: &str) -> Vec<Definition> {
    parse(&format!(
        "interface I {{ void f(in {ty} a, optional {ty}... b); {ty} g(); }};
         dictionary D {{ {ty} m; }};"
    )).unwrap()
}

fn attribute_members(ty: &str) -> Vec<Definition> {
    parse(&format!(
        "interface I {{ readonly attribute {ty} a; attribute [X] {ty} b setraises(E); }};
         exception E {{ {ty} code; }};"
    )).unwrap()
}

proptest! {
    #[test]
    fn argument_and_return_types_are_discarded(ty in any_type()) {
        prop_assert_eq!(interface_members(&ty), interface_members("long"));
    }

    #[test]
    fn attribute_types_are_discarded(ty in attribute_type()) {
        prop_assert_eq!(attribute_members(&ty), attribute_members("long"));
    }

    #[test]
    fn typedefs_keep_the_canonical_type(ty in any_type()) {
        let defs = parse(&format!("typedef {ty} T;")).unwrap();
        prop_assert_eq!(defs, vec![Definition::Typedef {
            name: String::from("T"),
            underlying_type: ty,
        }]);
    }
}
