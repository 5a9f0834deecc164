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

//! The grammar. Every nonterminal gets its own function, and each one either throws its input
//! away or hands back exactly the piece of the AST that survives (see the [`ast`](crate::ast)
//! module for what that is). The grammar is the 2011 Web IDL draft plus WebKit's extensions:
//! modules, callbacks, enums, union types, scoped names, `caller`/`legacycaller`, and the
//! `getter raises`/`setter raises` clauses.

// NOTE: The parsers in here run over tokens, not text, so reserved words can never be mistaken
//       for identifiers. Only an extended attribute's body (`Other`) accepts them.

// NOTE: When every alternative fails, the error that reached furthest into the input wins. Lists
//       of members and definitions run until they see their closing token instead of stopping at
//       the first item that doesn't parse, so an error inside an item isn't lost. Likewise, a
//       separator in a list commits to another item.

// NOTE: Modules, sequence and union types, and parenthesized groups in extended attributes can
//       nest. Each of those recursions gives up at `MAX_NESTING` levels, reporting the token
//       that would have opened the next level.

use {
    nom::{
        IResult,
        branch::*,
        combinator::*,
        error::{ErrorKind, ParseError},
        multi::*,
        sequence::*,
    },
    tracing::debug,
    crate::{
        ast::*,
        error::SyntaxError,
        lexer::{Keyword, Token, TokenKind},
    },
};

type Tokens<'a> = &'a [Token<'a>];
type PResult<'a, O> = IResult<Tokens<'a>, O, Failure<'a>>;

/// How deeply modules, types, and extended-attribute groups may nest.
pub const MAX_NESTING: usize = 64;

/// Where a parser gave up.
#[derive(Debug)]
struct Failure<'a> {
    input: Tokens<'a>,
}

impl<'a> ParseError<Tokens<'a>> for Failure<'a> {
    fn from_error_kind(input: Tokens<'a>, _kind: ErrorKind) -> Self {
        Self { input }
    }

    fn append(_input: Tokens<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn or(self, other: Self) -> Self {
        if other.input.len() < self.input.len() { other } else { self }
    }
}

impl<'a> Failure<'a> {
    fn into_syntax_error(self, all: Tokens<'a>) -> SyntaxError {
        match self.input.first() {
            Some(token) => SyntaxError {
                line: token.line,
                found: token.kind.to_string(),
            },
            None => SyntaxError {
                line: all.last().map_or(1, |token| token.line),
                found: String::from("end of input"),
            },
        }
    }
}

pub fn parse(tokens: Tokens<'_>) -> Result<Vec<Definition>, SyntaxError> {
    let failure = match all_consuming(definitions)(tokens) {
        Ok((_, defs)) => {
            debug!(definitions = defs.len(), "parsed IDL definitions");
            return Ok(defs);
        },
        Err(nom::Err::Error(f) | nom::Err::Failure(f)) => f,
        Err(nom::Err::Incomplete(_)) => Failure { input: &tokens[tokens.len() .. ] },
    };
    let e = failure.into_syntax_error(tokens);
    debug!(line = e.line, found = %e.found, "IDL syntax error");
    Err(e)
}

// Definitions := (ExtendedAttributeList Definition)*
fn definitions(input: Tokens<'_>) -> PResult<'_, Vec<Definition>> {
    definitions_in(input, 0)
}

fn definitions_in(input: Tokens<'_>, depth: usize) -> PResult<'_, Vec<Definition>> {
    map(
        block_items(preceded(extended_attribute_list, move |i| definition(i, depth))),
        |defs| defs.into_iter().flatten().collect(),
    )(input)
}

// Definition := Module | CallbackOrInterface | PartialInterface | Dictionary | Exception | Enum
//             | Typedef | ImplementsStatement
//
// A module contributes all of its definitions, so this returns a list.
fn definition<'a>(input: Tokens<'a>, depth: usize) -> PResult<'a, Vec<Definition>> {
    alt((
        move |i: Tokens<'a>| module(i, depth),
        map(
            alt((
                callback_or_interface,
                partial_interface,
                dictionary,
                exception,
                enum_,
                typedef,
                implements_statement,
            )),
            |def| vec![def],
        ),
    ))(input)
}

// Module := "module" identifier "{" Definitions "}" ";"?
fn module(input: Tokens<'_>, depth: usize) -> PResult<'_, Vec<Definition>> {
    let (rest, ()) = keyword(Keyword::Module)(input)?;
    let depth = nest(input, depth)?;
    delimited(
        identifier,
        braced(move |i| definitions_in(i, depth)),
        opt(symbol(';')),
    )(rest)
}

// CallbackOrInterface := "callback" CallbackRestOrInterface | Interface
fn callback_or_interface(input: Tokens<'_>) -> PResult<'_, Definition> {
    alt((
        preceded(keyword(Keyword::Callback), callback_rest_or_interface),
        map(interface, |(name, members)| Definition::Interface { name, members }),
    ))(input)
}

// CallbackRestOrInterface := CallbackRest | Interface
fn callback_rest_or_interface(input: Tokens<'_>) -> PResult<'_, Definition> {
    alt((
        map(callback_rest, |name| Definition::Callback { name }),
        map(interface, |(name, members)| Definition::CallbackInterface { name, members }),
    ))(input)
}

// CallbackRest := identifier "=" ReturnType "(" ArgumentList ")" ";"
fn callback_rest(input: Tokens<'_>) -> PResult<'_, String> {
    map(
        terminated(
            identifier,
            tuple((symbol('='), return_type, parenthesized(argument_list), symbol(';'))),
        ),
        str::to_owned,
    )(input)
}

// Interface := "interface" identifier Inheritance "{" InterfaceMembers "}" ";"?
fn interface(input: Tokens<'_>) -> PResult<'_, (String, Vec<Member>)> {
    map(
        delimited(
            keyword(Keyword::Interface),
            pair(terminated(identifier, inheritance), braced(interface_members)),
            opt(symbol(';')),
        ),
        |(name, members)| (name.to_owned(), members),
    )(input)
}

// PartialInterface := "partial" "interface" identifier "{" InterfaceMembers "}" ";"?
fn partial_interface(input: Tokens<'_>) -> PResult<'_, Definition> {
    map(
        delimited(
            pair(keyword(Keyword::Partial), keyword(Keyword::Interface)),
            pair(identifier, braced(interface_members)),
            opt(symbol(';')),
        ),
        |(name, members)| Definition::PartialInterface { name: name.to_owned(), members },
    )(input)
}

// Inheritance := (":" ScopedName ("," ScopedName)*)?
fn inheritance(input: Tokens<'_>) -> PResult<'_, ()> {
    value(
        (),
        opt(preceded(symbol(':'), cut(list1(symbol(','), scoped_name)))),
    )(input)
}

// InterfaceMembers := (ExtendedAttributeList InterfaceMember)*
fn interface_members(input: Tokens<'_>) -> PResult<'_, Vec<Member>> {
    block_items(preceded(extended_attribute_list, interface_member))(input)
}

// InterfaceMember := Const | "stringifier" StringifierRest | Attribute | Operation
fn interface_member(input: Tokens<'_>) -> PResult<'_, Member> {
    alt((
        const_,
        preceded(keyword(Keyword::Stringifier), stringifier_rest),
        attribute,
        operation,
    ))(input)
}

// StringifierRest := Attribute | OperationRest | ";"
fn stringifier_rest(input: Tokens<'_>) -> PResult<'_, Member> {
    alt((
        attribute,
        operation_rest,
        value(Member::Method { name: None }, symbol(';')),
    ))(input)
}

// Dictionary := "dictionary" identifier Inheritance "{" DictionaryMembers "}" ";"
fn dictionary(input: Tokens<'_>) -> PResult<'_, Definition> {
    map(
        delimited(
            keyword(Keyword::Dictionary),
            pair(terminated(identifier, inheritance), braced(dictionary_members)),
            symbol(';'),
        ),
        |(name, members)| Definition::Dictionary { name: name.to_owned(), members },
    )(input)
}

// DictionaryMembers := (ExtendedAttributeList DictionaryMember)*
fn dictionary_members(input: Tokens<'_>) -> PResult<'_, Vec<Member>> {
    block_items(preceded(extended_attribute_list, dictionary_member))(input)
}

// DictionaryMember := Type identifier DefaultValue? ";"
fn dictionary_member(input: Tokens<'_>) -> PResult<'_, Member> {
    map(
        delimited(type_, identifier, pair(opt(default_value), symbol(';'))),
        |name| Member::Attribute { name: name.to_owned() },
    )(input)
}

// Exception := "exception" identifier Inheritance "{" ExceptionMembers "}" ";"
fn exception(input: Tokens<'_>) -> PResult<'_, Definition> {
    map(
        delimited(
            keyword(Keyword::Exception),
            pair(terminated(identifier, inheritance), braced(exception_members)),
            symbol(';'),
        ),
        |(name, members)| Definition::Exception { name: name.to_owned(), members },
    )(input)
}

// ExceptionMembers := (ExtendedAttributeList ExceptionMember)*
fn exception_members(input: Tokens<'_>) -> PResult<'_, Vec<Member>> {
    block_items(preceded(extended_attribute_list, exception_member))(input)
}

// ExceptionMember := Const | ExceptionField
// ExceptionField := AttributeType identifier ";"
fn exception_member(input: Tokens<'_>) -> PResult<'_, Member> {
    alt((
        const_,
        map(
            delimited(attribute_type, identifier, symbol(';')),
            |name| Member::Attribute { name: name.to_owned() },
        ),
    ))(input)
}

// Enum := "enum" identifier "{" EnumValueList "}" ";"
// EnumValueList := string ("," string)* ","?
fn enum_(input: Tokens<'_>) -> PResult<'_, Definition> {
    map(
        delimited(
            keyword(Keyword::Enum),
            pair(
                identifier,
                braced(terminated(separated_list1(symbol(','), string), opt(symbol(',')))),
            ),
            symbol(';'),
        ),
        |(name, values)| Definition::Enum {
            name: name.to_owned(),
            values: values.into_iter().map(str::to_owned).collect(),
        },
    )(input)
}

// Typedef := "typedef" ExtendedAttributeList Type identifier ";"
fn typedef(input: Tokens<'_>) -> PResult<'_, Definition> {
    map(
        delimited(
            pair(keyword(Keyword::Typedef), extended_attribute_list),
            pair(type_, identifier),
            symbol(';'),
        ),
        |(underlying_type, name)| Definition::Typedef { name: name.to_owned(), underlying_type },
    )(input)
}

// ImplementsStatement := ScopedName "implements" ScopedName ";"
fn implements_statement(input: Tokens<'_>) -> PResult<'_, Definition> {
    map(
        terminated(
            separated_pair(scoped_name, keyword(Keyword::Implements), scoped_name),
            symbol(';'),
        ),
        |(subject_name, target_name)| Definition::Implements { subject_name, target_name },
    )(input)
}

// Const := "const" ConstType identifier "=" ConstValue ";"
fn const_(input: Tokens<'_>) -> PResult<'_, Member> {
    map(
        delimited(
            pair(keyword(Keyword::Const), const_type),
            identifier,
            tuple((symbol('='), const_value, symbol(';'))),
        ),
        |name| Member::Const { name: name.to_owned() },
    )(input)
}

// ConstType := (PrimitiveOrStringType | ScopedName) "?"?
fn const_type(input: Tokens<'_>) -> PResult<'_, ()> {
    value(
        (),
        pair(alt((primitive_or_string_type, scoped_name)), opt(symbol('?'))),
    )(input)
}

// ConstValue := "-"? integer | string | "true" | "false" | "null"
fn const_value(input: Tokens<'_>) -> PResult<'_, ()> {
    alt((
        preceded(opt(symbol('-')), integer),
        value((), string),
        next_token(|kind| {
            matches!(kind, TokenKind::Identifier("true" | "false" | "null")).then_some(())
        }),
    ))(input)
}

// DefaultValue := "=" ConstValue
fn default_value(input: Tokens<'_>) -> PResult<'_, ()> {
    preceded(symbol('='), const_value)(input)
}

// Attribute := "readonly"? "attribute" ExtendedAttributeList AttributeType identifier
//              (AttributeRaises ","?)* ";"
fn attribute(input: Tokens<'_>) -> PResult<'_, Member> {
    map(
        delimited(
            tuple((
                opt(keyword(Keyword::Readonly)),
                keyword(Keyword::Attribute),
                extended_attribute_list,
                attribute_type,
            )),
            identifier,
            pair(many0(terminated(attribute_raises, opt(symbol(',')))), symbol(';')),
        ),
        |name| Member::Attribute { name: name.to_owned() },
    )(input)
}

// AttributeRaises := ("getraises" | "setraises" | "raises") ExceptionList
//                  | ("getter" | "setter") "raises" ExceptionList
fn attribute_raises(input: Tokens<'_>) -> PResult<'_, ()> {
    preceded(
        alt((
            keyword(Keyword::Getraises),
            keyword(Keyword::Setraises),
            keyword(Keyword::Raises),
            terminated(
                alt((keyword(Keyword::Getter), keyword(Keyword::Setter))),
                keyword(Keyword::Raises),
            ),
        )),
        exception_list,
    )(input)
}

// Operation := Qualifiers OperationRest
// Qualifiers := "static" | Special*
fn operation(input: Tokens<'_>) -> PResult<'_, Member> {
    preceded(
        alt((keyword(Keyword::Static), value((), many0_count(special)))),
        operation_rest,
    )(input)
}

// Special := "getter" | "setter" | "creator" | "deleter" | "legacycaller" | "caller"
fn special(input: Tokens<'_>) -> PResult<'_, ()> {
    alt((
        keyword(Keyword::Getter),
        keyword(Keyword::Setter),
        keyword(Keyword::Creator),
        keyword(Keyword::Deleter),
        keyword(Keyword::Legacycaller),
        keyword(Keyword::Caller),
    ))(input)
}

// OperationRest := ReturnType identifier? "(" ArgumentList ")" ("raises" ExceptionList)? ";"
fn operation_rest(input: Tokens<'_>) -> PResult<'_, Member> {
    map(
        delimited(
            return_type,
            opt(identifier),
            tuple((
                parenthesized(argument_list),
                opt(preceded(keyword(Keyword::Raises), exception_list)),
                symbol(';'),
            )),
        ),
        |name| Member::Method { name: name.map(str::to_owned) },
    )(input)
}

// ExceptionList := "(" ScopedName ("," ScopedName)* ")"
fn exception_list(input: Tokens<'_>) -> PResult<'_, ()> {
    preceded(
        symbol('('),
        cut(value((), pair(list1(symbol(','), scoped_name), symbol(')')))),
    )(input)
}

// ArgumentList := (Argument ("," Argument)*)?
//
// It's always followed by `)`, so anything else has to start an argument.
fn argument_list(input: Tokens<'_>) -> PResult<'_, ()> {
    match input.first() {
        Some(token) if token.kind == TokenKind::Symbol(')') => Ok((input, ())),
        _ => value((), list1(symbol(','), argument))(input),
    }
}

// Argument := ExtendedAttributeList "in"? "optional"? Type "..."? identifier DefaultValue?
fn argument(input: Tokens<'_>) -> PResult<'_, ()> {
    value(
        (),
        tuple((
            extended_attribute_list,
            opt(keyword(Keyword::In)),
            opt(keyword(Keyword::Optional)),
            type_,
            opt(next_token(|kind| (kind == TokenKind::Ellipsis).then_some(()))),
            identifier,
            opt(default_value),
        )),
    )(input)
}

// -----------------------------------------------
// Types
//
// Each of these returns the canonical text of the type it matched. Only typedefs keep it.
// -----------------------------------------------

// ReturnType := Type | "void"
fn return_type(input: Tokens<'_>) -> PResult<'_, String> {
    alt((type_, word(Keyword::Void)))(input)
}

// Type := SequenceType | AttributeType
fn type_(input: Tokens<'_>) -> PResult<'_, String> {
    type_in(input, 0)
}

fn type_in<'a>(input: Tokens<'a>, depth: usize) -> PResult<'a, String> {
    alt((
        move |i: Tokens<'a>| sequence_type(i, depth),
        move |i: Tokens<'a>| attribute_type_in(i, depth),
    ))(input)
}

// SequenceType := "sequence" "<" Type ">" "?"?
fn sequence_type(input: Tokens<'_>, depth: usize) -> PResult<'_, String> {
    let (rest, ()) = keyword(Keyword::Sequence)(input)?;
    let depth = nest(input, depth)?;
    map(
        pair(delimited(symbol('<'), move |i| type_in(i, depth), symbol('>')), null),
        |(ty, null)| format!("sequence<{ty}>{null}"),
    )(rest)
}

// AttributeType := PrimitiveOrStringType TypeSuffix
//                | ScopedName TypeSuffix
//                | "any" TypeSuffixStartingWithArray
//                | UnionType TypeSuffix
fn attribute_type(input: Tokens<'_>) -> PResult<'_, String> {
    attribute_type_in(input, 0)
}

fn attribute_type_in(input: Tokens<'_>, depth: usize) -> PResult<'_, String> {
    alt((
        concat(primitive_or_string_type, type_suffix),
        concat(scoped_name, type_suffix),
        concat(word(Keyword::Any), type_suffix_starting_with_array),
        concat(move |i| union_type(i, depth), type_suffix),
    ))(input)
}

// UnionType := "(" UnionMemberType ("or" UnionMemberType)+ ")"
fn union_type(input: Tokens<'_>, depth: usize) -> PResult<'_, String> {
    let (rest, ()) = symbol('(')(input)?;
    let depth = nest(input, depth)?;
    map(
        terminated(
            verify(
                list1(keyword(Keyword::Or), move |i| union_member_type(i, depth)),
                |types: &Vec<String>| types.len() > 1,
            ),
            symbol(')'),
        ),
        |types| format!("({})", types.join(" or ")),
    )(rest)
}

// UnionMemberType := SequenceType
//                  | PrimitiveOrStringType TypeSuffix
//                  | ScopedName TypeSuffix
//                  | UnionType TypeSuffix
//                  | "any" "[]" TypeSuffix
fn union_member_type<'a>(input: Tokens<'a>, depth: usize) -> PResult<'a, String> {
    alt((
        move |i: Tokens<'a>| sequence_type(i, depth),
        concat(primitive_or_string_type, type_suffix),
        concat(scoped_name, type_suffix),
        concat(move |i| union_type(i, depth), type_suffix),
        concat(word(Keyword::Any), concat(array, type_suffix)),
    ))(input)
}

// PrimitiveOrStringType := UnsignedIntegerType | "boolean" | "float" | "double" | "DOMString"
fn primitive_or_string_type(input: Tokens<'_>) -> PResult<'_, String> {
    alt((
        unsigned_integer_type,
        word(Keyword::Boolean),
        word(Keyword::Float),
        word(Keyword::Double),
        word(Keyword::DomString),
    ))(input)
}

// UnsignedIntegerType := "unsigned"? IntegerType
fn unsigned_integer_type(input: Tokens<'_>) -> PResult<'_, String> {
    map(
        pair(opt(keyword(Keyword::Unsigned)), integer_type),
        |(unsigned, ty)| match unsigned {
            Some(()) => format!("unsigned {ty}"),
            None => ty,
        },
    )(input)
}

// IntegerType := "short" | "long" "long"?
fn integer_type(input: Tokens<'_>) -> PResult<'_, String> {
    alt((
        word(Keyword::Short),
        map(
            preceded(keyword(Keyword::Long), opt(keyword(Keyword::Long))),
            |longer| String::from(if longer.is_some() { "long long" } else { "long" }),
        ),
    ))(input)
}

// TypeSuffix := "[]" TypeSuffix | "?" TypeSuffixStartingWithArray | ε
//
// That's any run of `[]` and `?` without two `?` in a row. Written as a loop since it can be
// arbitrarily long.
fn type_suffix(mut input: Tokens<'_>) -> PResult<'_, String> {
    let mut suffix = String::new();
    while let Some(token) = input.first() {
        match token.kind {
            TokenKind::Array => suffix.push_str("[]"),
            TokenKind::Symbol('?') if !suffix.ends_with('?') => suffix.push('?'),
            _ => break,
        }
        input = &input[1 .. ];
    }
    Ok((input, suffix))
}

// TypeSuffixStartingWithArray := "[]" TypeSuffix | ε
fn type_suffix_starting_with_array(input: Tokens<'_>) -> PResult<'_, String> {
    map(opt(concat(array, type_suffix)), Option::unwrap_or_default)(input)
}

// Null := "?"?
fn null(input: Tokens<'_>) -> PResult<'_, &'static str> {
    map(opt(symbol('?')), |o| if o.is_some() { "?" } else { "" })(input)
}

fn array(input: Tokens<'_>) -> PResult<'_, String> {
    next_token(|kind| (kind == TokenKind::Array).then(|| String::from("[]")))(input)
}

// ScopedName := "::"? identifier ("::" identifier)*
fn scoped_name(input: Tokens<'_>) -> PResult<'_, String> {
    map(
        pair(opt(scope), list1(scope, identifier)),
        |(absolute, names)| {
            let name = names.join("::");
            match absolute {
                Some(()) => format!("::{name}"),
                None => name,
            }
        },
    )(input)
}

fn scope(input: Tokens<'_>) -> PResult<'_, ()> {
    next_token(|kind| (kind == TokenKind::Scope).then_some(()))(input)
}

// -----------------------------------------------
// Extended attributes
//
// Their contents are never interpreted. All that matters is that the brackets and parentheses
// balance.
// -----------------------------------------------

// ExtendedAttributeList := ("[" ExtendedAttribute ("," ExtendedAttribute)* "]")?
fn extended_attribute_list(input: Tokens<'_>) -> PResult<'_, ()> {
    value(
        (),
        opt(preceded(
            symbol('['),
            cut(pair(list1(symbol(','), extended_attribute), symbol(']'))),
        )),
    )(input)
}

// ExtendedAttribute := ("(" ExtendedAttributeInner ")" | Other)+
fn extended_attribute<'a>(input: Tokens<'a>) -> PResult<'a, ()> {
    value((), many1_count(alt((|i: Tokens<'a>| group(i, 0), other))))(input)
}

// ExtendedAttributeInner := ("(" ExtendedAttributeInner ")" | Other | ",")*
fn extended_attribute_inner<'a>(input: Tokens<'a>, depth: usize) -> PResult<'a, ()> {
    value(
        (),
        many0_count(alt((move |i: Tokens<'a>| group(i, depth), other, symbol(',')))),
    )(input)
}

// In here, a `(` can only open a group.
fn group(input: Tokens<'_>, depth: usize) -> PResult<'_, ()> {
    let (rest, ()) = symbol('(')(input)?;
    let depth = nest(input, depth)?;
    cut(terminated(move |i| extended_attribute_inner(i, depth), symbol(')')))(rest)
}

// Other := any token but ( ) [ ] { } , ;
fn other(input: Tokens<'_>) -> PResult<'_, ()> {
    next_token(|kind| match kind {
        TokenKind::Symbol('(' | ')' | '[' | ']' | '{' | '}' | ',' | ';') => None,
        _ => Some(()),
    })(input)
}

// -----------------------------------------------
// Terminal symbols and helpers
// -----------------------------------------------

fn next_token<'a, O>(
    mut f: impl FnMut(TokenKind<'a>) -> Option<O>,
) -> impl FnMut(Tokens<'a>) -> PResult<'a, O> {
    move |input: Tokens<'a>| match input.split_first() {
        Some((token, rest)) => match f(token.kind) {
            Some(o) => Ok((rest, o)),
            None => Err(nom::Err::Error(Failure::from_error_kind(input, ErrorKind::Tag))),
        },
        None => Err(nom::Err::Error(Failure::from_error_kind(input, ErrorKind::Eof))),
    }
}

fn keyword<'a>(kw: Keyword) -> impl FnMut(Tokens<'a>) -> PResult<'a, ()> {
    next_token(move |kind| (kind == TokenKind::Keyword(kw)).then_some(()))
}

/// A keyword that's part of a type, rendered as itself.
fn word<'a>(kw: Keyword) -> impl FnMut(Tokens<'a>) -> PResult<'a, String> {
    map(keyword(kw), move |()| String::from(kw.as_str()))
}

fn symbol<'a>(c: char) -> impl FnMut(Tokens<'a>) -> PResult<'a, ()> {
    next_token(move |kind| (kind == TokenKind::Symbol(c)).then_some(()))
}

fn identifier(input: Tokens<'_>) -> PResult<'_, &str> {
    next_token(|kind| match kind {
        TokenKind::Identifier(name) => Some(name),
        _ => None,
    })(input)
}

fn string(input: Tokens<'_>) -> PResult<'_, &str> {
    next_token(|kind| match kind {
        TokenKind::String(s) => Some(s),
        _ => None,
    })(input)
}

fn integer(input: Tokens<'_>) -> PResult<'_, ()> {
    next_token(|kind| {
        matches!(kind, TokenKind::HexInteger(_) | TokenKind::DecimalInteger(_)).then_some(())
    })(input)
}

/// Like `separated_list1`, except that a separator commits to another item: if one doesn't follow,
/// the error is final.
fn list1<'a, O, S>(
    mut separator: impl FnMut(Tokens<'a>) -> PResult<'a, S>,
    mut item: impl FnMut(Tokens<'a>) -> PResult<'a, O>,
) -> impl FnMut(Tokens<'a>) -> PResult<'a, Vec<O>> {
    move |input: Tokens<'a>| {
        let (mut input, first) = item(input)?;
        let mut items = vec![first];
        loop {
            let rest = match separator(input) {
                Ok((rest, _)) => rest,
                Err(nom::Err::Error(_)) => return Ok((input, items)),
                Err(e) => return Err(e),
            };
            let (rest, o) = match item(rest) {
                Ok(ok) => ok,
                Err(nom::Err::Error(f)) => return Err(nom::Err::Failure(f)),
                Err(e) => return Err(e),
            };
            items.push(o);
            input = rest;
        }
    }
}

/// Goes one level deeper into a nested construct that starts at `input`, failing right there if
/// that would be more than `MAX_NESTING` levels.
fn nest(input: Tokens<'_>, depth: usize) -> Result<usize, nom::Err<Failure<'_>>> {
    if depth < MAX_NESTING {
        Ok(depth + 1)
    } else {
        Err(nom::Err::Failure(Failure { input }))
    }
}

fn parenthesized<'a, O>(
    inner: impl FnMut(Tokens<'a>) -> PResult<'a, O>,
) -> impl FnMut(Tokens<'a>) -> PResult<'a, O> {
    delimited(symbol('('), inner, symbol(')'))
}

fn braced<'a, O>(
    inner: impl FnMut(Tokens<'a>) -> PResult<'a, O>,
) -> impl FnMut(Tokens<'a>) -> PResult<'a, O> {
    delimited(symbol('{'), inner, symbol('}'))
}

/// Applies `item` until the input runs out or the next token is `}`. Unlike `many0`, any error
/// from `item` is passed along.
fn block_items<'a, O>(
    mut item: impl FnMut(Tokens<'a>) -> PResult<'a, O>,
) -> impl FnMut(Tokens<'a>) -> PResult<'a, Vec<O>> {
    move |mut input: Tokens<'a>| {
        let mut items = Vec::new();
        while let Some(token) = input.first() {
            if token.kind == TokenKind::Symbol('}') {
                break;
            }
            let (rest, o) = item(input)?;
            items.push(o);
            input = rest;
        }
        Ok((input, items))
    }
}

fn concat<'a>(
    first: impl FnMut(Tokens<'a>) -> PResult<'a, String>,
    second: impl FnMut(Tokens<'a>) -> PResult<'a, String>,
) -> impl FnMut(Tokens<'a>) -> PResult<'a, String> {
    map(pair(first, second), |(mut s, rest)| {
        s.push_str(&rest);
        s
    })
}
