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

//! The lexer. It turns IDL source text into a flat list of tokens, dropping whitespace and
//! comments along the way and remembering which line each token started on.

use {
    std::{fmt, str::FromStr},
    nom::{
        IResult,
        branch::*,
        bytes::complete::*,
        character::complete::*,
        combinator::*,
        error::ErrorKind,
        multi::*,
        sequence::*,
    },
    tracing::{debug, warn},
    crate::error::LexError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// 1-based.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// `...`
    Ellipsis,
    /// `[]`, with nothing in between
    Array,
    /// `::`
    Scope,
    HexInteger(i128),
    DecimalInteger(i128),
    /// The text between the quotes. There are no escape sequences.
    String(&'a str),
    Identifier(&'a str),
    Keyword(Keyword),
    /// One of `( ) , : ; < = > ? [ ] { } & | -`
    Symbol(char),
}

impl fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ellipsis => f.write_str("..."),
            Self::Array => f.write_str("[]"),
            Self::Scope => f.write_str("::"),
            Self::HexInteger(n) => write!(f, "{n:#x}"),
            Self::DecimalInteger(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Identifier(name) => f.write_str(name),
            Self::Keyword(kw) => f.write_str(kw.as_str()),
            Self::Symbol(c) => write!(f, "{c}"),
        }
    }
}

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// The reserved words. An identifier spelled like one of these is always lexed as the
        /// keyword instead.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }

        impl FromStr for Keyword {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)*
                    _ => Err(()),
                }
            }
        }
    };
}

keywords! {
    DomString => "DOMString",
    Any => "any",
    Attribute => "attribute",
    Boolean => "boolean",
    Callback => "callback",
    Caller => "caller",
    Const => "const",
    Creator => "creator",
    Deleter => "deleter",
    Dictionary => "dictionary",
    Double => "double",
    Enum => "enum",
    Exception => "exception",
    Float => "float",
    Getraises => "getraises",
    Getter => "getter",
    Implements => "implements",
    In => "in",
    Interface => "interface",
    Legacycaller => "legacycaller",
    Long => "long",
    Module => "module",
    Optional => "optional",
    Or => "or",
    Partial => "partial",
    Raises => "raises",
    Readonly => "readonly",
    Sequence => "sequence",
    Setraises => "setraises",
    Setter => "setter",
    Short => "short",
    Static => "static",
    Stringifier => "stringifier",
    Typedef => "typedef",
    Unsigned => "unsigned",
    Void => "void",
}

/// Splits `input` into tokens.
///
/// Lexing doesn't stop at the first illegal character. Each one is logged, recorded, and skipped,
/// so the caller gets every diagnostic at once. The token list is only meaningful if there were no
/// errors.
pub fn lex(input: &str) -> (Vec<Token<'_>>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut line = 1;
    let mut rest = input;

    loop {
        if let Ok((after, skipped_lines)) = ws_and_comments(rest) {
            line += skipped_lines;
            rest = after;
        }
        let Some(ch) = rest.chars().next() else { break };

        match token_kind(rest) {
            Ok((after, kind)) => {
                tokens.push(Token { kind, line });
                // String literals can span lines.
                line += count_newlines(&rest[ .. rest.len() - after.len()]);
                rest = after;
            },
            Err(e) => {
                warn!(line, ?ch, "illegal character in IDL source");
                errors.push(LexError { line, ch });
                rest = match e {
                    // An integer literal too large to represent. Skip all of it.
                    nom::Err::Failure(_) => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
                    _ => &rest[ch.len_utf8() .. ],
                };
            }
        };
    }

    debug!(tokens = tokens.len(), errors = errors.len(), "lexed IDL source");
    (tokens, errors)
}

fn token_kind(input: &str) -> IResult<&str, TokenKind<'_>> {
    alt((
        value(TokenKind::Ellipsis, tag("...")),
        value(TokenKind::Array, tag("[]")),
        value(TokenKind::Scope, tag("::")),
        hex_integer,
        decimal_integer,
        map(string, TokenKind::String),
        identifier_or_keyword,
        map(one_of("(),:;<=>?[]{}&|-"), TokenKind::Symbol),
    ))(input)
}

fn hex_integer(input: &str) -> IResult<&str, TokenKind<'_>> {
    let (rest, digits) = preceded(tag_no_case("0x"), hex_digit1)(input)?;
    match i128::from_str_radix(digits, 16) {
        Ok(n) => Ok((rest, TokenKind::HexInteger(n))),
        Err(_) => Err(nom::Err::Failure(nom::error::Error::new(input, ErrorKind::MapRes))),
    }
}

fn decimal_integer(input: &str) -> IResult<&str, TokenKind<'_>> {
    let (rest, digits) = alt((
        recognize(pair(one_of("123456789"), digit0)),
        tag("0"),
    ))(input)?;
    match digits.parse() {
        Ok(n) => Ok((rest, TokenKind::DecimalInteger(n))),
        Err(_) => Err(nom::Err::Failure(nom::error::Error::new(input, ErrorKind::MapRes))),
    }
}

fn string(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"'))(input)
}

fn identifier_or_keyword(input: &str) -> IResult<&str, TokenKind<'_>> {
    map(
        recognize(pair(
            satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
            many0_count(satisfy(|c| c.is_ascii_alphanumeric() || c == '_')),
        )),
        |name| match Keyword::from_str(name) {
            Ok(kw) => TokenKind::Keyword(kw),
            Err(()) => TokenKind::Identifier(name),
        },
    )(input)
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    multispace1(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(tag("//"), take_till(|c| c == '\n'))),
        recognize(delimited(tag("/*"), take_until("*/"), tag("*/"))),
    ))(input)
}

/// Returns the number of newlines skipped.
fn ws_and_comments(input: &str) -> IResult<&str, usize> {
    fold_many0(
        alt((whitespace, comment)),
        || 0,
        |lines, skipped| lines + count_newlines(skipped),
    )(input)
}

fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        let (tokens, errors) = lex(input);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn multi_character_symbols_win() {
        assert_eq!(
            kinds("long... a[] ::b [ ] :"),
            vec![
                TokenKind::Keyword(Keyword::Long),
                TokenKind::Ellipsis,
                TokenKind::Identifier("a"),
                TokenKind::Array,
                TokenKind::Scope,
                TokenKind::Identifier("b"),
                TokenKind::Symbol('['),
                TokenKind::Symbol(']'),
                TokenKind::Symbol(':'),
            ],
        );
    }

    #[test]
    fn integers() {
        assert_eq!(
            kinds("0x1F 0XfF 42 0 0123"),
            vec![
                TokenKind::HexInteger(0x1f),
                TokenKind::HexInteger(0xff),
                TokenKind::DecimalInteger(42),
                TokenKind::DecimalInteger(0),
                TokenKind::DecimalInteger(0),
                TokenKind::DecimalInteger(123),
            ],
        );
    }

    #[test]
    fn strings_have_no_escapes() {
        assert_eq!(
            kinds(r#""red" "" "a\b""#),
            vec![TokenKind::String("red"), TokenKind::String(""), TokenKind::String("a\\b")],
        );
    }

    #[test]
    fn reserved_words_become_keywords() {
        for &kw in Keyword::ALL {
            assert_eq!(kinds(kw.as_str()), vec![TokenKind::Keyword(kw)]);
        }
        assert_eq!(Keyword::ALL.len(), 36);
        assert_eq!(
            kinds("interfaces _interface Interface DOMString"),
            vec![
                TokenKind::Identifier("interfaces"),
                TokenKind::Identifier("_interface"),
                TokenKind::Identifier("Interface"),
                TokenKind::Keyword(Keyword::DomString),
            ],
        );
    }

    #[test]
    fn lines_are_tracked_through_comments_and_strings() {
        let (tokens, errors) = lex("a // one\n/* two\n three\n*/ b\n\"x\ny\" c\r\n\td");
        assert!(errors.is_empty());
        let lines: Vec<_> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 4, 5, 6, 7]);
    }

    #[test]
    fn illegal_characters_are_skipped_and_reported() {
        let (tokens, errors) = lex("a $\nb @ # c");
        assert_eq!(
            errors,
            vec![
                LexError { line: 1, ch: '$' },
                LexError { line: 2, ch: '@' },
                LexError { line: 2, ch: '#' },
            ],
        );
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier("a"), TokenKind::Identifier("b"), TokenKind::Identifier("c")],
        );
    }

    #[test]
    fn lone_dot_and_unterminated_string_are_illegal() {
        let (_, errors) = lex(". \"abc");
        assert_eq!(errors, vec![LexError { line: 1, ch: '.' }, LexError { line: 1, ch: '"' }]);
    }

    #[test]
    fn oversized_integer_is_one_error() {
        let (tokens, errors) = lex("1000000000000000000000000000000000000000000000 x");
        assert_eq!(errors, vec![LexError { line: 1, ch: '1' }]);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Identifier("x"));
    }

    #[test]
    fn display_is_the_lexical_value() {
        assert_eq!(TokenKind::Keyword(Keyword::Interface).to_string(), "interface");
        assert_eq!(TokenKind::HexInteger(255).to_string(), "0xff");
        assert_eq!(TokenKind::String("s").to_string(), "\"s\"");
        assert_eq!(TokenKind::Symbol(';').to_string(), ";");
    }
}
