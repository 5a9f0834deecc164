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

//! The errors that can come out of [`parse`](crate::parse).

use {
    std::fmt,
    thiserror::Error,
};

/// A character that can't start any token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: illegal character {ch:?}")]
pub struct LexError {
    pub line: usize,
    pub ch: char,
}

/// The first token that no grammar rule could accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: syntax error at {found}")]
pub struct SyntaxError {
    pub line: usize,
    /// The lexical value of the offending token, or `end of input`.
    pub found: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Every illegal character the lexer ran into, in source order. Never empty.
    #[error("{}", LexErrors(.0))]
    Lexical(Vec<LexError>),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl Error {
    /// The line of the first problem found.
    pub fn line(&self) -> usize {
        match self {
            Self::Lexical(errors) => errors.first().map_or(0, |e| e.line),
            Self::Syntax(e) => e.line,
        }
    }
}

struct LexErrors<'a>(&'a [LexError]);

impl fmt::Display for LexErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_errors_are_joined() {
        let e = Error::Lexical(vec![
            LexError { line: 1, ch: '$' },
            LexError { line: 3, ch: '@' },
        ]);
        assert_eq!(e.to_string(), "line 1: illegal character '$'; line 3: illegal character '@'");
        assert_eq!(e.line(), 1);
    }

    #[test]
    fn syntax_error_display() {
        let e = Error::from(SyntaxError { line: 7, found: String::from(";") });
        assert_eq!(e.to_string(), "line 7: syntax error at ;");
        assert_eq!(e.line(), 7);
    }
}
