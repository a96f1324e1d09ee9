// crates/part-logic/src/dsl.rs
// ============================================================================
// Module: Rule-Logic Parser
// Description: Parser for degree rule-logic expressions.
// Purpose: Turn strings like `Part A and (Part B.1 or Part B.2)` into
//          `Requirement` trees with structural validation.
// Dependencies: crate::requirement, crate::serde_support::RequirementValidator
// ============================================================================

//! ## Overview
//!
//! Rule-logic strings combine part references and course codes with `and`,
//! `or`, commas and parentheses. Keywords are case-insensitive and only match
//! whole words, so identifiers such as `ANDR1000` or `CORE2000` are never
//! split.
//!
//! ### Grammar (informal)
//! - **Identifiers**: `Part A`, `Part B.1.2`, `A.1`, `CSSE2310`
//! - **AND**: `a and b`, `a, b` (a comma list binds like `and`)
//! - **OR**: `a or b`
//! - **Parentheses**: `( ... )` override precedence
//!
//! `and` binds tighter than `or`.
//!
//! ### Example
//!
//! ```
//! use part_logic::Requirement;
//! use part_logic::dsl::parse_requirement;
//!
//! let req = parse_requirement("Part A and (Part B.1 or Part B.2)").unwrap();
//! assert_eq!(
//!     req,
//!     Requirement::and(vec![
//!         Requirement::atomic("Part A"),
//!         Requirement::or(vec![
//!             Requirement::atomic("Part B.1"),
//!             Requirement::atomic("Part B.2"),
//!         ]),
//!     ])
//! );
//! ```

use std::fmt;

use crate::requirement::PART_PREFIX;
use crate::requirement::Requirement;
use crate::serde_support::RequirementValidator;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed rule-logic input size in bytes.
const MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Maximum supported parenthesis nesting depth.
const MAX_NESTING: usize = 32;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Errors that can occur while parsing or validating a rule-logic expression.
///
/// # Invariants
/// - None. Variants capture structured parse and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or contained only whitespace.
    EmptyInput,
    /// Input exceeded the size limit.
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded the nesting limit.
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected token encountered during parsing.
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// `Part` was not followed by a part label.
    MissingPartLabel {
        /// Byte offset of the `Part` keyword.
        position: usize,
    },
    /// Structural validation failed after parsing.
    Validation(String),
    /// Unexpected trailing input after a complete expression.
    TrailingInput {
        /// Byte offset where unexpected input begins.
        position: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input is empty"),
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => {
                write!(f, "input exceeds size limit: {actual_bytes} bytes (max {max_bytes})")
            }
            Self::NestingTooDeep {
                max_depth,
                position,
            } => write!(f, "input nesting exceeds limit of {max_depth} at {position}"),
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => {
                write!(f, "unexpected token `{found}` at {position}, expected {expected}")
            }
            Self::MissingPartLabel {
                position,
            } => write!(f, "`Part` at {position} is missing a part label"),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::TrailingInput {
                position,
            } => {
                write!(f, "unexpected trailing input at {position}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses a rule-logic expression into a validated [`Requirement`] tree.
///
/// # Errors
/// Returns [`ParseError`] for empty or oversized input, syntax errors,
/// trailing input, or post-parse validation failures.
pub fn parse_requirement(input: &str) -> Result<Requirement, ParseError> {
    if input.len() > MAX_INPUT_BYTES {
        return Err(ParseError::InputTooLarge {
            max_bytes: MAX_INPUT_BYTES,
            actual_bytes: input.len(),
        });
    }
    let tokens = Lexer::new(input).lex()?;

    let mut parser = Parser::new(tokens);
    let requirement = parser.parse_expression()?;
    parser.expect_eof()?;

    RequirementValidator::with_defaults()
        .validate(&requirement)
        .map_err(|err| ParseError::Validation(err.to_string()))?;

    Ok(requirement)
}

/// Parses a rule-logic expression, falling back to [`Requirement::Other`].
///
/// The fallback keeps the raw input so one malformed entry never aborts the
/// evaluation of a whole degree.
#[must_use]
pub fn parse_or_other(input: &str) -> Requirement {
    parse_requirement(input).unwrap_or_else(|_| Requirement::other(input))
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer token produced from rule-logic input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// Identifier word (part label, course code, `Part` marker).
    Word(&'a str),
    /// Logical AND keyword.
    And,
    /// Logical OR keyword.
    Or,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
    /// Comma separator.
    Comma,
    /// End-of-input marker.
    Eof,
}

/// Token paired with its byte offset.
#[derive(Debug, Clone, Copy)]
struct SpannedToken<'a> {
    /// Token value.
    token: Token<'a>,
    /// Byte offset into the input.
    position: usize,
}

/// Lexer for rule-logic text.
struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Lexes the input into a sequence of tokens.
    fn lex(&mut self) -> Result<Vec<SpannedToken<'a>>, ParseError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while let Some(&ch) = bytes.get(self.offset) {
            match ch {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.offset += 1;
                }
                b'(' => {
                    tokens.push(self.simple(Token::LParen));
                    self.offset += 1;
                }
                b')' => {
                    tokens.push(self.simple(Token::RParen));
                    self.offset += 1;
                }
                b',' => {
                    tokens.push(self.simple(Token::Comma));
                    self.offset += 1;
                }
                _ if is_word_byte(ch) => {
                    let start = self.offset;
                    self.consume_while(bytes, is_word_byte);
                    let slice = &self.input[start .. self.offset];
                    tokens.push(SpannedToken {
                        token: keyword_or_word(slice),
                        position: start,
                    });
                }
                _ => {
                    let found = self.input[self.offset ..].chars().next().unwrap_or('?');
                    return Err(ParseError::UnexpectedToken {
                        expected: "identifier, keyword, comma, or parenthesis",
                        found: found.to_string(),
                        position: self.offset,
                    });
                }
            }
        }

        if tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        tokens.push(SpannedToken {
            token: Token::Eof,
            position: self.offset,
        });
        Ok(tokens)
    }

    /// Builds a token at the current offset.
    const fn simple(&self, token: Token<'a>) -> SpannedToken<'a> {
        SpannedToken {
            token,
            position: self.offset,
        }
    }

    /// Advances while the condition matches the current byte.
    fn consume_while<F>(&mut self, bytes: &[u8], condition: F)
    where
        F: Fn(u8) -> bool,
    {
        while let Some(&b) = bytes.get(self.offset) {
            if condition(b) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }
}

/// Returns true for bytes that may appear inside an identifier word.
const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

/// Maps a whole word to a keyword token or identifier token.
fn keyword_or_word(slice: &str) -> Token<'_> {
    if slice.eq_ignore_ascii_case("and") {
        Token::And
    } else if slice.eq_ignore_ascii_case("or") {
        Token::Or
    } else {
        Token::Word(slice)
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Recursive-descent parser for rule-logic tokens.
struct Parser<'input> {
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'input>>,
    /// Current token index.
    index: usize,
    /// Current parenthesis nesting depth.
    nesting: usize,
}

impl<'input> Parser<'input> {
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken<'input>>) -> Self {
        Self {
            tokens,
            index: 0,
            nesting: 0,
        }
    }

    /// Parses a full expression.
    fn parse_expression(&mut self) -> Result<Requirement, ParseError> {
        self.parse_or()
    }

    /// Parses OR expressions.
    fn parse_or(&mut self) -> Result<Requirement, ParseError> {
        let mut parts = vec![self.parse_and()?];
        while self.matches(Token::Or) {
            parts.push(self.parse_and()?);
        }
        Ok(Requirement::or(parts))
    }

    /// Parses AND expressions, including comma-joined identifier lists.
    fn parse_and(&mut self) -> Result<Requirement, ParseError> {
        let mut parts = vec![self.parse_primary()?];
        while self.matches(Token::And) || self.matches(Token::Comma) {
            parts.push(self.parse_primary()?);
        }
        Ok(Requirement::and(parts))
    }

    /// Parses an identifier or a parenthesised expression.
    fn parse_primary(&mut self) -> Result<Requirement, ParseError> {
        let SpannedToken {
            token,
            position,
        } = self.current();
        match token {
            Token::Word(word) => {
                self.advance();
                if word.eq_ignore_ascii_case("part") {
                    return self.parse_part_label(position);
                }
                Ok(Requirement::atomic(word))
            }
            Token::LParen => {
                self.advance();
                self.with_nesting(position, |parser| {
                    let expr = parser.parse_expression()?;
                    parser.expect(Token::RParen, "`)`")?;
                    Ok(expr)
                })
            }
            Token::RParen | Token::Comma | Token::And | Token::Or | Token::Eof => {
                Err(ParseError::UnexpectedToken {
                    expected: "identifier or `(`",
                    found: self.describe_current(),
                    position,
                })
            }
        }
    }

    /// Parses the label following a `Part` marker.
    fn parse_part_label(&mut self, marker_position: usize) -> Result<Requirement, ParseError> {
        match self.current().token {
            Token::Word(label) => {
                self.advance();
                Ok(Requirement::atomic(format!("{PART_PREFIX}{label}")))
            }
            _ => Err(ParseError::MissingPartLabel {
                position: marker_position,
            }),
        }
    }

    /// Runs a parser step while enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let next_depth = self.nesting + 1;
        if next_depth > MAX_NESTING {
            return Err(ParseError::NestingTooDeep {
                max_depth: MAX_NESTING,
                position,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Consumes the expected token or returns an error.
    fn expect(&mut self, token: Token<'_>, expected: &'static str) -> Result<(), ParseError> {
        if self.matches(token) {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected,
                found: self.describe_current(),
                position: self.current().position,
            })
        }
    }

    /// Ensures the parser is at end-of-input.
    fn expect_eof(&self) -> Result<(), ParseError> {
        if matches!(self.current().token, Token::Eof) {
            Ok(())
        } else {
            Err(ParseError::TrailingInput {
                position: self.current().position,
            })
        }
    }

    /// Consumes the token if it matches the expected kind.
    fn matches(&mut self, kind: Token<'_>) -> bool {
        if std::mem::discriminant(&self.current().token) == std::mem::discriminant(&kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current token; the lexer guarantees a trailing `Eof`.
    fn current(&self) -> SpannedToken<'input> {
        self.tokens.get(self.index).copied().unwrap_or(SpannedToken {
            token: Token::Eof,
            position: 0,
        })
    }

    /// Advances to the next token.
    const fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Formats the current token for diagnostics.
    fn describe_current(&self) -> String {
        match self.current().token {
            Token::Word(word) => word.to_string(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
