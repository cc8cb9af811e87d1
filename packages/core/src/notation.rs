//! Destination notation.
//!
//! A destination is a string with embedded references that are filled in at
//! call time:
//!
//! - `{0}` refers to the first method parameter. Anything after the leading
//!   digits is a label and is ignored, so `{0 name}` is the same reference.
//! - `{basePath()}` calls the zero-argument accessor `basePath` of the router.
//! - `\` escapes the next character, so `\{` is a literal brace.
//!
//! ```rust
//! use interoute_core::{Notation, Segment};
//!
//! let notation = Notation::parse("/user/{0 name}?context={1}").unwrap();
//! assert_eq!(notation.segments()[1], Segment::ParamRef(0));
//! ```

use std::fmt;

/// One piece of a parsed destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Text copied to the destination as is.
    Literal(String),
    /// Positional reference to a method argument.
    ParamRef(usize),
    /// Call to a zero-argument, string-returning accessor of the router.
    MethodCall(String),
}

/// Errors produced while parsing a single segment.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing () in method invocation notation: {fragment}")]
    MissingInvocationParens { fragment: String },

    #[error("cannot parse parameter access, malformed notation: {fragment}")]
    MalformedParameterReference { fragment: String },

    #[error("parameter index does not fit in an index: {fragment}")]
    ParameterIndexOverflow { fragment: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Param,
    Method,
}

/// Parse a destination into independent per-segment results.
///
/// Parsing never fails as a whole: each flushed run of characters yields its
/// own `Result`. Empty runs (e.g. `{}`) yield nothing.
pub fn parse(notation: &str) -> Vec<Result<Segment, ParseError>> {
    let mut parsed = Vec::new();
    let mut buffer = String::new();
    let mut mode = Mode::Plain;
    let mut escaped = false;

    for c in notation.chars() {
        if escaped {
            escaped = false;
            buffer.push(c);
        } else if c == '\\' {
            escaped = true;
        } else if c == '{' {
            flush(&mut buffer, mode, &mut parsed);
            mode = Mode::Param;
        } else if (c == '(' || c == ')') && mode != Mode::Plain {
            mode = Mode::Method;
            buffer.push(c);
        } else if c == '}' && mode != Mode::Plain {
            flush(&mut buffer, mode, &mut parsed);
            mode = Mode::Plain;
        } else {
            buffer.push(c);
        }
    }

    flush(&mut buffer, mode, &mut parsed);
    parsed
}

fn flush(buffer: &mut String, mode: Mode, parsed: &mut Vec<Result<Segment, ParseError>>) {
    if buffer.is_empty() {
        return;
    }

    let fragment = std::mem::take(buffer);
    let segment = match mode {
        Mode::Plain => Ok(Segment::Literal(fragment)),
        Mode::Method => parse_method_call(fragment),
        Mode::Param => parse_param_ref(fragment),
    };
    parsed.push(segment);
}

fn parse_method_call(fragment: String) -> Result<Segment, ParseError> {
    if !fragment.ends_with("()") {
        return Err(ParseError::MissingInvocationParens { fragment });
    }

    let name = match fragment.find('(') {
        Some(open) => fragment[..open].to_string(),
        None => fragment,
    };
    Ok(Segment::MethodCall(name))
}

fn parse_param_ref(fragment: String) -> Result<Segment, ParseError> {
    let digits = fragment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(fragment.len());

    if digits == 0 {
        // `{name}` reads as an accessor call that lost its parens.
        let looks_like_accessor = fragment
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_');

        return Err(if looks_like_accessor {
            ParseError::MissingInvocationParens { fragment }
        } else {
            ParseError::MalformedParameterReference { fragment }
        });
    }

    match fragment[..digits].parse::<usize>() {
        Ok(index) => Ok(Segment::ParamRef(index)),
        Err(_) => Err(ParseError::ParameterIndexOverflow { fragment }),
    }
}

/// A successfully parsed destination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notation {
    segments: Vec<Segment>,
}

impl Notation {
    /// Parse a destination, stopping at the first malformed segment.
    pub fn parse(notation: &str) -> Result<Self, ParseError> {
        let segments = parse(notation).into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Build a notation from already parsed segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter indices referenced by this notation, in order of appearance.
    pub fn param_refs(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::ParamRef(index) => Some(*index),
            _ => None,
        })
    }

    /// Accessor names called by this notation, in order of appearance.
    pub fn method_calls(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::MethodCall(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    for c in text.chars() {
                        if matches!(c, '{' | '}' | '\\') {
                            write!(f, "\\")?;
                        }
                        write!(f, "{}", c)?;
                    }
                }
                Segment::ParamRef(index) => write!(f, "{{{}}}", index)?,
                Segment::MethodCall(name) => write!(f, "{{{}()}}", name)?,
            }
        }
        Ok(())
    }
}
