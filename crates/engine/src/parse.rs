//! Call expression parsing
//!
//! Splits `schema.name(arg1, arg2)` into a qualified routine name and raw
//! literal tokens.
//!
//! ## Grammar
//!
//! ```text
//! call      := name '(' interior ')' ignored
//! name      := everything before the first '('
//! interior  := everything between the first '(' and the LAST ')'
//! field     := maximal run of non-',' characters in interior
//! ```
//!
//! Tokenizing the interior:
//! - fields are separated by `,`; zero-length fields are skipped
//! - each field has its leading whitespace removed; trailing whitespace is kept
//! - an interior that is empty or all whitespace yields no tokens
//! - text after the last `)` is ignored
//!
//! Quoting is not understood: a `,` inside `'a,b'` splits the literal.

use proctrace_core::{QualifiedName, Result, TraceError};

/// A parsed call: routine name plus raw literal arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpression {
    /// Routine name as written, normalized
    pub name: QualifiedName,
    /// Raw literal tokens, in positional order
    pub arguments: Vec<String>,
}

impl CallExpression {
    /// Parse a call string
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Parse`] if the opening or closing parenthesis is
    /// missing or the routine name is malformed.
    ///
    /// # Example
    ///
    /// ```
    /// use proctrace_engine::CallExpression;
    ///
    /// let call = CallExpression::parse("f(1, 'a', 2)").unwrap();
    /// assert_eq!(call.name.to_string(), "f");
    /// assert_eq!(call.arguments, vec!["1", "'a'", "2"]);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let open = input.find('(').ok_or_else(|| {
            TraceError::parse(format!("missing opening parenthesis in {:?}", input))
        })?;
        let after_open = &input[open + 1..];
        let close = after_open.rfind(')').ok_or_else(|| {
            TraceError::parse(format!("missing closing parenthesis in {:?}", input))
        })?;

        let name = QualifiedName::parse(&input[..open])?;
        let arguments = ArgumentSplitter::new(&after_open[..close])
            .map(str::to_string)
            .collect();

        Ok(Self { name, arguments })
    }

    /// Number of literal arguments
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
}

/// Iterator over the literal tokens of a call's interior
#[derive(Debug, Clone)]
pub struct ArgumentSplitter<'a> {
    rest: Option<&'a str>,
}

impl<'a> ArgumentSplitter<'a> {
    /// Split the text between a call's parentheses
    pub fn new(interior: &'a str) -> Self {
        let rest = if interior.trim().is_empty() {
            None
        } else {
            Some(interior)
        };
        Self { rest }
    }
}

impl<'a> Iterator for ArgumentSplitter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let rest = self.rest?;
            let (field, remainder) = match rest.find(',') {
                Some(comma) => (&rest[..comma], Some(&rest[comma + 1..])),
                None => (rest, None),
            };
            self.rest = remainder;
            if !field.is_empty() {
                return Some(field.trim_start());
            }
        }
    }
}
