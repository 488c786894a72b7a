//! Incremental operator-stream tokenizer.
//!
//! [`OperatorStream`] yields one [`Operator`] at a time together with the
//! operands that preceded it. After the first malformed token the stream
//! yields that error once and then ends, so callers can keep every operator
//! produced before the failure.

use crate::error::BackendError;

/// An operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer number (e.g., `42`, `-7`).
    Integer(i64),
    /// Real number (e.g., `3.14`, `.5`).
    Real(f64),
    /// Name object, stored without the leading `/` and with `#xx` decoded.
    Name(String),
    /// Literal string delimited by parentheses, stored as raw bytes.
    LiteralString(Vec<u8>),
    /// Hexadecimal string, stored as decoded bytes.
    HexString(Vec<u8>),
    /// Array of operands.
    Array(Vec<Operand>),
    Boolean(bool),
    Null,
}

impl Operand {
    /// Numeric value of an integer or real operand.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }
}

/// An operator with its preceding operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Operator keyword (e.g., `"Tf"`, `"rg"`).
    pub name: String,
    pub operands: Vec<Operand>,
}

/// Streaming tokenizer over content-stream bytes.
#[derive(Debug)]
pub struct OperatorStream<'a> {
    input: &'a [u8],
    pos: usize,
    operands: Vec<Operand>,
    done: bool,
}

impl<'a> OperatorStream<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            operands: Vec::new(),
            done: false,
        }
    }

    /// Operands read after the last operator (dangling at end of input).
    pub fn pending_operands(&self) -> &[Operand] {
        &self.operands
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Read one operand, or `Ok(None)` when the next token is a keyword.
    fn read_operand(&mut self) -> Result<Option<Operand>, BackendError> {
        let Some(b) = self.peek() else {
            return Ok(None);
        };
        let operand = match b {
            b'(' => Operand::LiteralString(self.read_literal_string()?),
            b'<' => Operand::HexString(self.read_hex_string()?),
            b'[' => {
                self.pos += 1;
                Operand::Array(self.read_array()?)
            }
            b'/' => Operand::Name(self.read_name()),
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.read_number()?,
            b']' => return Err(BackendError::Parse("unexpected ']' outside array".to_string())),
            b'{' | b'}' | b')' | b'>' => {
                return Err(BackendError::Parse(format!(
                    "unexpected delimiter '{}'",
                    b as char
                )));
            }
            _ => return Ok(None),
        };
        Ok(Some(operand))
    }

    fn read_literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => self.read_escape(&mut out)?,
                _ => out.push(b),
            }
        }
        Err(BackendError::Parse("unterminated literal string".to_string()))
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<(), BackendError> {
        let Some(escaped) = self.peek() else {
            return Err(BackendError::Parse(
                "unterminated escape in literal string".to_string(),
            ));
        };
        self.pos += 1;
        match escaped {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'\r' => {
                // Line continuation, optionally CR LF
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = u32::from(escaped - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xFF) as u8);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn read_hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut digits = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(BackendError::Parse("unterminated hex string".to_string()));
            };
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if !is_whitespace(b) {
                digits.push(hex_digit(b).ok_or_else(|| {
                    BackendError::Parse(format!("invalid hex digit: {:?}", b as char))
                })?);
            }
        }
        if digits.len() % 2 != 0 {
            digits.push(0);
        }
        Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
    }

    fn read_array(&mut self) -> Result<Vec<Operand>, BackendError> {
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => return Err(BackendError::Parse("unterminated array".to_string())),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(elements);
                }
                Some(b) if b.is_ascii_alphabetic() => {
                    let keyword = self.read_keyword();
                    elements.push(keyword_operand(&keyword).unwrap_or(Operand::Name(keyword)));
                }
                Some(b) => match self.read_operand()? {
                    Some(operand) => elements.push(operand),
                    None => {
                        return Err(BackendError::Parse(format!(
                            "unexpected byte in array: 0x{b:02X}"
                        )));
                    }
                },
            }
        }
    }

    fn read_name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' {
                if let Some(&[hi, lo]) = raw.get(i + 1..i + 3) {
                    if let (Some(hi), Some(lo)) = (hex_digit(hi), hex_digit(lo)) {
                        name.push((hi << 4) | lo);
                        i += 3;
                        continue;
                    }
                }
            }
            name.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&name).into_owned()
    }

    fn read_number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut has_dot = false;
        while let Some(b) = self.peek() {
            if b == b'.' && !has_dot {
                has_dot = true;
            } else if !b.is_ascii_digit() {
                break;
            }
            self.pos += 1;
        }
        let token = String::from_utf8_lossy(&self.input[start..self.pos]);
        if has_dot {
            // "5." and "-.5" are valid reals
            let normalized = if token.ends_with('.') {
                format!("{token}0")
            } else {
                token.to_string()
            };
            normalized
                .parse()
                .map(Operand::Real)
                .map_err(|_| BackendError::Parse(format!("invalid real number: {token}")))
        } else {
            token
                .parse()
                .map(Operand::Integer)
                .map_err(|_| BackendError::Parse(format!("invalid integer: {token}")))
        }
    }

    fn read_keyword(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'*' || b == b'\'' || b == b'"')
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn next_operator(&mut self) -> Result<Option<Operator>, BackendError> {
        loop {
            self.skip_whitespace_and_comments();
            let Some(b) = self.peek() else {
                return Ok(None);
            };
            if let Some(operand) = self.read_operand()? {
                self.operands.push(operand);
                continue;
            }
            if !(b.is_ascii_alphabetic() || b == b'*' || b == b'\'' || b == b'"') {
                return Err(BackendError::Parse(format!(
                    "unexpected byte 0x{b:02X} at offset {}",
                    self.pos
                )));
            }
            let keyword = self.read_keyword();
            match keyword_operand(&keyword) {
                Some(operand) => self.operands.push(operand),
                None => {
                    return Ok(Some(Operator {
                        name: keyword,
                        operands: std::mem::take(&mut self.operands),
                    }));
                }
            }
        }
    }
}

impl Iterator for OperatorStream<'_> {
    type Item = Result<Operator, BackendError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_operator() {
            Ok(Some(op)) => Some(Ok(op)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Tokenize the whole input, failing on the first malformed token.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    OperatorStream::new(input).collect()
}

fn keyword_operand(keyword: &str) -> Option<Operand> {
    match keyword {
        "true" => Some(Operand::Boolean(true)),
        "false" => Some(Operand::Boolean(false)),
        "null" => Some(Operand::Null),
        _ => None,
    }
}

/// Returns `true` if `b` is a PDF whitespace character.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

/// Returns `true` if `b` is a PDF delimiter character.
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
