//! Best-effort JavaScript syntax check.
//!
//! This is not a parser. It tokenizes just enough (strings, template
//! literals, comments, regular expression literals) to verify that brackets
//! balance and literals terminate, which covers the mistakes that would make
//! a wrapped script fail to load on a host page. Problems are reported as
//! data, never as errors.

use serde::Serialize;

/// Words after which a `/` starts a regular expression rather than a division.
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "case", "do", "else", "in", "of", "new", "delete", "void",
    "throw", "yield", "await",
];

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Result of [`check_syntax`]. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxReport {
    pub valid: bool,
    pub error: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl SyntaxReport {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            line: None,
            column: None,
        }
    }

    fn from_problem(problem: Problem) -> Self {
        Self {
            valid: false,
            error: Some(problem.message),
            line: Some(problem.at.line),
            column: Some(problem.at.column),
        }
    }
}

/// Check `code` for unbalanced brackets and unterminated literals.
pub fn check_syntax(code: &str) -> SyntaxReport {
    match Scanner::new(code).run() {
        Ok(()) => SyntaxReport::ok(),
        Err(problem) => SyntaxReport::from_problem(problem),
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
    line: usize,
    column: usize,
}

#[derive(Debug)]
struct Problem {
    message: String,
    at: Location,
}

impl Problem {
    fn new(message: impl Into<String>, at: Location) -> Self {
        Self {
            message: message.into(),
            at,
        }
    }
}

/// An open construct waiting for its closing token.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Bracket { open: char, at: Location },
    /// `${ ... }` inside a template literal that started at `at`.
    TemplateExpr { at: Location },
}

/// The previous significant token, used to tell regex literals from division.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Last {
    Punct(char),
    Word(String),
    Value,
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    stack: Vec<Frame>,
    last: Option<Last>,
}

impl Scanner {
    fn new(code: &str) -> Self {
        Self {
            chars: code.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            stack: Vec::new(),
            last: None,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }

    fn run(mut self) -> Result<(), Problem> {
        while let Some(c) = self.peek() {
            let at = self.location();
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
                '/' if self.peek_next() == Some('*') => self.skip_block_comment(at)?,
                '/' if self.regex_allowed() => self.scan_regex(at)?,
                '\'' | '"' => self.scan_string(c, at)?,
                '`' => {
                    self.bump();
                    self.scan_template(at)?;
                }
                '(' | '[' | '{' => {
                    self.bump();
                    self.stack.push(Frame::Bracket { open: c, at });
                    self.last = Some(Last::Punct(c));
                }
                ')' | ']' | '}' => {
                    self.bump();
                    self.close(c, at)?;
                }
                '+' | '-' if self.peek_next() == Some(c) => {
                    // Postfix `++`/`--` ends an operand; prefix starts one.
                    let postfix = !self.regex_allowed();
                    self.bump();
                    self.bump();
                    self.last = Some(if postfix { Last::Value } else { Last::Punct(c) });
                }
                c if is_ident_start(c) => self.scan_word(),
                c if c.is_ascii_digit() => self.scan_number(),
                _ => {
                    self.bump();
                    self.last = Some(Last::Punct(c));
                }
            }
        }

        match self.stack.pop() {
            None => Ok(()),
            Some(Frame::Bracket { open, at }) => {
                Err(Problem::new(format!("Unclosed '{open}'"), at))
            }
            Some(Frame::TemplateExpr { at }) => {
                Err(Problem::new("Unterminated template literal", at))
            }
        }
    }

    fn close(&mut self, close: char, at: Location) -> Result<(), Problem> {
        match self.stack.pop() {
            Some(Frame::Bracket { open, at: opened }) => {
                if matching_close(open) == close {
                    self.last = Some(Last::Punct(close));
                    Ok(())
                } else {
                    Err(Problem::new(
                        format!(
                            "Unexpected '{close}': '{open}' opened at line {}, column {} is still open",
                            opened.line, opened.column
                        ),
                        at,
                    ))
                }
            }
            Some(Frame::TemplateExpr { at: template_at }) if close == '}' => {
                self.scan_template(template_at)
            }
            Some(Frame::TemplateExpr { at: template_at }) => Err(Problem::new(
                format!(
                    "Unexpected '{close}' inside template literal started at line {}, column {}",
                    template_at.line, template_at.column
                ),
                at,
            )),
            None => Err(Problem::new(format!("Unexpected '{close}'"), at)),
        }
    }

    fn regex_allowed(&self) -> bool {
        match &self.last {
            None => true,
            Some(Last::Value) => false,
            Some(Last::Punct(c)) => !matches!(c, ')' | ']'),
            Some(Last::Word(word)) => REGEX_PRECEDING_KEYWORDS.contains(&word.as_str()),
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, at: Location) -> Result<(), Problem> {
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                None => return Err(Problem::new("Unterminated comment", at)),
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    fn scan_string(&mut self, quote: char, at: Location) -> Result<(), Problem> {
        self.bump();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(Problem::new("Unterminated string literal", at)),
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }
        self.last = Some(Last::Value);
        Ok(())
    }

    /// Scan template text up to the closing backtick or the next `${`.
    fn scan_template(&mut self, at: Location) -> Result<(), Problem> {
        loop {
            match self.bump() {
                None => return Err(Problem::new("Unterminated template literal", at)),
                Some('\\') => {
                    self.bump();
                }
                Some('`') => {
                    self.last = Some(Last::Value);
                    return Ok(());
                }
                Some('$') if self.peek() == Some('{') => {
                    self.bump();
                    self.stack.push(Frame::TemplateExpr { at });
                    self.last = Some(Last::Punct('{'));
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    fn scan_regex(&mut self, at: Location) -> Result<(), Problem> {
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(Problem::new("Unterminated regular expression literal", at))
                }
                Some('\\') => {
                    self.bump();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        while self.peek().is_some_and(is_ident_part) {
            self.bump();
        }
        self.last = Some(Last::Value);
        Ok(())
    }

    fn scan_word(&mut self) {
        let mut word = String::new();
        while let Some(c) = self.peek().filter(|c| is_ident_part(*c)) {
            word.push(c);
            self.bump();
        }
        self.last = Some(Last::Word(word));
    }

    fn scan_number(&mut self) {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            self.bump();
        }
        self.last = Some(Last::Value);
    }
}

fn matching_close(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
