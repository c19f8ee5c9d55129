//! On-demand JavaScript scanner.
//!
//! The parser pulls one token at a time with [`Scanner::scan`]. Tokens whose
//! meaning depends on parser context (`/` vs. a regular expression, `}` vs. a
//! template continuation) are re-scanned on request. Lookahead is done by
//! saving and restoring a [`ScannerSnapshot`].

use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use bitflags::bitflags;

bitflags! {
    /// Per-token facts the parser needs for ASI and error reporting.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TokenFlags: u8 {
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED = 1 << 1;
    }
}

/// Saved scanner state for speculative parsing.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
}

pub struct Scanner {
    text: String,
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}' | '\u{2000}'..='\u{200A}'
    )
}

pub fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_ascii_alphabetic() || (!ch.is_ascii() && ch.is_alphabetic())
}

pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_ascii_digit() || (!ch.is_ascii() && ch.is_alphanumeric())
}

impl Scanner {
    pub fn new(text: String) -> Scanner {
        Scanner {
            text,
            pos: 0,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::empty(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token, after leading trivia.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Start of the current token including leading trivia.
    pub fn token_full_start(&self) -> usize {
        self.full_start
    }

    pub fn token_end(&self) -> usize {
        self.pos
    }

    /// Cooked value of the current token: identifier name, string contents,
    /// numeric text, or raw template/regex text.
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn is_unterminated(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNTERMINATED)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.full_start = snapshot.full_start;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset..)?.chars().next()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_flags = TokenFlags::empty();
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let Some(ch) = self.peek_char() else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            if is_line_break(ch) {
                self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                self.pos += ch.len_utf8();
                continue;
            }
            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                continue;
            }

            self.token = match ch {
                '/' => match self.byte_at(1) {
                    Some(b'/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some(b'*') => {
                        self.skip_block_comment();
                        continue;
                    }
                    Some(b'=') => self.advance_token(2, SyntaxKind::SlashEqualsToken),
                    _ => self.advance_token(1, SyntaxKind::SlashToken),
                },
                '#' => {
                    if self.pos == 0 && self.byte_at(1) == Some(b'!') {
                        self.skip_line_comment();
                        continue;
                    }
                    if self.char_at(1).is_some_and(is_identifier_start) {
                        self.pos += 1;
                        self.scan_identifier_rest();
                        SyntaxKind::PrivateIdentifier
                    } else {
                        self.advance_token(1, SyntaxKind::Unknown)
                    }
                }
                '"' | '\'' => self.scan_string(ch),
                '`' => {
                    self.pos += 1;
                    self.scan_template_span(
                        SyntaxKind::NoSubstitutionTemplateLiteral,
                        SyntaxKind::TemplateHead,
                    )
                }
                '0'..='9' => self.scan_number(),
                '.' => {
                    if self.byte_at(1).is_some_and(|b| b.is_ascii_digit()) {
                        self.scan_number()
                    } else if self.byte_at(1) == Some(b'.') && self.byte_at(2) == Some(b'.') {
                        self.advance_token(3, SyntaxKind::DotDotDotToken)
                    } else {
                        self.advance_token(1, SyntaxKind::DotToken)
                    }
                }
                '{' => self.advance_token(1, SyntaxKind::OpenBraceToken),
                '}' => self.advance_token(1, SyntaxKind::CloseBraceToken),
                '(' => self.advance_token(1, SyntaxKind::OpenParenToken),
                ')' => self.advance_token(1, SyntaxKind::CloseParenToken),
                '[' => self.advance_token(1, SyntaxKind::OpenBracketToken),
                ']' => self.advance_token(1, SyntaxKind::CloseBracketToken),
                ';' => self.advance_token(1, SyntaxKind::SemicolonToken),
                ',' => self.advance_token(1, SyntaxKind::CommaToken),
                ':' => self.advance_token(1, SyntaxKind::ColonToken),
                '~' => self.advance_token(1, SyntaxKind::TildeToken),
                '?' => self.scan_question(),
                '<' => self.scan_operator(&[
                    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
                    ("<<", SyntaxKind::LessThanLessThanToken),
                    ("<=", SyntaxKind::LessThanEqualsToken),
                    ("<", SyntaxKind::LessThanToken),
                ]),
                '>' => self.scan_operator(&[
                    (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
                    (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
                    (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
                    (">>", SyntaxKind::GreaterThanGreaterThanToken),
                    (">=", SyntaxKind::GreaterThanEqualsToken),
                    (">", SyntaxKind::GreaterThanToken),
                ]),
                '=' => self.scan_operator(&[
                    ("===", SyntaxKind::EqualsEqualsEqualsToken),
                    ("==", SyntaxKind::EqualsEqualsToken),
                    ("=>", SyntaxKind::EqualsGreaterThanToken),
                    ("=", SyntaxKind::EqualsToken),
                ]),
                '!' => self.scan_operator(&[
                    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
                    ("!=", SyntaxKind::ExclamationEqualsToken),
                    ("!", SyntaxKind::ExclamationToken),
                ]),
                '+' => self.scan_operator(&[
                    ("++", SyntaxKind::PlusPlusToken),
                    ("+=", SyntaxKind::PlusEqualsToken),
                    ("+", SyntaxKind::PlusToken),
                ]),
                '-' => self.scan_operator(&[
                    ("--", SyntaxKind::MinusMinusToken),
                    ("-=", SyntaxKind::MinusEqualsToken),
                    ("-", SyntaxKind::MinusToken),
                ]),
                '*' => self.scan_operator(&[
                    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
                    ("**", SyntaxKind::AsteriskAsteriskToken),
                    ("*=", SyntaxKind::AsteriskEqualsToken),
                    ("*", SyntaxKind::AsteriskToken),
                ]),
                '%' => self.scan_operator(&[
                    ("%=", SyntaxKind::PercentEqualsToken),
                    ("%", SyntaxKind::PercentToken),
                ]),
                '&' => self.scan_operator(&[
                    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
                    ("&&", SyntaxKind::AmpersandAmpersandToken),
                    ("&=", SyntaxKind::AmpersandEqualsToken),
                    ("&", SyntaxKind::AmpersandToken),
                ]),
                '|' => self.scan_operator(&[
                    ("||=", SyntaxKind::BarBarEqualsToken),
                    ("||", SyntaxKind::BarBarToken),
                    ("|=", SyntaxKind::BarEqualsToken),
                    ("|", SyntaxKind::BarToken),
                ]),
                '^' => self.scan_operator(&[
                    ("^=", SyntaxKind::CaretEqualsToken),
                    ("^", SyntaxKind::CaretToken),
                ]),
                c if is_identifier_start(c) => {
                    self.scan_identifier_rest();
                    text_to_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
                }
                c => self.advance_token(c.len_utf8(), SyntaxKind::Unknown),
            };
            return self.token;
        }
    }

    fn advance_token(&mut self, len: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += len;
        kind
    }

    /// Longest-match operator scan; `candidates` are ordered longest first.
    fn scan_operator(&mut self, candidates: &[(&str, SyntaxKind)]) -> SyntaxKind {
        let rest = &self.text[self.pos..];
        for (text, kind) in candidates {
            if rest.starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }
        self.advance_token(1, SyntaxKind::Unknown)
    }

    fn scan_question(&mut self) -> SyntaxKind {
        match self.byte_at(1) {
            Some(b'?') if self.byte_at(2) == Some(b'=') => {
                self.advance_token(3, SyntaxKind::QuestionQuestionEqualsToken)
            }
            Some(b'?') => self.advance_token(2, SyntaxKind::QuestionQuestionToken),
            // `a?.5:b` is a conditional, not optional chaining
            Some(b'.') if !self.byte_at(2).is_some_and(|b| b.is_ascii_digit()) => {
                self.advance_token(2, SyntaxKind::QuestionDotToken)
            }
            _ => self.advance_token(1, SyntaxKind::QuestionToken),
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if is_line_break(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while let Some(ch) = self.peek_char() {
            if ch == '*' && self.byte_at(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
            }
            self.pos += ch.len_utf8();
        }
        self.token_flags |= TokenFlags::UNTERMINATED;
    }

    fn scan_identifier_rest(&mut self) {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.token_value = self.text[start..self.pos].to_string();
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let radix_prefix = self.byte_at(0) == Some(b'0')
            && matches!(
                self.byte_at(1),
                Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
            );
        if radix_prefix {
            self.pos += 2;
            while self
                .byte_at(0)
                .is_some_and(|b| b.is_ascii_hexdigit() || b == b'_')
            {
                self.pos += 1;
            }
        } else {
            self.skip_digits();
            if self.byte_at(0) == Some(b'.') {
                self.pos += 1;
                self.skip_digits();
            }
            if matches!(self.byte_at(0), Some(b'e' | b'E')) {
                let sign = usize::from(matches!(self.byte_at(1), Some(b'+' | b'-')));
                if self.byte_at(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1 + sign;
                    self.skip_digits();
                }
            }
        }
        // BigInt suffix
        if self.byte_at(0) == Some(b'n') {
            self.pos += 1;
        }
        self.token_value = self.text[start..self.pos].replace('_', "");
        SyntaxKind::NumericLiteral
    }

    fn skip_digits(&mut self) {
        while self
            .byte_at(0)
            .is_some_and(|b| b.is_ascii_digit() || b == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.peek_char() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\n' || ch == '\r' {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape(&mut value);
                continue;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_escape(&mut self, value: &mut String) {
        let Some(ch) = self.peek_char() else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000C}'),
            'v' => value.push('\u{000B}'),
            '0' if !self.byte_at(0).is_some_and(|b| b.is_ascii_digit()) => value.push('\0'),
            'x' => self.scan_hex_escape(2, value),
            'u' => {
                if self.byte_at(0) == Some(b'{') {
                    let close = self.text[self.pos..].find('}');
                    if let Some(close) = close {
                        let digits = &self.text[self.pos + 1..self.pos + close];
                        if let Some(c) = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
                            value.push(c);
                        }
                        self.pos += close + 1;
                    }
                } else {
                    self.scan_hex_escape(4, value);
                }
            }
            // Line continuation
            '\r' => {
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => value.push(other),
        }
    }

    fn scan_hex_escape(&mut self, count: usize, value: &mut String) {
        let end = (self.pos + count).min(self.text.len());
        let digits = self.text.get(self.pos..end).unwrap_or("");
        if digits.len() == count
            && let Some(c) = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
        {
            value.push(c);
            self.pos = end;
        }
    }

    /// Scan template characters after a '`' or '}' up to the closing '`'
    /// (`closed`) or the next `${` (`open`).
    fn scan_template_span(&mut self, closed: SyntaxKind, open: SyntaxKind) -> SyntaxKind {
        let start = self.pos;
        loop {
            let Some(ch) = self.peek_char() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.token_value = self.text[start..self.pos].to_string();
                return closed;
            };
            if ch == '`' {
                self.token_value = self.text[start..self.pos].to_string();
                self.pos += 1;
                return closed;
            }
            if ch == '$' && self.byte_at(1) == Some(b'{') {
                self.token_value = self.text[start..self.pos].to_string();
                self.pos += 2;
                return open;
            }
            if ch == '\\' {
                self.pos += 1;
                if let Some(escaped) = self.peek_char() {
                    self.pos += escaped.len_utf8();
                }
                continue;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// Re-scan the current `}` as the continuation of a template literal.
    pub fn re_scan_template_token(&mut self) -> SyntaxKind {
        self.pos = self.token_start + 1;
        self.token = self.scan_template_span(SyntaxKind::TemplateTail, SyntaxKind::TemplateMiddle);
        self.token
    }

    /// Re-scan the current `/` or `/=` as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::SlashToken && self.token != SyntaxKind::SlashEqualsToken {
            return self.token;
        }
        self.pos = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(ch) = self.peek_char() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            };
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            }
            self.pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(escaped) = self.peek_char()
                        && !is_line_break(escaped)
                    {
                        self.pos += escaped.len_utf8();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    while let Some(flag) = self.peek_char().filter(|c| is_identifier_part(*c)) {
                        self.pos += flag.len_utf8();
                    }
                    break;
                }
                _ => {}
            }
        }
        self.token_value = self.text[self.token_start..self.pos].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }
}
