// Dweve AConf - Apache-style Configuration Language
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Character-driven scanner for Apache-style configuration text.
//!
//! The scanner is mode-sensitive: heredocs, C-style comments and line
//! continuations each consume input across physical lines while emitting a
//! single token. Line endings are normalized to `\n` up front; line numbers
//! are 1-based.

use crate::ast::split_separator;
use crate::error::{AconfError, AconfResult};
use crate::lex::strings::has_closing_quote;
use crate::lex::tokens::{Token, TokenKind};
use crate::options::Options;

/// Tokenize configuration text into a token vector ending in `Eof`.
pub fn tokenize(text: &str, options: &Options) -> AconfResult<Vec<Token>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    Lexer::new(&normalized, options).run()
}

enum ScannedValue {
    /// Raw separator-plus-value text of one logical line.
    Raw(String),
    /// Body of a heredoc.
    Heredoc(String),
}

struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    options: &'a Options,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(text: &str, options: &'a Options) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            options,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn push_token(&mut self, kind: TokenKind, lexeme: impl Into<String>, line: usize) {
        self.tokens.push(Token::new(kind, lexeme, line));
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.bump();
        }
    }

    fn run(mut self) -> AconfResult<Vec<Token>> {
        while self.pos < self.chars.len() {
            self.skip_blanks();
            let Some(c) = self.peek() else { break };
            match c {
                '\n' => {
                    let line = self.line;
                    self.bump();
                    self.push_token(TokenKind::Newline, "\n", line);
                    self.line += 1;
                }
                '#' => self.hash_comment(),
                '/' if self.options.c_comments && self.peek_at(1) == Some('*') => {
                    self.c_comment()?;
                }
                '<' => self.tag_or_include()?,
                '\\' if self.rest_of_line_blank(1) => {
                    // A line holding only a backslash continues nothing.
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => self.option_line()?,
            }
        }
        let line = self.line;
        self.push_token(TokenKind::Eof, "", line);
        Ok(self.tokens)
    }

    fn rest_of_line_blank(&self, offset: usize) -> bool {
        self.chars[self.pos + offset..]
            .iter()
            .take_while(|&&c| c != '\n')
            .all(|c| c.is_whitespace())
    }

    fn hash_comment(&mut self) {
        let line = self.line;
        self.bump();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        self.push_token(TokenKind::HashComment, text, line);
    }

    fn c_comment(&mut self) -> AconfResult<()> {
        let start_line = self.line;
        self.bump();
        self.bump();
        let mut depth = 1usize;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '/' && self.peek_at(1) == Some('*') {
                depth += 1;
                text.push_str("/*");
                self.bump();
                self.bump();
                continue;
            }
            if c == '*' && self.peek_at(1) == Some('/') {
                self.bump();
                self.bump();
                depth -= 1;
                if depth == 0 {
                    self.push_token(TokenKind::CComment, text, start_line);
                    return Ok(());
                }
                text.push_str("*/");
                continue;
            }
            if c == '\n' {
                self.line += 1;
            }
            text.push(c);
            self.bump();
        }
        Err(AconfError::lex("unterminated C-style comment", start_line))
    }

    fn tag_or_include(&mut self) -> AconfResult<()> {
        let line = self.line;
        match self.peek_at(1) {
            Some('<') => self.native_include(line),
            Some('/') => self.close_tag(line),
            _ => self.open_tag(line),
        }
    }

    fn native_include(&mut self, line: usize) -> AconfResult<()> {
        let rest: Vec<char> = self.chars[self.pos..]
            .iter()
            .take_while(|&&c| c != '\n')
            .copied()
            .collect();
        let mut end = None;
        let mut i = 2;
        while i + 1 < rest.len() {
            if rest[i] == '>' && rest[i + 1] == '>' {
                end = Some(i);
                break;
            }
            i += 1;
        }
        let end = end
            .ok_or_else(|| AconfError::lex("mismatched tag brackets in include directive", line))?;
        let inner: String = rest[2..end].iter().collect();
        let mut parts = inner.trim().splitn(2, char::is_whitespace);
        let word = parts.next().unwrap_or("");
        let path = parts.next().unwrap_or("").trim();
        if !word.eq_ignore_ascii_case("include") || path.is_empty() {
            return Err(AconfError::lex(
                format!("unrecognized directive \"<<{}>>\"", inner.trim()),
                line,
            ));
        }
        self.pos += end + 2;
        self.push_token(TokenKind::Include, path, line);
        Ok(())
    }

    fn close_tag(&mut self, line: usize) -> AconfResult<()> {
        self.bump();
        self.bump();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
            if c == '>' {
                let name = text.trim().to_string();
                if name.is_empty() {
                    return Err(AconfError::lex("empty block tag not allowed", line));
                }
                self.push_token(TokenKind::CloseTag, name, line);
                return Ok(());
            }
            text.push(c);
        }
        Err(AconfError::lex("mismatched tag brackets in closing tag", line))
    }

    fn open_tag(&mut self, line: usize) -> AconfResult<()> {
        let rest: Vec<char> = self.chars[self.pos..]
            .iter()
            .take_while(|&&c| c != '\n')
            .copied()
            .collect();

        // A comment cuts the tag region; quotes protect '#' inside payloads.
        let mut cut = rest.len();
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (i, &c) in rest.iter().enumerate() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '"' | '\'' => match quote {
                    Some(q) if q == c => quote = None,
                    None => quote = Some(c),
                    Some(_) => {}
                },
                '#' if quote.is_none() => {
                    cut = i;
                    break;
                }
                _ => {}
            }
        }

        let gt = rest[..cut]
            .iter()
            .rposition(|&c| c == '>')
            .ok_or_else(|| AconfError::lex("mismatched tag brackets in block tag", line))?;
        let payload: String = rest[1..gt].iter().collect();
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(AconfError::lex("empty block tag not allowed", line));
        }

        self.pos += gt + 1;

        // Self-closing only when the '/' is preceded by whitespace;
        // otherwise the slash belongs to the tag name.
        if let Some(before) = payload.strip_suffix('/') {
            if before.ends_with([' ', '\t']) {
                self.push_token(TokenKind::OpenCloseTag, before.trim_end(), line);
                return Ok(());
            }
        }
        self.push_token(TokenKind::OpenTag, payload, line);
        Ok(())
    }

    fn option_line(&mut self) -> AconfResult<()> {
        let line = self.line;
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if matches!(c, '\n' | '#' | '=' | ':' | ' ' | '\t') {
                break;
            }
            name.push(c);
            self.bump();
        }
        if name.is_empty() {
            return Err(AconfError::lex(
                format!("illegal character '{}'", self.peek().unwrap_or(' ')),
                line,
            ));
        }

        let include_kind = if name.eq_ignore_ascii_case("include") {
            if self.options.use_apache_include {
                Some(TokenKind::ApacheInclude)
            } else {
                Some(TokenKind::Include)
            }
        } else if name.eq_ignore_ascii_case("includeoptional") && self.options.use_apache_include {
            Some(TokenKind::ApacheIncludeOptional)
        } else {
            None
        };

        match self.scan_value(line, include_kind.is_none())? {
            ScannedValue::Heredoc(body) => {
                self.push_token(TokenKind::OptionName, name, line);
                self.push_token(TokenKind::HeredocBody, body, line);
            }
            ScannedValue::Raw(raw) => {
                if let Some(kind) = include_kind {
                    let (_, value) = split_separator(&raw);
                    let path = value.trim();
                    if !path.is_empty() {
                        self.push_token(kind, path, line);
                        return Ok(());
                    }
                    // A bare "include" with no path stays an ordinary option.
                }

                let (_, value) = split_separator(&raw);
                if value.starts_with(['"', '\'']) && !has_closing_quote(value.trim_end()) {
                    return Err(AconfError::lex("unterminated quoted string", line));
                }

                self.push_token(TokenKind::OptionName, name, line);
                if !raw.trim().is_empty() {
                    self.push_token(TokenKind::OptionValue, raw, line);
                }
            }
        }
        Ok(())
    }

    /// Collect until end-of-line or an unescaped `#`, consuming the input
    /// but leaving the terminator in place.
    fn scan_rest_of_line_value(&mut self) -> String {
        let mut out = String::new();
        let mut escaped = false;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            if c == '#' && !escaped {
                break;
            }
            escaped = c == '\\' && !escaped;
            out.push(c);
            self.bump();
        }
        out
    }

    fn scan_value(&mut self, start_line: usize, allow_heredoc: bool) -> AconfResult<ScannedValue> {
        let raw = self.scan_rest_of_line_value();

        if allow_heredoc {
            let (_, value) = split_separator(&raw);
            if let Some(rest) = value.strip_prefix("<<") {
                let anchor = rest.trim().to_string();
                if !anchor.is_empty() {
                    return self
                        .scan_heredoc(&anchor, start_line)
                        .map(ScannedValue::Heredoc);
                }
            }
        }

        // Trailing backslash joins the next line; fragments are trimmed at
        // the join and connected with a single space. An empty line ends
        // the continuation.
        let mut joined = raw;
        while joined.ends_with('\\') {
            joined.pop();
            let trimmed_len = joined.trim_end().len();
            joined.truncate(trimmed_len);
            if self.peek() != Some('\n') {
                break;
            }
            self.bump();
            self.line += 1;
            let frag = self.scan_rest_of_line_value();
            let frag = frag.trim();
            if frag.is_empty() {
                break;
            }
            joined.push(' ');
            joined.push_str(frag);
        }
        Ok(ScannedValue::Raw(joined))
    }

    fn scan_heredoc(&mut self, anchor: &str, start_line: usize) -> AconfResult<String> {
        // Discard anything left on the introducing line.
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        if self.peek().is_none() {
            return Err(AconfError::lex("unterminated heredoc", start_line));
        }
        self.bump();
        self.line += 1;

        let mut body = String::new();
        loop {
            let mut text = String::new();
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                text.push(c);
                self.bump();
            }
            // Indentation before the closing anchor is tolerated.
            if text.trim() == anchor {
                return Ok(body);
            }
            body.push_str(&text);
            body.push('\n');
            match self.peek() {
                Some('\n') => {
                    self.bump();
                    self.line += 1;
                }
                _ => return Err(AconfError::lex("unterminated heredoc", start_line)),
            }
        }
    }
}
