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

//! Parser assembling the token stream into an AST.
//!
//! Grammar:
//!
//! ```text
//! config     := (statement NEWLINE*)*
//! statement  := option | block | self_block | comment | include
//! block      := OPEN_TAG config CLOSE_TAG    ; tags match case-insensitively
//! self_block := OPEN_CLOSE_TAG
//! option     := OPTION_NAME (OPTION_VALUE | HEREDOC_BODY | ε)
//! include    := INCLUDE | APACHE_INCLUDE | APACHE_INCLUDE_OPTIONAL
//! ```
//!
//! Includes are not opened here; the loader resolves them, so no I/O error
//! can surface at parse time. Comments become their own statements, which
//! keeps a comment between duplicate keys from disturbing list collection.

use crate::ast::{
    split_separator, CommentStyle, Config, OptionValue, QuoteStyle, Separator, Statement,
};
use crate::error::{AconfError, AconfResult};
use crate::lex::strings::{quote_char, split_respecting_quotes};
use crate::lex::tokens::{Token, TokenKind};
use crate::options::Options;

/// Parse a token stream into a [`Config`].
pub fn parse(tokens: &[Token], options: &Options) -> AconfResult<Config> {
    if tokens.is_empty() {
        return Ok(Config::default());
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        options,
    };
    let children = parser.parse_statements(None)?;
    Ok(Config { children })
}

/// Context of the innermost open block while its children parse.
struct OpenBlock {
    /// Full payload as written, quotes included.
    payload: String,
    /// Tag part after named-block splitting and unquoting.
    tag: String,
    line: usize,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    options: &'a Options,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &'a Token {
        // The lexer always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> &'a Token {
        let token = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn parse_statements(&mut self, open: Option<&OpenBlock>) -> AconfResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Newline => {
                    self.bump();
                }
                TokenKind::Eof => {
                    if let Some(open) = open {
                        return Err(AconfError::parse(
                            format!(
                                "expected closing tag </{}>, found end of input",
                                open.tag
                            ),
                            open.line,
                        ));
                    }
                    return Ok(statements);
                }
                TokenKind::OptionName => statements.push(self.parse_option()?),
                TokenKind::HashComment => {
                    let token = self.bump();
                    statements.push(Statement::Comment {
                        text: token.lexeme.clone(),
                        style: CommentStyle::Hash,
                        line: token.line,
                    });
                }
                TokenKind::CComment => {
                    let token = self.bump();
                    statements.push(Statement::Comment {
                        text: token.lexeme.clone(),
                        style: CommentStyle::C,
                        line: token.line,
                    });
                }
                TokenKind::Include
                | TokenKind::ApacheInclude
                | TokenKind::ApacheIncludeOptional => {
                    let token = self.bump();
                    statements.push(Statement::Include {
                        path: token.lexeme.clone(),
                        apache: token.kind != TokenKind::Include,
                        optional: token.kind == TokenKind::ApacheIncludeOptional,
                        line: token.line,
                    });
                }
                TokenKind::OpenTag => statements.push(self.parse_block()?),
                TokenKind::OpenCloseTag => {
                    let token = self.bump();
                    let (tag, name, quoted) = self.split_tag(&token.lexeme, token.line)?;
                    statements.push(Statement::Block {
                        tag,
                        name,
                        quoted,
                        children: Vec::new(),
                        line: token.line,
                    });
                }
                TokenKind::CloseTag => match open {
                    Some(ctx) => {
                        if token.lexeme.eq_ignore_ascii_case(&ctx.payload)
                            || token.lexeme.eq_ignore_ascii_case(&ctx.tag)
                        {
                            self.bump();
                            return Ok(statements);
                        }
                        return Err(AconfError::parse(
                            format!(
                                "expected closing tag </{}>, found </{}>",
                                ctx.tag, token.lexeme
                            ),
                            token.line,
                        ));
                    }
                    None => {
                        return Err(AconfError::parse(
                            format!("unexpected closing tag </{}>", token.lexeme),
                            token.line,
                        ));
                    }
                },
                TokenKind::OptionValue | TokenKind::HeredocBody => {
                    return Err(AconfError::parse(
                        "expected statement, found stray value",
                        token.line,
                    ));
                }
            }
        }
    }

    fn parse_option(&mut self) -> AconfResult<Statement> {
        let name_token = self.bump();
        let name = name_token.lexeme.clone();
        let line = name_token.line;

        match self.peek().kind {
            TokenKind::OptionValue => {
                let value_token = self.bump();
                let (separator, value) = self.classify_value(&value_token.lexeme);
                Ok(Statement::Option {
                    name,
                    value,
                    separator,
                    line,
                })
            }
            TokenKind::HeredocBody => {
                let body = self.bump();
                Ok(Statement::Option {
                    name,
                    value: OptionValue::Bare(body.lexeme.clone()),
                    separator: Separator::Whitespace,
                    line,
                })
            }
            _ => Ok(Statement::Option {
                name,
                value: OptionValue::Empty,
                separator: Separator::Whitespace,
                line,
            }),
        }
    }

    fn parse_block(&mut self) -> AconfResult<Statement> {
        let open_token = self.bump();
        let line = open_token.line;
        let (tag, name, quoted) = self.split_tag(&open_token.lexeme, line)?;
        let ctx = OpenBlock {
            payload: open_token.lexeme.clone(),
            tag: tag.clone(),
            line,
        };
        let children = self.parse_statements(Some(&ctx))?;
        Ok(Statement::Block {
            tag,
            name,
            quoted,
            children,
            line,
        })
    }

    /// Split an opening-tag payload into (tag, name, quoted).
    fn split_tag(&self, payload: &str, line: usize) -> AconfResult<(String, Option<String>, bool)> {
        if !self.options.named_blocks {
            return Ok((payload.to_string(), None, false));
        }

        // A fully quoted payload is a single tag string.
        if quote_char(payload).is_some() {
            let inner = payload[1..payload.len() - 1].to_string();
            if inner.is_empty() {
                return Err(AconfError::parse("empty block tag not allowed", line));
            }
            return Ok((inner, None, true));
        }

        match payload.find([' ', '\t']) {
            Some(idx) => {
                let tag = payload[..idx].to_string();
                let rest = payload[idx..].trim();
                let name = match quote_char(rest) {
                    Some(_) => rest[1..rest.len() - 1].to_string(),
                    None => rest.to_string(),
                };
                if name.is_empty() {
                    return Err(AconfError::parse("empty block name not allowed", line));
                }
                Ok((tag, Some(name), false))
            }
            None => Ok((payload.to_string(), None, false)),
        }
    }

    /// Classify a raw option-value lexeme.
    fn classify_value(&self, raw: &str) -> (Separator, OptionValue) {
        let (separator, text) = split_separator(raw);
        if text.is_empty() {
            return (separator, OptionValue::Empty);
        }

        if self.options.force_array {
            let trimmed = text.trim_end();
            if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
                let inner = &trimmed[1..trimmed.len() - 1];
                let elements = split_respecting_quotes(inner)
                    .into_iter()
                    .map(|piece| classify_piece(&piece))
                    .collect();
                return (separator, OptionValue::Array(elements));
            }
        }

        (separator, classify_piece(text))
    }
}

fn classify_piece(text: &str) -> OptionValue {
    match quote_char(text) {
        Some('"') => OptionValue::Quoted {
            style: QuoteStyle::Double,
            raw: text[1..text.len() - 1].to_string(),
        },
        Some('\'') => OptionValue::Quoted {
            style: QuoteStyle::Single,
            raw: text[1..text.len() - 1].to_string(),
        },
        _ => OptionValue::Bare(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::lexer::tokenize;

    fn parse_text(text: &str) -> AconfResult<Config> {
        let options = Options::default();
        let tokens = tokenize(text, &options)?;
        parse(&tokens, &options)
    }

    fn parse_text_with(text: &str, options: &Options) -> AconfResult<Config> {
        let tokens = tokenize(text, options)?;
        parse(&tokens, options)
    }

    // ==================== Option tests ====================

    #[test]
    fn test_option_whitespace_separator() {
        let config = parse_text("a b\n").unwrap();
        match &config.children[0] {
            Statement::Option {
                name,
                value,
                separator,
                ..
            } => {
                assert_eq!(name, "a");
                assert_eq!(value, &OptionValue::Bare("b".to_string()));
                assert_eq!(*separator, Separator::Whitespace);
            }
            other => panic!("expected option, got {:?}", other),
        }
    }

    #[test]
    fn test_option_equals_separator() {
        let config = parse_text("a = b\n").unwrap();
        match &config.children[0] {
            Statement::Option { separator, .. } => assert_eq!(*separator, Separator::Equals),
            other => panic!("expected option, got {:?}", other),
        }
    }

    #[test]
    fn test_option_colon_empty_value() {
        let config = parse_text("option:\n").unwrap();
        match &config.children[0] {
            Statement::Option {
                value, separator, ..
            } => {
                assert_eq!(value, &OptionValue::Empty);
                assert_eq!(*separator, Separator::Colon);
            }
            other => panic!("expected option, got {:?}", other),
        }
    }

    #[test]
    fn test_option_quoted_value() {
        let config = parse_text("c \"d d\"\n").unwrap();
        match &config.children[0] {
            Statement::Option { value, .. } => {
                assert_eq!(
                    value,
                    &OptionValue::Quoted {
                        style: QuoteStyle::Double,
                        raw: "d d".to_string()
                    }
                );
            }
            other => panic!("expected option, got {:?}", other),
        }
    }

    #[test]
    fn test_option_single_quoted_value() {
        let config = parse_text("c 'd d'\n").unwrap();
        match &config.children[0] {
            Statement::Option { value, .. } => {
                assert!(matches!(
                    value,
                    OptionValue::Quoted {
                        style: QuoteStyle::Single,
                        ..
                    }
                ));
            }
            other => panic!("expected option, got {:?}", other),
        }
    }

    #[test]
    fn test_heredoc_value_is_bare() {
        let config = parse_text("body <<END\nline\nEND\n").unwrap();
        match &config.children[0] {
            Statement::Option { value, .. } => {
                assert_eq!(value, &OptionValue::Bare("line\n".to_string()));
            }
            other => panic!("expected option, got {:?}", other),
        }
    }

    // ==================== Array tests ====================

    #[test]
    fn test_array_requires_force_array() {
        let config = parse_text("b [1 2]\n").unwrap();
        match &config.children[0] {
            Statement::Option { value, .. } => {
                assert_eq!(value, &OptionValue::Bare("[1 2]".to_string()));
            }
            other => panic!("expected option, got {:?}", other),
        }
    }

    #[test]
    fn test_array_with_force_array() {
        let options = Options::builder().force_array(true).build();
        let config = parse_text_with("b [1 2 \"x y\"]\n", &options).unwrap();
        match &config.children[0] {
            Statement::Option { value, .. } => match value {
                OptionValue::Array(items) => {
                    assert_eq!(items.len(), 3);
                    assert_eq!(items[0], OptionValue::Bare("1".to_string()));
                    assert_eq!(
                        items[2],
                        OptionValue::Quoted {
                            style: QuoteStyle::Double,
                            raw: "x y".to_string()
                        }
                    );
                }
                other => panic!("expected array, got {:?}", other),
            },
            other => panic!("expected option, got {:?}", other),
        }
    }

    // ==================== Block tests ====================

    #[test]
    fn test_nested_blocks() {
        let config = parse_text("<a>\n<b>\nx 1\n</b>\n</a>\n").unwrap();
        match &config.children[0] {
            Statement::Block { tag, children, .. } => {
                assert_eq!(tag, "a");
                match &children[0] {
                    Statement::Block { tag, children, .. } => {
                        assert_eq!(tag, "b");
                        assert_eq!(children.len(), 1);
                    }
                    other => panic!("expected block, got {:?}", other),
                }
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_named_block_split() {
        let config = parse_text("<a block>\n</a>\n").unwrap();
        match &config.children[0] {
            Statement::Block { tag, name, .. } => {
                assert_eq!(tag, "a");
                assert_eq!(name.as_deref(), Some("block"));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_named_block_quoted_name() {
        let config = parse_text("<g 'h i'>\n</g>\n").unwrap();
        match &config.children[0] {
            Statement::Block { tag, name, .. } => {
                assert_eq!(tag, "g");
                assert_eq!(name.as_deref(), Some("h i"));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_tag_is_single_string() {
        let config = parse_text("<\"a b\">\n</\"a b\">\n").unwrap();
        match &config.children[0] {
            Statement::Block {
                tag, name, quoted, ..
            } => {
                assert_eq!(tag, "a b");
                assert!(name.is_none());
                assert!(*quoted);
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_named_blocks_disabled() {
        let options = Options::builder().named_blocks(false).build();
        let config = parse_text_with("<a b c>\nd 1\n</a b c>\n", &options).unwrap();
        match &config.children[0] {
            Statement::Block { tag, name, .. } => {
                assert_eq!(tag, "a b c");
                assert!(name.is_none());
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_self_closing_block() {
        let config = parse_text("<empty />\n").unwrap();
        match &config.children[0] {
            Statement::Block { tag, children, .. } => {
                assert_eq!(tag, "empty");
                assert!(children.is_empty());
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_close_tag_case_insensitive() {
        let config = parse_text("<VirtualHost>\n</virtualhost>\n").unwrap();
        match &config.children[0] {
            Statement::Block { tag, .. } => assert_eq!(tag, "VirtualHost"),
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_close_tag_full_payload() {
        let config = parse_text("<a b c>\nd 1\n</a b c>\n").unwrap();
        match &config.children[0] {
            Statement::Block { tag, name, .. } => {
                assert_eq!(tag, "a");
                assert_eq!(name.as_deref(), Some("b c"));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    // ==================== Comment and include tests ====================

    #[test]
    fn test_comment_statement() {
        let config = parse_text("# note\n").unwrap();
        match &config.children[0] {
            Statement::Comment { text, style, .. } => {
                assert_eq!(text, " note");
                assert_eq!(*style, CommentStyle::Hash);
            }
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn test_include_statement() {
        let config = parse_text("IncludeOptional extra.conf\n").unwrap();
        match &config.children[0] {
            Statement::Include {
                path,
                apache,
                optional,
                ..
            } => {
                assert_eq!(path, "extra.conf");
                assert!(apache);
                assert!(optional);
            }
            other => panic!("expected include, got {:?}", other),
        }
    }

    // ==================== Error tests ====================

    #[test]
    fn test_unclosed_block() {
        let err = parse_text("<a>\nx 1\n").unwrap_err();
        assert!(err.message.contains("end of input"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_mismatched_close_tag() {
        let err = parse_text("<a>\n</b>\n").unwrap_err();
        assert!(err.message.contains("</b>"));
    }

    #[test]
    fn test_unexpected_close_tag() {
        let err = parse_text("</a>\n").unwrap_err();
        assert!(err.message.contains("unexpected closing tag"));
    }

    #[test]
    fn test_slash_tag_without_close_fails() {
        assert!(parse_text("<noself/>").is_err());
    }

    #[test]
    fn test_empty_input() {
        let config = parse_text("").unwrap();
        assert!(config.children.is_empty());
    }
}
