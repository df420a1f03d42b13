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

//! Token model produced by the lexer.

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<payload>`; the lexeme is the payload between the brackets.
    OpenTag,
    /// `</name>`; the lexeme is the name.
    CloseTag,
    /// `<payload />`; the lexeme is the payload without the trailing `/`.
    OpenCloseTag,
    /// First bare word of an option line.
    OptionName,
    /// Raw remainder of the option line, separator prefix included.
    OptionValue,
    /// `# ...` comment; the lexeme is the text after the hash.
    HashComment,
    /// `/* ... */` comment; the lexeme is the interior text.
    CComment,
    /// `<<include path>>`; the lexeme is the path.
    Include,
    /// `Include path` line; the lexeme is the path.
    ApacheInclude,
    /// `IncludeOptional path` line; the lexeme is the path.
    ApacheIncludeOptional,
    /// Heredoc body; the lexeme is the verbatim text, one `\n` per line.
    HeredocBody,
    /// Logical line terminator.
    Newline,
    /// End of input.
    Eof,
}

/// A single token with its raw lexeme and 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Raw text carried by the token.
    pub lexeme: String,
    /// Line number the token started on (1-based).
    pub line: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_new() {
        let t = Token::new(TokenKind::OptionName, "key", 3);
        assert_eq!(t.kind, TokenKind::OptionName);
        assert_eq!(t.lexeme, "key");
        assert_eq!(t.line, 3);
    }

    #[test]
    fn test_token_equality() {
        let a = Token::new(TokenKind::Newline, "\n", 1);
        let b = Token::new(TokenKind::Newline, "\n", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_kind_copy() {
        let kind = TokenKind::OpenTag;
        let copied = kind;
        assert_eq!(kind, copied);
    }
}
