//! Core tokenizer implementation
//!
//! `Tokenizer` is a lazy, fused iterator over one source text. Whitespace and
//! `#` comments never produce tokens. Characters outside the token set are
//! skipped unless strict lexing is enabled, in which case they end the
//! sequence with a `LexerError`.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{classify_word, SpannedToken, Token, TokenClass, TokenStream};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error, log_success};
use std::iter::Peekable;
use std::str::CharIndices;

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character: '{character}' at line {}, column {}", .span.start.line, .span.start.column)]
    InvalidCharacter { character: char, span: Span },

    #[error("Unterminated string literal starting at line {}, column {}", .span.start.line, .span.start.column)]
    UnterminatedString { span: Span },

    #[error("Identifier too long: {length} characters (max {max})")]
    IdentifierTooLong { length: usize, max: usize, span: Span },

    #[error("String too large: {size} bytes (max {max})")]
    StringTooLarge { size: usize, max: usize, span: Span },

    #[error("Comment too long: {length} characters (max {max})")]
    CommentTooLong { length: usize, max: usize, span: Span },

    #[error("Too many tokens: {count} (max {max})")]
    TooManyTokens { count: usize, max: usize, span: Span },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LexerError::InvalidCharacter { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::IdentifierTooLong { span, .. }
            | LexerError::StringTooLarge { span, .. }
            | LexerError::CommentTooLong { span, .. }
            | LexerError::TooManyTokens { span, .. } => *span,
        }
    }
}

/// Counters gathered while tokenizing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub operator_tokens: usize,
    pub comment_count: usize,
    pub skipped_chars: usize,
    pub max_string_length: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, detailed: bool) {
        self.total_tokens += 1;
        if !detailed {
            return;
        }

        match token.class() {
            TokenClass::Keyword => self.keyword_tokens += 1,
            TokenClass::Identifier => self.identifier_tokens += 1,
            TokenClass::Literal => self.literal_tokens += 1,
            TokenClass::Operator => self.operator_tokens += 1,
            TokenClass::Punctuation | TokenClass::Special => {}
        }
    }
}

/// Lazy token iterator over one specification source
pub struct Tokenizer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    position: Position,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_preferences(source, LexicalPreferences::default())
    }

    pub fn with_preferences(source: &'a str, preferences: LexicalPreferences) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: Position::start(),
            preferences,
            metrics: LexicalMetrics::default(),
            finished: false,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Position of the next unread character
    pub fn position(&self) -> Position {
        self.position
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        self.position = self.position.advance(ch);
        Some(ch)
    }

    /// Consume characters while `predicate` holds, returning them
    fn bump_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> &'a str {
        let source = self.source;
        let start = self.position.offset;
        while let Some(ch) = self.peek_char() {
            if !predicate(ch) {
                break;
            }
            self.bump();
        }
        &source[start..self.position.offset]
    }

    fn fail(&mut self, error: LexerError) -> Option<Result<SpannedToken, LexerError>> {
        self.finished = true;

        let message = if self.preferences.include_position_in_errors {
            format!(
                "Lexical analysis failed at line {}, column {}",
                error.span().start.line,
                error.span().start.column
            )
        } else {
            "Lexical analysis failed".to_string()
        };
        log_error!(error.error_code(), &message,
            span = error.span(),
            "error" => &error,
            "tokens_processed" => self.metrics.total_tokens
        );

        Some(Err(error))
    }

    /// Skip an unrecognized character, or fail in strict mode
    fn skip_unrecognized(
        &mut self,
        start: Position,
        ch: char,
    ) -> Option<Result<SpannedToken, LexerError>> {
        if self.preferences.strict {
            let span = Span::new(start, start.advance(ch));
            return self.fail(LexerError::InvalidCharacter {
                character: ch,
                span,
            });
        }

        self.bump();
        self.metrics.skipped_chars += 1;
        log_debug!("Skipping unrecognized character",
            "character" => ch.escape_debug(),
            "position" => start
        );
        None
    }

    fn scan_comment(&mut self, start: Position) -> Result<(), LexerError> {
        let text = self.bump_while(|ch| ch != '\n');
        let length = text.chars().count();
        if length > MAX_COMMENT_LENGTH {
            return Err(LexerError::CommentTooLong {
                length,
                max: MAX_COMMENT_LENGTH,
                span: Span::new(start, self.position),
            });
        }
        self.metrics.comment_count += 1;
        Ok(())
    }

    /// Scan `"..."` up to the next quote. `Ok(None)` means the quote is
    /// unterminated and was skipped in permissive mode.
    fn scan_string(&mut self, start: Position) -> Result<Option<Token>, LexerError> {
        let content_start = start.offset + 1;
        let Some(length) = self.source[content_start..].find('"') else {
            if self.preferences.strict {
                return Err(LexerError::UnterminatedString {
                    span: Span::new(start, start.advance('"')),
                });
            }
            self.bump();
            self.metrics.skipped_chars += 1;
            log_debug!("Skipping unterminated quote", "position" => start);
            return Ok(None);
        };

        if length > MAX_STRING_SIZE {
            return Err(LexerError::StringTooLarge {
                size: length,
                max: MAX_STRING_SIZE,
                span: Span::new(start, start.advance('"')),
            });
        }

        self.bump();
        let content = self.bump_while(|ch| ch != '"');
        self.bump();

        self.metrics.max_string_length = self.metrics.max_string_length.max(content.len());
        Ok(Some(Token::StringLiteral(content.to_string())))
    }

    fn scan_word(&mut self, start: Position) -> Result<Token, LexerError> {
        let word = self.bump_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if word.len() > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length: word.len(),
                max: MAX_IDENTIFIER_LENGTH,
                span: Span::new(start, self.position),
            });
        }
        Ok(classify_word(word))
    }

    fn emit(&mut self, token: Token, start: Position) -> Option<Result<SpannedToken, LexerError>> {
        if self.metrics.total_tokens >= MAX_TOKEN_COUNT {
            return self.fail(LexerError::TooManyTokens {
                count: self.metrics.total_tokens + 1,
                max: MAX_TOKEN_COUNT,
                span: Span::new(start, self.position),
            });
        }

        self.metrics
            .record_token(&token, self.preferences.collect_detailed_metrics);
        Some(Ok(Spanned::new(token, Span::new(start, self.position))))
    }

    /// Consume a one-character token
    fn single(&mut self, token: Token, start: Position) -> Option<Result<SpannedToken, LexerError>> {
        self.bump();
        self.emit(token, start)
    }

    /// Consume a two-character operator, or treat the first character as
    /// unrecognized when the second does not follow
    fn pair(
        &mut self,
        first: char,
        second: char,
        token: Token,
        start: Position,
    ) -> Option<Result<SpannedToken, LexerError>> {
        let next = self.source[start.offset + first.len_utf8()..].chars().next();
        if next == Some(second) {
            self.bump();
            self.bump();
            self.emit(token, start)
        } else {
            self.skip_unrecognized(start, first)
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<SpannedToken, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let start = self.position;
            let Some(ch) = self.peek_char() else {
                self.finished = true;
                return None;
            };

            let produced = match ch {
                ' ' | '\t' | '\n' | '\r' => {
                    self.bump();
                    None
                }
                '#' => match self.scan_comment(start) {
                    Ok(()) => None,
                    Err(error) => self.fail(error),
                },
                '(' => self.single(Token::LeftParen, start),
                ')' => self.single(Token::RightParen, start),
                '?' => self.single(Token::Read, start),
                '!' => self.single(Token::Write, start),
                ';' => self.single(Token::Terminator, start),
                ',' => {
                    self.bump();
                    self.bump_while(char::is_whitespace);
                    self.emit(Token::ParamSeparator, start)
                }
                '=' => self.pair('=', '=', Token::Equality, start),
                '<' => self.pair('<', '-', Token::Assign, start),
                '"' => match self.scan_string(start) {
                    Ok(Some(token)) => self.emit(token, start),
                    Ok(None) => None,
                    Err(error) => self.fail(error),
                },
                '0'..='9' => {
                    let digits = self.bump_while(|c| c.is_ascii_digit());
                    self.emit(Token::Numeric(digits.to_string()), start)
                }
                'a'..='z' | 'A'..='Z' | '_' => match self.scan_word(start) {
                    Ok(token) => self.emit(token, start),
                    Err(error) => self.fail(error),
                },
                other => self.skip_unrecognized(start, other),
            };

            if produced.is_some() {
                return produced;
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

/// Collects a tokenizer into a `TokenStream` and reports the outcome
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        log_debug!("Starting lexical analysis",
            "bytes" => source.len(),
            "strict" => self.preferences.strict,
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        let mut tokenizer = Tokenizer::with_preferences(source, self.preferences.clone());
        let tokens = tokenizer.by_ref().collect::<Result<Vec<_>, _>>();
        self.metrics = tokenizer.metrics().clone();
        let end = tokenizer.position();

        let mut tokens = tokens?;
        tokens.push(Spanned::new(Token::Eof, Span::point(end)));
        let token_stream = TokenStream::new(tokens);

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed successfully",
            "token_count" => self.metrics.total_tokens,
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "literals" => self.metrics.literal_tokens,
            "comments" => self.metrics.comment_count,
            "skipped_chars" => self.metrics.skipped_chars
        );

        Ok(token_stream)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::keywords::Keyword;
    use assert_matches::assert_matches;

    fn permissive() -> LexicalPreferences {
        LexicalPreferences {
            strict: false,
            include_position_in_errors: true,
            collect_detailed_metrics: true,
        }
    }

    fn strict() -> LexicalPreferences {
        LexicalPreferences {
            strict: true,
            ..permissive()
        }
    }

    fn kinds(source: &str) -> Vec<Token> {
        Tokenizer::with_preferences(source, permissive())
            .map(|result| result.map(Spanned::into_inner))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_capture_declaration() {
        assert_eq!(
            kinds("capture open 0 as fd;"),
            vec![
                Token::Keyword(Keyword::Capture),
                Token::Identifier("open".into()),
                Token::Numeric("0".into()),
                Token::Keyword(Keyword::As),
                Token::Identifier("fd".into()),
                Token::Terminator,
            ]
        );
    }

    #[test]
    fn test_operators_and_literals() {
        assert_eq!(
            kinds(r#"a <- "5"; predicate open mode == "r";"#),
            vec![
                Token::Identifier("a".into()),
                Token::Assign,
                Token::StringLiteral("5".into()),
                Token::Terminator,
                Token::Keyword(Keyword::Predicate),
                Token::Identifier("open".into()),
                Token::Identifier("mode".into()),
                Token::Equality,
                Token::StringLiteral("r".into()),
                Token::Terminator,
            ]
        );
    }

    #[test]
    fn test_event_pattern_parameters() {
        assert_eq!(
            kinds("read(?fd,\n   !buf, count);"),
            vec![
                Token::Identifier("read".into()),
                Token::LeftParen,
                Token::Read,
                Token::Identifier("fd".into()),
                Token::ParamSeparator,
                Token::Write,
                Token::Identifier("buf".into()),
                Token::ParamSeparator,
                Token::Identifier("count".into()),
                Token::RightParen,
                Token::Terminator,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            kinds("captured as_of return"),
            vec![
                Token::Identifier("captured".into()),
                Token::Identifier("as_of".into()),
                Token::Identifier("return".into()),
            ]
        );
    }

    #[test]
    fn test_comments_and_whitespace_are_dropped() {
        let source = "# leading comment\nopen(!fd); # trailing\n\t\r\nclose(?fd);";
        assert_eq!(kinds(source).len(), 12);
    }

    #[test]
    fn test_permissive_skips_unrecognized() {
        let mut tokenizer = Tokenizer::with_preferences("open@(%!fd);", permissive());
        let tokens: Vec<Token> = tokenizer
            .by_ref()
            .map(|result| result.unwrap().into_inner())
            .collect();

        assert_eq!(
            tokens,
            vec![
                Token::Identifier("open".into()),
                Token::LeftParen,
                Token::Write,
                Token::Identifier("fd".into()),
                Token::RightParen,
                Token::Terminator,
            ]
        );
        assert_eq!(tokenizer.metrics().skipped_chars, 2);
    }

    #[test]
    fn test_lone_operator_halves_are_skipped() {
        assert_eq!(
            kinds("a = b < c"),
            vec![
                Token::Identifier("a".into()),
                Token::Identifier("b".into()),
                Token::Identifier("c".into()),
            ]
        );
    }

    #[test]
    fn test_strict_rejects_unrecognized() {
        let results: Vec<_> = Tokenizer::with_preferences("open @", strict()).collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_matches!(
            &results[1],
            Err(LexerError::InvalidCharacter { character: '@', span })
                if span.start.line == 1 && span.start.column == 6
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            kinds(r#"a <- "5"#),
            vec![
                Token::Identifier("a".into()),
                Token::Assign,
                Token::Numeric("5".into()),
            ]
        );

        let mut analyzer = LexicalAnalyzer::with_preferences(strict());
        assert_matches!(
            analyzer.tokenize(r#"a <- "5"#),
            Err(LexerError::UnterminatedString { .. })
        );
    }

    #[test]
    fn test_string_may_span_lines() {
        assert_eq!(
            kinds("a <- \"x\ny\";"),
            vec![
                Token::Identifier("a".into()),
                Token::Assign,
                Token::StringLiteral("x\ny".into()),
                Token::Terminator,
            ]
        );
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let tokens: Vec<SpannedToken> = Tokenizer::with_preferences("a <- \"5\";\n  open(!fd);", permissive())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(tokens[2].span.start, Position::new(5, 1, 6));
        assert_eq!(tokens[2].span.end, Position::new(8, 1, 9));
        assert_eq!(tokens[4].value, Token::Identifier("open".into()));
        assert_eq!(tokens[4].span.start, Position::new(12, 2, 3));
    }

    #[test]
    fn test_identifier_too_long() {
        let name = "x".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let results: Vec<_> = Tokenizer::with_preferences(&name, permissive()).collect();
        assert_matches!(
            results.as_slice(),
            [Err(LexerError::IdentifierTooLong { length, .. })] if *length == MAX_IDENTIFIER_LENGTH + 1
        );
    }

    #[test]
    fn test_string_too_large() {
        let source = format!("a <- \"{}\";", "v".repeat(MAX_STRING_SIZE + 1));
        let error = LexicalAnalyzer::with_preferences(permissive())
            .tokenize(&source)
            .unwrap_err();

        assert_matches!(
            error,
            LexerError::StringTooLarge { size, max, .. }
                if size == MAX_STRING_SIZE + 1 && max == MAX_STRING_SIZE
        );
        assert_eq!(error.span().start, Position::new(5, 1, 6));
    }

    #[test]
    fn test_comment_too_long() {
        let source = format!("open();\n# {}\nclose();", "c".repeat(MAX_COMMENT_LENGTH + 1));
        let error = LexicalAnalyzer::with_preferences(permissive())
            .tokenize(&source)
            .unwrap_err();

        assert_matches!(
            &error,
            LexerError::CommentTooLong { length, max, .. }
                if *length > MAX_COMMENT_LENGTH && *max == MAX_COMMENT_LENGTH
        );
        assert_eq!(error.span().start.line, 2);
    }

    #[test]
    fn test_comment_at_limit_is_accepted() {
        let source = format!("#{}\nopen();", "c".repeat(MAX_COMMENT_LENGTH - 1));
        let mut analyzer = LexicalAnalyzer::with_preferences(permissive());
        analyzer.tokenize(&source).unwrap();
        assert_eq!(analyzer.metrics().comment_count, 1);
    }

    #[test]
    fn test_too_many_tokens() {
        let source = ";".repeat(MAX_TOKEN_COUNT + 1);
        let error = LexicalAnalyzer::with_preferences(permissive())
            .tokenize(&source)
            .unwrap_err();

        assert_matches!(
            error,
            LexerError::TooManyTokens { count, max, span }
                if count == MAX_TOKEN_COUNT + 1
                    && max == MAX_TOKEN_COUNT
                    && span.start.offset == MAX_TOKEN_COUNT
        );
    }

    #[test]
    fn test_tokenizer_is_fused_after_error() {
        let mut tokenizer = Tokenizer::with_preferences("@ open", strict());
        assert_matches!(tokenizer.next(), Some(Err(_)));
        assert!(tokenizer.next().is_none());
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_analyzer_appends_eof_and_counts() {
        let mut analyzer = LexicalAnalyzer::with_preferences(permissive());
        let stream = analyzer.tokenize("capture open ret as fd;").unwrap();

        assert_eq!(stream.len(), 7);
        assert_eq!(stream.tokens()[6].value, Token::Eof);
        assert_eq!(stream.tokens()[6].span, Span::point(Position::new(23, 1, 24)));

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, 6);
        assert_eq!(metrics.keyword_tokens, 3);
        assert_eq!(metrics.identifier_tokens, 2);
    }

    #[test]
    fn test_error_code_mapping() {
        let error = LexerError::UnterminatedString {
            span: Span::point(Position::start()),
        };
        assert_eq!(error.error_code().as_str(), "E021");
    }
}
