//! Recursive-descent statement parser
//!
//! Reduces the token stream one `;`-terminated statement at a time so the
//! caller can act on each statement before the next one is read.

use super::error::{SyntaxError, SyntaxResult};
use crate::config::compile_time::syntax::*;
use crate::grammar::ast::*;
use crate::grammar::keywords::Keyword;
use crate::log_debug;
use crate::preamble::ArgumentPosition;
use crate::tokens::{Token, TokenStream};
use crate::utils::{Span, Spanned};

pub struct StatementParser {
    tokens: TokenStream,
    statements_parsed: usize,
}

impl StatementParser {
    pub fn new(tokens: TokenStream) -> Self {
        Self {
            tokens,
            statements_parsed: 0,
        }
    }

    pub fn statements_parsed(&self) -> usize {
        self.statements_parsed
    }

    /// Parse the next statement, or `None` once only `Eof` remains
    pub fn next_statement(&mut self) -> SyntaxResult<Option<Statement>> {
        let start = self.tokens.current_span();

        let statement = match self.tokens.current_token() {
            Token::Eof => return Ok(None),
            Token::Keyword(Keyword::Capture) => self.parse_capture()?,
            Token::Keyword(Keyword::Predicate) => self.parse_predicate()?,
            Token::Identifier(_) => match self.tokens.peek_ahead(1).value {
                Token::Assign => self.parse_assignment()?,
                Token::LeftParen => self.parse_pattern()?,
                _ => {
                    self.tokens.advance();
                    return Err(self.unexpected("'(' or '<-'"));
                }
            },
            _ => return Err(self.unexpected("a statement")),
        };

        let end = self.expect(Token::Terminator, "';'")?;

        self.statements_parsed += 1;
        if self.statements_parsed > MAX_STATEMENTS {
            return Err(SyntaxError::limit_exceeded(
                "statements",
                self.statements_parsed,
                MAX_STATEMENTS,
                start,
            ));
        }

        let statement = with_span(statement, start.merge(end));
        log_debug!("Parsed statement",
            "kind" => statement.kind_name(),
            "index" => self.statements_parsed - 1
        );

        Ok(Some(statement))
    }

    /// Parse every remaining statement; a program must have at least one
    pub fn parse_all(mut self) -> SyntaxResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while let Some(statement) = self.next_statement()? {
            statements.push(statement);
        }

        if statements.is_empty() {
            return Err(SyntaxError::EmptyProgram);
        }
        Ok(statements)
    }

    /// `capture <event> <position|ret> as <binding>`
    fn parse_capture(&mut self) -> SyntaxResult<Statement> {
        self.tokens.advance();
        let event = self.expect_identifier("event name")?;

        let current = self.tokens.advance();
        let position = match &current.value {
            Token::Numeric(text) => text
                .parse::<usize>()
                .map(ArgumentPosition::Index)
                .map_err(|_| SyntaxError::invalid_position(text, current.span))?,
            Token::Keyword(Keyword::Ret) => ArgumentPosition::Return,
            _ => return Err(self.error_at(&current, "argument position or 'ret'")),
        };

        self.expect(Token::Keyword(Keyword::As), "'as'")?;
        let binding = self.expect_identifier("binding name")?;

        Ok(Statement::Capture(CaptureDeclaration {
            event: event.value,
            position,
            binding: binding.value,
            span: None,
        }))
    }

    /// `predicate <event> <binding> == "<literal>"`
    fn parse_predicate(&mut self) -> SyntaxResult<Statement> {
        self.tokens.advance();
        let event = self.expect_identifier("event name")?;
        let binding = self.expect_identifier("binding name")?;
        self.expect(Token::Equality, "'=='")?;
        let expected = self.expect_string()?;

        Ok(Statement::Predicate(PredicateDeclaration {
            event: event.value,
            binding: binding.value,
            expected,
            span: None,
        }))
    }

    /// `<register> <- "<literal>"`
    fn parse_assignment(&mut self) -> SyntaxResult<Statement> {
        let register = self.expect_identifier("register name")?;
        self.expect(Token::Assign, "'<-'")?;
        let value = self.expect_string()?;

        Ok(Statement::Assignment(RegisterAssignment {
            register: register.value,
            value,
            span: None,
        }))
    }

    /// `<event>(<parameter>, ...)`; the list may be empty
    fn parse_pattern(&mut self) -> SyntaxResult<Statement> {
        let event = self.expect_identifier("event name")?;
        self.expect(Token::LeftParen, "'('")?;

        let mut parameters = Vec::new();
        if *self.tokens.current_token() != Token::RightParen {
            loop {
                let parameter = self.parse_parameter()?;
                if parameters.len() == MAX_PARAMETERS_PER_PATTERN {
                    return Err(SyntaxError::limit_exceeded(
                        "parameters per pattern",
                        parameters.len() + 1,
                        MAX_PARAMETERS_PER_PATTERN,
                        parameter.span.unwrap_or(event.span),
                    ));
                }
                parameters.push(parameter);

                if *self.tokens.current_token() != Token::ParamSeparator {
                    break;
                }
                self.tokens.advance();
            }
        }

        self.expect(Token::RightParen, "',' or ')'")?;

        Ok(Statement::Pattern(EventPattern {
            event: event.value,
            parameters,
            span: None,
        }))
    }

    /// `?name`, `!name` or `name`
    fn parse_parameter(&mut self) -> SyntaxResult<Parameter> {
        let start = self.tokens.current_span();
        let kind = match self.tokens.current_token() {
            Token::Read => ParameterKind::Read,
            Token::Write => ParameterKind::Write,
            _ => ParameterKind::Plain,
        };
        if kind != ParameterKind::Plain {
            self.tokens.advance();
        }

        let name = self.expect_identifier("parameter name")?;
        Ok(Parameter::new(kind, name.value).with_span(start.merge(name.span)))
    }

    fn expect(&mut self, expected: Token, description: &str) -> SyntaxResult<Span> {
        let current = self.tokens.advance();
        if current.value == expected {
            Ok(current.span)
        } else {
            Err(self.error_at(&current, description))
        }
    }

    fn expect_identifier(&mut self, description: &str) -> SyntaxResult<Spanned<Identifier>> {
        let current = self.tokens.advance();
        match current.value {
            Token::Identifier(name) => Ok(Spanned::new(name, current.span)),
            _ => Err(self.error_at(&current, description)),
        }
    }

    fn expect_string(&mut self) -> SyntaxResult<String> {
        let current = self.tokens.advance();
        match current.value {
            Token::StringLiteral(text) => Ok(text),
            _ => Err(self.error_at(&current, "quoted string")),
        }
    }

    /// Error for the token at the cursor
    fn unexpected(&self, expected: &str) -> SyntaxError {
        self.error_at(self.tokens.current(), expected)
    }

    fn error_at(&self, found: &Spanned<Token>, expected: &str) -> SyntaxError {
        match found.value {
            Token::Eof => SyntaxError::unexpected_end_of_input(expected, found.span),
            _ => SyntaxError::unexpected_token(expected, &found.value.describe(), found.span),
        }
    }
}

fn with_span(statement: Statement, span: Span) -> Statement {
    match statement {
        Statement::Capture(node) => Statement::Capture(CaptureDeclaration {
            span: Some(span),
            ..node
        }),
        Statement::Predicate(node) => Statement::Predicate(PredicateDeclaration {
            span: Some(span),
            ..node
        }),
        Statement::Assignment(node) => Statement::Assignment(RegisterAssignment {
            span: Some(span),
            ..node
        }),
        Statement::Pattern(node) => Statement::Pattern(EventPattern {
            span: Some(span),
            ..node
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::LexicalPreferences;
    use crate::lexical::tokenize_with_preferences;
    use assert_matches::assert_matches;

    fn parser(source: &str) -> StatementParser {
        let preferences = LexicalPreferences {
            strict: false,
            include_position_in_errors: true,
            collect_detailed_metrics: false,
        };
        StatementParser::new(tokenize_with_preferences(source, preferences).unwrap())
    }

    fn parse(source: &str) -> SyntaxResult<Vec<Statement>> {
        parser(source).parse_all()
    }

    #[test]
    fn test_capture_by_index_and_return() {
        let statements = parse("capture open 0 as path; capture open ret as fd;").unwrap();

        assert_matches!(&statements[0], Statement::Capture(c)
            if c.event == "open" && c.position == ArgumentPosition::Index(0) && c.binding == "path");
        assert_matches!(&statements[1], Statement::Capture(c)
            if c.position == ArgumentPosition::Return && c.binding == "fd");
    }

    #[test]
    fn test_predicate_and_assignment() {
        let statements = parse(r#"predicate open mode == "O_RDONLY"; a <- "5";"#).unwrap();

        assert_matches!(&statements[0], Statement::Predicate(p)
            if p.binding == "mode" && p.expected == "O_RDONLY");
        assert_matches!(&statements[1], Statement::Assignment(a)
            if a.register == "a" && a.value == "5");
    }

    #[test]
    fn test_event_pattern_parameters() {
        let statements = parse("read(?fd, !buf, count); close();").unwrap();

        let Statement::Pattern(read) = &statements[0] else {
            panic!("expected event pattern");
        };
        let kinds: Vec<ParameterKind> = read.parameters.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![ParameterKind::Read, ParameterKind::Write, ParameterKind::Plain]
        );
        assert_eq!(read.parameters[1].name, "buf");

        assert_matches!(&statements[1], Statement::Pattern(close) if close.parameters.is_empty());
    }

    #[test]
    fn test_statement_span_covers_terminator() {
        let statements = parse("open(!fd);\nclose(?fd);").unwrap();
        let span = statements[1].span().unwrap();

        assert_eq!(span.start.line, 2);
        assert_eq!(span.start.column, 1);
        assert_eq!(span.end.column, 12);
    }

    #[test]
    fn test_missing_terminator() {
        assert_matches!(
            parse("open(!fd) close(?fd);"),
            Err(SyntaxError::UnexpectedToken { expected, found, .. })
                if expected == "';'" && found == "identifier 'close'"
        );
    }

    #[test]
    fn test_truncated_statement() {
        assert_matches!(
            parse("capture open 0 as"),
            Err(SyntaxError::UnexpectedEndOfInput { expected, .. }) if expected == "binding name"
        );
    }

    #[test]
    fn test_bare_identifier_is_not_a_statement() {
        assert_matches!(
            parse("open;"),
            Err(SyntaxError::UnexpectedToken { expected, .. }) if expected == "'(' or '<-'"
        );
    }

    #[test]
    fn test_statement_cannot_start_with_operator() {
        assert_matches!(
            parse("?fd;"),
            Err(SyntaxError::UnexpectedToken { expected, found, .. })
                if expected == "a statement" && found == "'?'"
        );
    }

    #[test]
    fn test_predicate_requires_quoted_literal() {
        assert_matches!(
            parse("predicate open mode == r;"),
            Err(SyntaxError::UnexpectedToken { expected, .. }) if expected == "quoted string"
        );
    }

    #[test]
    fn test_position_overflow() {
        assert_matches!(
            parse("capture open 99999999999999999999999999 as x;"),
            Err(SyntaxError::InvalidPosition { .. })
        );
    }

    #[test]
    fn test_empty_program() {
        assert_matches!(parse("# only a comment\n"), Err(SyntaxError::EmptyProgram));
    }

    #[test]
    fn test_statements_are_read_one_at_a_time() {
        let mut parser = parser("open(!fd); ; close(?fd);");

        assert_matches!(parser.next_statement(), Ok(Some(Statement::Pattern(_))));
        assert_eq!(parser.statements_parsed(), 1);
        assert_matches!(parser.next_statement(), Err(SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_parameter_limit() {
        let parameters: Vec<String> = (0..=MAX_PARAMETERS_PER_PATTERN)
            .map(|i| format!("p{}", i))
            .collect();
        let source = format!("event({});", parameters.join(", "));

        assert_matches!(
            parse(&source),
            Err(SyntaxError::LimitExceeded { what: "parameters per pattern", .. })
        );
    }
}
