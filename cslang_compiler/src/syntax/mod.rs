//! Syntax analysis: token stream to statements

mod error;
mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::StatementParser;

use crate::grammar::ast::Statement;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_error, log_success};

/// Parse a whole token stream into statements
pub fn parse_statements(token_stream: TokenStream) -> SyntaxResult<Vec<Statement>> {
    log_debug!("Starting syntax analysis", "tokens" => token_stream.len());

    let result = StatementParser::new(token_stream).parse_all();

    match &result {
        Ok(statements) => {
            log_success!(codes::success::PARSING_COMPLETE,
                "Syntax analysis completed successfully",
                "statements" => statements.len()
            );
        }
        Err(error) => match error.span() {
            Some(span) => log_error!(error.error_code(), "Syntax analysis failed",
                span = span,
                "error" => error
            ),
            None => log_error!(error.error_code(), "Syntax analysis failed",
                "error" => error
            ),
        },
    }

    result
}
