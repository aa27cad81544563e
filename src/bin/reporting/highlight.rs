use colored::*;
use goinspect::syntax::*;
use goinspect::*;

/// Colors Go source for the terminal, underlining the marked spans.
pub fn highlight(source: Arc<Source>, markers: Vec<(Color, Span)>) -> String {
    let tokens = tokenize(source);
    tokens
        .into_iter()
        .map(|token| {
            let lexeme = token.lexeme();

            for (color, span) in markers.iter() {
                if span.contains_location(&token.span.start)
                    && span.contains_location(&token.span.end)
                    && !token.kind.is_trivia()
                {
                    return lexeme.color(*color).underline().to_string();
                }
            }

            match token.kind {
                TokenKind::EOF | TokenKind::ImplicitSemicolon | TokenKind::Whitespace(_) => lexeme,
                TokenKind::Unknown(_) => lexeme.red().underline().to_string(),

                TokenKind::LineComment(_) | TokenKind::BlockComment(_) => {
                    lexeme.bright_black().to_string()
                }

                TokenKind::StringLiteral(_) | TokenKind::RuneLiteral(_) => {
                    lexeme.green().to_string()
                }

                TokenKind::IntLiteral(_)
                | TokenKind::FloatLiteral(_)
                | TokenKind::ImaginaryLiteral(_) => lexeme.magenta().to_string(),

                TokenKind::Identifier(_) => lexeme,

                _ if TokenKind::keyword(lexeme.as_str()).is_some() => lexeme.blue().to_string(),

                _ => lexeme,
            }
        })
        .collect::<String>()
}
