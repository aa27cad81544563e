use crate::syntax::*;
use crate::*;

struct CharStream {
    chars: Vec<char>,
    offset: usize,
}

impl CharStream {
    fn peek(&self, ahead: usize) -> char {
        self.chars.get(self.offset + ahead).cloned().unwrap_or('\0')
    }

    fn at_end(&self) -> bool {
        self.offset >= self.chars.len()
    }

    fn bump(&mut self) -> char {
        let c = self.peek(0);
        self.offset += 1;
        c
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, f: F) -> String {
        let mut s = String::new();
        while !self.at_end() && f(self.peek(0)) {
            s.push(self.bump());
        }
        s
    }
}

pub fn tokenize(source: Arc<Source>) -> Vec<Token> {
    let mut stream = CharStream {
        chars: source.code.chars().collect(),
        offset: 0,
    };
    let mut tokens = vec![];
    let mut ends_statement = false;

    while let Some(token) = next_token(&source, &mut stream) {
        if token.kind.is_trivia() {
            if ends_statement && token.lexeme().contains('\n') {
                tokens.push(implicit_semicolon(&source, token.span.start.offset));
                ends_statement = false;
            }
        } else {
            ends_statement = token.kind.ends_statement();
        }
        tokens.push(token);
    }

    let end = source.len();
    if ends_statement {
        tokens.push(implicit_semicolon(&source, end));
    }

    tokens.push(Token {
        kind: TokenKind::EOF,
        span: Span::at_range(&source, end..end),
    });

    tokens
}

fn implicit_semicolon(source: &Arc<Source>, offset: usize) -> Token {
    Token {
        kind: TokenKind::ImplicitSemicolon,
        span: Span::at_range(source, offset..offset),
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t')
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn next_token(source: &Arc<Source>, stream: &mut CharStream) -> Option<Token> {
    if stream.at_end() {
        return None;
    }

    let offset = stream.offset;
    let ch = stream.peek(0);
    let next_ch = stream.peek(1);

    let kind = match (ch, next_ch) {
        // Whitespace
        (c, _) if is_whitespace(c) => TokenKind::Whitespace(stream.take_while(is_whitespace)),

        // LineComment
        ('/', '/') => {
            stream.offset += 2;
            TokenKind::LineComment(stream.take_while(|c| c != '\n'))
        }

        // BlockComment
        ('/', '*') => {
            stream.offset += 2;
            let mut body = String::new();
            while !stream.at_end() && !(stream.peek(0) == '*' && stream.peek(1) == '/') {
                body.push(stream.bump());
            }
            if !stream.at_end() {
                stream.offset += 2;
            }
            TokenKind::BlockComment(body)
        }

        // Numbers
        (n, _) if n.is_ascii_digit() => lex_number(stream),
        ('.', n) if n.is_ascii_digit() => lex_number(stream),

        // Identifiers and keywords
        (c, _) if is_identifier_start(c) => {
            let lexeme = stream.take_while(is_identifier_part);
            TokenKind::keyword(&lexeme).unwrap_or(TokenKind::Identifier(lexeme))
        }

        // Strings and runes
        ('"', _) => TokenKind::StringLiteral(lex_quoted(stream, '"')),
        ('\'', _) => TokenKind::RuneLiteral(lex_quoted(stream, '\'')),
        ('`', _) => {
            let mut raw = String::new();
            raw.push(stream.bump());
            raw.push_str(&stream.take_while(|c| c != '`'));
            if !stream.at_end() {
                raw.push(stream.bump());
            }
            TokenKind::StringLiteral(raw)
        }

        _ => lex_operator(stream),
    };

    Some(Token {
        kind,
        span: Span::at_range(source, offset..stream.offset),
    })
}

fn lex_number(stream: &mut CharStream) -> TokenKind {
    let mut lexeme = String::new();
    let hex = stream.peek(0) == '0' && matches!(stream.peek(1), 'x' | 'X');

    loop {
        let c = stream.peek(0);
        let exponent_sign = matches!(c, '+' | '-')
            && match lexeme.chars().last() {
                Some('e') | Some('E') => !hex,
                Some('p') | Some('P') => hex,
                _ => false,
            };

        if stream.at_end() || !(is_identifier_part(c) || c == '.' || exponent_sign) {
            break;
        }
        lexeme.push(stream.bump());
    }

    if lexeme.ends_with('i') {
        TokenKind::ImaginaryLiteral(lexeme)
    } else if lexeme.contains('.')
        || (!hex && lexeme.contains(|c| c == 'e' || c == 'E'))
        || (hex && lexeme.contains(|c| c == 'p' || c == 'P'))
    {
        TokenKind::FloatLiteral(lexeme)
    } else {
        TokenKind::IntLiteral(lexeme)
    }
}

fn lex_quoted(stream: &mut CharStream, quote: char) -> String {
    let mut lexeme = String::new();
    lexeme.push(stream.bump());

    while !stream.at_end() {
        match stream.peek(0) {
            '\n' => break,
            '\\' => {
                lexeme.push(stream.bump());
                if !stream.at_end() {
                    lexeme.push(stream.bump());
                }
            }
            c if c == quote => {
                lexeme.push(stream.bump());
                break;
            }
            _ => lexeme.push(stream.bump()),
        }
    }

    lexeme
}

fn lex_operator(stream: &mut CharStream) -> TokenKind {
    use TokenKind::*;

    let three = (stream.peek(0), stream.peek(1), stream.peek(2));
    let kind = match three {
        ('<', '<', '=') => Some(ShiftLeftAssign),
        ('>', '>', '=') => Some(ShiftRightAssign),
        ('&', '^', '=') => Some(AndNotAssign),
        ('.', '.', '.') => Some(Ellipsis),
        _ => None,
    };
    if let Some(kind) = kind {
        stream.offset += 3;
        return kind;
    }

    let kind = match (three.0, three.1) {
        ('<', '<') => Some(ShiftLeft),
        ('>', '>') => Some(ShiftRight),
        ('&', '^') => Some(AndNot),
        ('+', '=') => Some(PlusAssign),
        ('-', '=') => Some(MinusAssign),
        ('*', '=') => Some(AsteriskAssign),
        ('/', '=') => Some(SlashAssign),
        ('%', '=') => Some(PercentAssign),
        ('&', '=') => Some(AmpersandAssign),
        ('|', '=') => Some(PipeAssign),
        ('^', '=') => Some(CaretAssign),
        ('&', '&') => Some(LogicalAnd),
        ('|', '|') => Some(LogicalOr),
        ('<', '-') => Some(Arrow),
        ('+', '+') => Some(Increment),
        ('-', '-') => Some(Decrement),
        ('=', '=') => Some(DoubleEqual),
        ('!', '=') => Some(NotEqual),
        ('<', '=') => Some(LessEqual),
        ('>', '=') => Some(GreaterEqual),
        (':', '=') => Some(ColonEqual),
        _ => None,
    };
    if let Some(kind) = kind {
        stream.offset += 2;
        return kind;
    }

    match stream.bump() {
        '+' => Plus,
        '-' => Minus,
        '*' => Asterisk,
        '/' => Slash,
        '%' => Percent,
        '&' => Ampersand,
        '|' => Pipe,
        '^' => Caret,
        '<' => OpenAngle,
        '>' => CloseAngle,
        '=' => EqualSign,
        '!' => Bang,
        '(' => OpenParen,
        ')' => CloseParen,
        '[' => OpenBracket,
        ']' => CloseBracket,
        '{' => OpenCurly,
        '}' => CloseCurly,
        ',' => Comma,
        '.' => Period,
        ';' => Semicolon,
        ':' => Colon,
        c => Unknown(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    fn significant(code: &str) -> Vec<TokenKind> {
        tokenize(Source::test(code))
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn empty_source() {
        let tokens = tokenize(Source::test(""));

        assert_eq!(tokens.len(), 1);
        assert_matches!(tokens[0].kind, TokenKind::EOF);
    }

    #[test]
    fn only_whitespace() {
        let tokens = tokenize(Source::test("  "));

        assert_eq!(tokens.len(), 2);
        assert_matches!(tokens[0].kind, TokenKind::Whitespace(ref s) if s == "  ");
    }

    #[test]
    fn line_comment() {
        let tokens = tokenize(Source::test("  // line comment here\n  "));

        assert_eq!(tokens.len(), 4);
        assert_matches!(tokens[1].kind, TokenKind::LineComment(ref s) if s == " line comment here");
        assert_eq!(tokens[1].span.start.offset, 2);
        assert_eq!(tokens[1].span.end.offset, 22);
        assert_matches!(tokens[2].kind, TokenKind::Whitespace(ref s) if s == "\n  ");
        assert_eq!(tokens[2].span.start.offset, 22);
        assert_eq!(tokens[2].span.end.offset, 25);
    }

    #[test]
    fn selector_call() {
        use TokenKind::*;

        assert_eq!(
            significant("runtime.GOMAXPROCS(512)"),
            vec![
                Identifier("runtime".into()),
                Period,
                Identifier("GOMAXPROCS".into()),
                OpenParen,
                IntLiteral("512".into()),
                CloseParen,
                ImplicitSemicolon,
                EOF,
            ]
        );
    }

    #[test]
    fn semicolons_are_inserted_at_line_ends() {
        use TokenKind::*;

        assert_eq!(
            significant("n := 300\nf(n)\n"),
            vec![
                Identifier("n".into()),
                ColonEqual,
                IntLiteral("300".into()),
                ImplicitSemicolon,
                Identifier("f".into()),
                OpenParen,
                Identifier("n".into()),
                CloseParen,
                ImplicitSemicolon,
                EOF,
            ]
        );
    }

    #[test]
    fn no_semicolon_after_operator() {
        use TokenKind::*;

        assert_eq!(
            significant("a +\nb"),
            vec![
                Identifier("a".into()),
                Plus,
                Identifier("b".into()),
                ImplicitSemicolon,
                EOF,
            ]
        );
    }

    #[test]
    fn number_literals() {
        use TokenKind::*;

        assert_eq!(
            significant("0x200 1_000 1.5 1e9 0x1p-2 2i"),
            vec![
                IntLiteral("0x200".into()),
                IntLiteral("1_000".into()),
                FloatLiteral("1.5".into()),
                FloatLiteral("1e9".into()),
                FloatLiteral("0x1p-2".into()),
                ImaginaryLiteral("2i".into()),
                ImplicitSemicolon,
                EOF,
            ]
        );
    }

    #[test]
    fn strings_and_runes() {
        use TokenKind::*;

        assert_eq!(
            significant(r#""a\"b" 'x' `raw`"#),
            vec![
                StringLiteral(r#""a\"b""#.into()),
                RuneLiteral("'x'".into()),
                StringLiteral("`raw`".into()),
                ImplicitSemicolon,
                EOF,
            ]
        );
    }

    #[test]
    fn longest_operator_wins() {
        use TokenKind::*;

        assert_eq!(
            significant("a &^= b <<= c ... :="),
            vec![
                Identifier("a".into()),
                AndNotAssign,
                Identifier("b".into()),
                ShiftLeftAssign,
                Identifier("c".into()),
                Ellipsis,
                ColonEqual,
                EOF,
            ]
        );
    }

    #[test]
    fn keywords() {
        use TokenKind::*;

        assert_eq!(
            significant("package main"),
            vec![
                PackageKeyword,
                Identifier("main".into()),
                ImplicitSemicolon,
                EOF
            ]
        );
    }
}
