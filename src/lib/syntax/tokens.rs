use crate::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    EOF,
    Unknown(char),
    Whitespace(String),
    LineComment(String),
    BlockComment(String),

    /// Inserted by the lexer at the end of a line (or the file)
    /// where Go would insert a semicolon. Has an empty lexeme.
    ImplicitSemicolon,

    BreakKeyword,
    CaseKeyword,
    ChanKeyword,
    ConstKeyword,
    ContinueKeyword,
    DefaultKeyword,
    DeferKeyword,
    ElseKeyword,
    FallthroughKeyword,
    ForKeyword,
    FuncKeyword,
    GoKeyword,
    GotoKeyword,
    IfKeyword,
    ImportKeyword,
    InterfaceKeyword,
    MapKeyword,
    PackageKeyword,
    RangeKeyword,
    ReturnKeyword,
    SelectKeyword,
    StructKeyword,
    SwitchKeyword,
    TypeKeyword,
    VarKeyword,

    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    ShiftLeft,
    ShiftRight,
    AndNot,

    PlusAssign,
    MinusAssign,
    AsteriskAssign,
    SlashAssign,
    PercentAssign,
    AmpersandAssign,
    PipeAssign,
    CaretAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    AndNotAssign,

    LogicalAnd,
    LogicalOr,
    Arrow,
    Increment,
    Decrement,
    DoubleEqual,
    OpenAngle,
    CloseAngle,
    EqualSign,
    Bang,
    NotEqual,
    LessEqual,
    GreaterEqual,
    ColonEqual,
    Ellipsis,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    Comma,
    Period,
    Semicolon,
    Colon,

    Identifier(String),
    IntLiteral(String),
    FloatLiteral(String),
    ImaginaryLiteral(String),
    RuneLiteral(String),
    StringLiteral(String),
}

impl TokenKind {
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        use TokenKind::*;

        Some(match lexeme {
            "break" => BreakKeyword,
            "case" => CaseKeyword,
            "chan" => ChanKeyword,
            "const" => ConstKeyword,
            "continue" => ContinueKeyword,
            "default" => DefaultKeyword,
            "defer" => DeferKeyword,
            "else" => ElseKeyword,
            "fallthrough" => FallthroughKeyword,
            "for" => ForKeyword,
            "func" => FuncKeyword,
            "go" => GoKeyword,
            "goto" => GotoKeyword,
            "if" => IfKeyword,
            "import" => ImportKeyword,
            "interface" => InterfaceKeyword,
            "map" => MapKeyword,
            "package" => PackageKeyword,
            "range" => RangeKeyword,
            "return" => ReturnKeyword,
            "select" => SelectKeyword,
            "struct" => StructKeyword,
            "switch" => SwitchKeyword,
            "type" => TypeKeyword,
            "var" => VarKeyword,
            _ => return None,
        })
    }

    /// Whether a newline directly after a token of this
    /// kind terminates the statement.
    pub fn ends_statement(&self) -> bool {
        use TokenKind::*;

        matches!(
            self,
            Identifier(_)
                | IntLiteral(_)
                | FloatLiteral(_)
                | ImaginaryLiteral(_)
                | RuneLiteral(_)
                | StringLiteral(_)
                | BreakKeyword
                | ContinueKeyword
                | FallthroughKeyword
                | ReturnKeyword
                | Increment
                | Decrement
                | CloseParen
                | CloseBracket
                | CloseCurly
        )
    }

    pub fn is_trivia(&self) -> bool {
        use TokenKind::*;

        matches!(self, Whitespace(_) | LineComment(_) | BlockComment(_))
    }

    pub fn is_assign_operator(&self) -> bool {
        use TokenKind::*;

        matches!(
            self,
            EqualSign
                | PlusAssign
                | MinusAssign
                | AsteriskAssign
                | SlashAssign
                | PercentAssign
                | AmpersandAssign
                | PipeAssign
                | CaretAssign
                | ShiftLeftAssign
                | ShiftRightAssign
                | AndNotAssign
        )
    }

    /// Binary operator precedence, as defined by the Go spec.
    pub fn binary_precedence(&self) -> Option<u8> {
        use TokenKind::*;

        match self {
            LogicalOr => Some(1),
            LogicalAnd => Some(2),
            DoubleEqual | NotEqual | OpenAngle | LessEqual | CloseAngle | GreaterEqual => Some(3),
            Plus | Minus | Pipe | Caret => Some(4),
            Asterisk | Slash | Percent | ShiftLeft | ShiftRight | Ampersand | AndNot => Some(5),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn lexeme(&self) -> String {
        use TokenKind::*;

        match &self.kind {
            EOF | ImplicitSemicolon => "".into(),
            Unknown(c) => c.to_string(),

            BreakKeyword => "break".into(),
            CaseKeyword => "case".into(),
            ChanKeyword => "chan".into(),
            ConstKeyword => "const".into(),
            ContinueKeyword => "continue".into(),
            DefaultKeyword => "default".into(),
            DeferKeyword => "defer".into(),
            ElseKeyword => "else".into(),
            FallthroughKeyword => "fallthrough".into(),
            ForKeyword => "for".into(),
            FuncKeyword => "func".into(),
            GoKeyword => "go".into(),
            GotoKeyword => "goto".into(),
            IfKeyword => "if".into(),
            ImportKeyword => "import".into(),
            InterfaceKeyword => "interface".into(),
            MapKeyword => "map".into(),
            PackageKeyword => "package".into(),
            RangeKeyword => "range".into(),
            ReturnKeyword => "return".into(),
            SelectKeyword => "select".into(),
            StructKeyword => "struct".into(),
            SwitchKeyword => "switch".into(),
            TypeKeyword => "type".into(),
            VarKeyword => "var".into(),

            Plus => "+".into(),
            Minus => "-".into(),
            Asterisk => "*".into(),
            Slash => "/".into(),
            Percent => "%".into(),
            Ampersand => "&".into(),
            Pipe => "|".into(),
            Caret => "^".into(),
            ShiftLeft => "<<".into(),
            ShiftRight => ">>".into(),
            AndNot => "&^".into(),

            PlusAssign => "+=".into(),
            MinusAssign => "-=".into(),
            AsteriskAssign => "*=".into(),
            SlashAssign => "/=".into(),
            PercentAssign => "%=".into(),
            AmpersandAssign => "&=".into(),
            PipeAssign => "|=".into(),
            CaretAssign => "^=".into(),
            ShiftLeftAssign => "<<=".into(),
            ShiftRightAssign => ">>=".into(),
            AndNotAssign => "&^=".into(),

            LogicalAnd => "&&".into(),
            LogicalOr => "||".into(),
            Arrow => "<-".into(),
            Increment => "++".into(),
            Decrement => "--".into(),
            DoubleEqual => "==".into(),
            OpenAngle => "<".into(),
            CloseAngle => ">".into(),
            EqualSign => "=".into(),
            Bang => "!".into(),
            NotEqual => "!=".into(),
            LessEqual => "<=".into(),
            GreaterEqual => ">=".into(),
            ColonEqual => ":=".into(),
            Ellipsis => "...".into(),

            OpenParen => "(".into(),
            CloseParen => ")".into(),
            OpenBracket => "[".into(),
            CloseBracket => "]".into(),
            OpenCurly => "{".into(),
            CloseCurly => "}".into(),
            Comma => ",".into(),
            Period => ".".into(),
            Semicolon => ";".into(),
            Colon => ":".into(),

            LineComment(s) => format!("//{}", s),
            BlockComment(s) => format!("/*{}*/", s),

            Whitespace(s) | Identifier(s) | IntLiteral(s) | FloatLiteral(s)
            | ImaginaryLiteral(s) | RuneLiteral(s) | StringLiteral(s) => s.clone(),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.kind.fmt(f)
    }
}
