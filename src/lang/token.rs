/// Reserved command words. These are entered into every symbol table at
/// startup and can only be aliased, never replaced.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Word {
    Block,
    End,
    Var,
    If,
    Elseif,
    Else,
    Endif,
    Declare,
    Define,
    Choose,
    Case,
    Break,
    Default,
    Endchoose,
    Defcmd,
    While,
    Endwhile,
    Exitwhile,
}

impl Word {
    pub fn all() -> &'static [Word] {
        use Word::*;
        &[
            Block, End, Var, If, Elseif, Else, Endif, Declare, Define, Choose, Case, Break,
            Default, Endchoose, Defcmd, While, Endwhile, Exitwhile,
        ]
    }

    pub fn as_str(self) -> &'static str {
        use Word::*;
        match self {
            Block => "__block",
            End => "end",
            Var => "var",
            If => "if",
            Elseif => "elseif",
            Else => "else",
            Endif => "endif",
            Declare => "declare",
            Define => "define",
            Choose => "choose",
            Case => "case",
            Break => "break",
            Default => "default",
            Endchoose => "endchoose",
            Defcmd => "defcmd",
            While => "while",
            Endwhile => "endwhile",
            Exitwhile => "exitwhile",
        }
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
