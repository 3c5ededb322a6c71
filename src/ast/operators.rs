use std::fmt;

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
}

impl LogicalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Regex match (`=~`)
    Matches,
    /// Regex non-match (`!~`)
    NotMatches,
    /// Membership (`in`)
    In,
}

impl Comparator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterEqual => ">=",
            Comparator::LessThan => "<",
            Comparator::LessEqual => "<=",
            Comparator::Matches => "=~",
            Comparator::NotMatches => "!~",
            Comparator::In => "in",
        }
    }

    /// Regex comparators turn the following string literal into a pattern.
    pub fn is_regex(&self) -> bool {
        matches!(self, Comparator::Matches | Comparator::NotMatches)
    }
}

/// Infix arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Modulus (`%`)
    Modulus,
    /// Exponentiation (`**`)
    Exponent,
    /// Bitwise AND (`&`)
    BitwiseAnd,
    /// Bitwise OR (`|`)
    BitwiseOr,
    /// Bitwise XOR (`^`)
    BitwiseXor,
    /// Left shift (`<<`)
    ShiftLeft,
    /// Right shift (`>>`)
    ShiftRight,
}

impl Modifier {
    pub fn symbol(&self) -> &'static str {
        match self {
            Modifier::Add => "+",
            Modifier::Subtract => "-",
            Modifier::Multiply => "*",
            Modifier::Divide => "/",
            Modifier::Modulus => "%",
            Modifier::Exponent => "**",
            Modifier::BitwiseAnd => "&",
            Modifier::BitwiseOr => "|",
            Modifier::BitwiseXor => "^",
            Modifier::ShiftLeft => "<<",
            Modifier::ShiftRight => ">>",
        }
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// Numeric negation (`-`)
    Negate,
    /// Logical NOT (`!`)
    Invert,
    /// Bitwise NOT (`~`)
    BitwiseNot,
}

impl PrefixOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            PrefixOp::Negate => "-",
            PrefixOp::Invert => "!",
            PrefixOp::BitwiseNot => "~",
        }
    }
}

/// Ternary and null-coalescing operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TernaryOp {
    /// Then-branch (`?`)
    TernaryTrue,
    /// Else-branch (`:`)
    TernaryFalse,
    /// Null-coalescing (`??`)
    Coalesce,
}

impl TernaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            TernaryOp::TernaryTrue => "?",
            TernaryOp::TernaryFalse => ":",
            TernaryOp::Coalesce => "??",
        }
    }
}

macro_rules! display_symbol {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.symbol())
                }
            }
        )*
    };
}

display_symbol!(LogicalOp, Comparator, Modifier, PrefixOp, TernaryOp);

/// The operation a stage applies to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSymbol {
    /// Leaf: a literal or a variable lookup
    Value,
    /// Grouping only; the stage's value is its right child
    Noop,
    Logical(LogicalOp),
    Comparator(Comparator),
    Modifier(Modifier),
    Prefix(PrefixOp),
    Ternary(TernaryOp),
    /// Function call; arguments hang off the right child
    Functional,
    /// Argument separator (`,`), builds arrays
    Separate,
}
