//! Operator precedence table
//!
//! | prec | operators               | assoc |
//! |------|-------------------------|-------|
//! | 1    | `\|\|`                  | left  |
//! | 2    | `&&`                    | left  |
//! | 3    | `==` `!=`               | left  |
//! | 4    | `<` `<=` `>` `>=`       | left  |
//! | 5    | `\|`                    | left  |
//! | 6    | `^`                     | left  |
//! | 7    | `&`                     | left  |
//! | 8    | `<<` `>>`               | left  |
//! | 9    | `+` `-`                 | left  |
//! | 10   | `*` `/` `%`             | left  |
//! | 11   | prefix `-` `+` `!` `~`  |       |
//! | 12   | `**`                    | right |
//!
//! Type expressions have their own, smaller table: `->` (1, right),
//! `|` (2, left), `&` (3, left).

use crate::lexeme::Lexeme;

/// Precedence of every prefix operator
pub const PREFIX_PRECEDENCE: u8 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// How tightly a binary operator binds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingPower {
    pub precedence: u8,
    pub associativity: Associativity,
}

impl BindingPower {
    pub const fn left_assoc(precedence: u8) -> Self {
        Self {
            precedence,
            associativity: Associativity::Left,
        }
    }

    pub const fn right_assoc(precedence: u8) -> Self {
        Self {
            precedence,
            associativity: Associativity::Right,
        }
    }

    /// Whether the operator may extend an expression parsed at `floor`
    pub fn binds_at(&self, floor: u8) -> bool {
        self.precedence >= floor
    }

    /// Floor used for the right operand
    pub fn rhs_floor(&self) -> u8 {
        match self.associativity {
            Associativity::Left => self.precedence + 1,
            Associativity::Right => self.precedence,
        }
    }
}

/// Binding power of a binary expression operator
pub fn binary(lexeme: Lexeme) -> Option<BindingPower> {
    let power = match lexeme {
        Lexeme::LogicalOr => BindingPower::left_assoc(1),
        Lexeme::LogicalAnd => BindingPower::left_assoc(2),
        Lexeme::Equal | Lexeme::NotEqual => BindingPower::left_assoc(3),
        Lexeme::Less | Lexeme::LessEqual | Lexeme::Greater | Lexeme::GreaterEqual => {
            BindingPower::left_assoc(4)
        }
        Lexeme::Pipe => BindingPower::left_assoc(5),
        Lexeme::Caret => BindingPower::left_assoc(6),
        Lexeme::Ampersand => BindingPower::left_assoc(7),
        Lexeme::ShiftLeft | Lexeme::ShiftRight => BindingPower::left_assoc(8),
        Lexeme::Plus | Lexeme::Minus => BindingPower::left_assoc(9),
        Lexeme::Star | Lexeme::Slash | Lexeme::Percent => BindingPower::left_assoc(10),
        Lexeme::StarStar => BindingPower::right_assoc(12),
        _ => return None,
    };
    Some(power)
}

/// Binding power of a binary type operator
pub fn type_binary(lexeme: Lexeme) -> Option<BindingPower> {
    match lexeme {
        Lexeme::Arrow => Some(BindingPower::right_assoc(1)),
        Lexeme::Pipe => Some(BindingPower::left_assoc(2)),
        Lexeme::Ampersand => Some(BindingPower::left_assoc(3)),
        _ => None,
    }
}

pub fn is_prefix(lexeme: Lexeme) -> bool {
    matches!(
        lexeme,
        Lexeme::Minus | Lexeme::Plus | Lexeme::Bang | Lexeme::Tilde
    )
}

/// Statement-level assignment operators
pub fn is_assignment(lexeme: Lexeme) -> bool {
    matches!(
        lexeme,
        Lexeme::Assign
            | Lexeme::AddAssign
            | Lexeme::SubAssign
            | Lexeme::MulAssign
            | Lexeme::DivAssign
            | Lexeme::ModAssign
            | Lexeme::PowAssign
            | Lexeme::AndAssign
            | Lexeme::OrAssign
            | Lexeme::XorAssign
            | Lexeme::ShlAssign
            | Lexeme::ShrAssign
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_assoc_raises_rhs_floor() {
        let plus = binary(Lexeme::Plus).unwrap();
        assert_eq!(plus.rhs_floor(), 10);
        assert!(!plus.binds_at(plus.rhs_floor()));
    }

    #[test]
    fn test_power_is_right_assoc() {
        let pow = binary(Lexeme::StarStar).unwrap();
        assert_eq!(pow.associativity, Associativity::Right);
        assert!(pow.binds_at(pow.rhs_floor()));
        assert!(pow.precedence > PREFIX_PRECEDENCE);
    }

    #[test]
    fn test_tables_are_disjoint_from_assignment() {
        assert!(binary(Lexeme::Assign).is_none());
        assert!(is_assignment(Lexeme::ShrAssign));
        assert!(!is_assignment(Lexeme::Equal));
        assert_eq!(type_binary(Lexeme::Arrow).map(|p| p.precedence), Some(1));
    }
}
