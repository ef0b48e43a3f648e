use super::{Operator, Val};
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

const TOLERANCE: f64 = 0.0001;

pub struct Operation {}

impl Operation {
    pub fn apply(op: Operator, lhs: Val, rhs: Val) -> Result<Val> {
        use Operator::*;
        match op {
            Add => Operation::sum(lhs, rhs),
            Sub => Operation::subtract(lhs, rhs),
            Mul => Operation::multiply(lhs, rhs),
            Div => Operation::divide(lhs, rhs),
            Mod => Operation::modulo(lhs, rhs),
            Equal => Ok(Operation::equal(&lhs, &rhs)?.into()),
            NotEqual => Ok((!Operation::equal(&lhs, &rhs)?).into()),
            Greater => Ok((Operation::order(&lhs, &rhs)? == Some(Ordering::Greater)).into()),
            Less => Ok((Operation::order(&lhs, &rhs)? == Some(Ordering::Less)).into()),
            GreaterEqual => Ok(matches!(
                Operation::order(&lhs, &rhs)?,
                Some(Ordering::Greater) | Some(Ordering::Equal)
            )
            .into()),
            LessEqual => Ok(matches!(
                Operation::order(&lhs, &rhs)?,
                Some(Ordering::Less) | Some(Ordering::Equal)
            )
            .into()),
            And => Ok((lhs.is_truthy() && rhs.coerce(lhs.kind())?.is_truthy()).into()),
            Or => Ok((lhs.is_truthy() || rhs.coerce(lhs.kind())?.is_truthy()).into()),
            End => Err(error!(InternalError; "END IS NOT A BINARY OPERATOR")),
        }
    }

    /// Two-phase reduction of an inline expression.
    ///
    /// Every `*` and `/` is folded into the operand on its right, leaving
    /// a zero and a `+` behind. What remains is reduced strictly left to
    /// right, so `2 + 3 * 4` is 14 and `10 - 2 - 3` is 5.
    pub fn reduce(mut operands: Vec<Val>, mut operators: Vec<Operator>) -> Result<Val> {
        if operands.len() != operators.len() + 1 {
            return Err(error!(InternalError; "MALFORMED EXPRESSION"));
        }
        for i in 0..operators.len() {
            if operators[i].is_multiplicative() {
                let lhs = std::mem::take(&mut operands[i]);
                let rhs = std::mem::take(&mut operands[i + 1]);
                let product = Operation::apply(operators[i], lhs, rhs)?;
                operands[i] = product.kind().zero();
                operands[i + 1] = product;
                operators[i] = Operator::Add;
            }
        }
        let mut operands = operands.into_iter();
        let mut acc = match operands.next() {
            Some(val) => val,
            None => return Err(error!(InternalError; "EMPTY EXPRESSION")),
        };
        for (op, rhs) in operators.into_iter().zip(operands) {
            acc = Operation::apply(op, acc, rhs)?;
        }
        Ok(acc)
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match lhs {
            Integer(l) => Ok(Integer(l.wrapping_add(rhs.to_integer()?))),
            Float(l) => Ok(Float(l + rhs.to_float()?)),
            Double(l) => Ok(Double(l + rhs.to_double()?)),
            String(l) => Ok(String(format!("{}{}", l, rhs.to_text()).into())),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match lhs {
            Integer(l) => Ok(Integer(l.wrapping_sub(rhs.to_integer()?))),
            Float(l) => Ok(Float(l - rhs.to_float()?)),
            Double(l) => Ok(Double(l - rhs.to_double()?)),
            String(_) => Ok(lhs),
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match lhs {
            Integer(l) => Ok(Integer(l.wrapping_mul(rhs.to_integer()?))),
            Float(l) => Ok(Float(l * rhs.to_float()?)),
            Double(l) => Ok(Double(l * rhs.to_double()?)),
            String(_) => Ok(lhs),
        }
    }

    /// Division by zero leaves the dividend unchanged.
    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match lhs {
            Integer(l) => match rhs.to_integer()? {
                0 => Ok(lhs),
                r => Ok(Integer(l.wrapping_div(r))),
            },
            Float(l) => {
                let r = rhs.to_float()?;
                if r == 0.0 {
                    Ok(lhs)
                } else {
                    Ok(Float(l / r))
                }
            }
            Double(l) => {
                let r = rhs.to_double()?;
                if r == 0.0 {
                    Ok(lhs)
                } else {
                    Ok(Double(l / r))
                }
            }
            String(_) => Ok(lhs),
        }
    }

    pub fn modulo(lhs: Val, rhs: Val) -> Result<Val> {
        match lhs {
            Val::Integer(l) => match rhs.to_integer()? {
                0 => Ok(lhs),
                r => Ok(Val::Integer(l.wrapping_rem(r))),
            },
            _ => Ok(lhs),
        }
    }

    pub fn increment(val: Val) -> Val {
        match val {
            Val::Integer(n) => Val::Integer(n.wrapping_add(1)),
            _ => val,
        }
    }

    pub fn decrement(val: Val) -> Val {
        match val {
            Val::Integer(n) => Val::Integer(n.wrapping_sub(1)),
            _ => val,
        }
    }

    pub fn equal(lhs: &Val, rhs: &Val) -> Result<bool> {
        use Val::*;
        match lhs {
            Integer(l) => Ok(*l == rhs.to_integer()?),
            Float(l) => Ok(((*l as f64) - (rhs.to_float()? as f64)).abs() < TOLERANCE),
            Double(l) => Ok((l - rhs.to_double()?).abs() < TOLERANCE),
            String(l) => Ok(fold(l).eq(fold(&rhs.to_text()))),
        }
    }

    /// Equality that also requires both values to be of the same kind.
    pub fn matches(lhs: &Val, rhs: &Val) -> Result<bool> {
        if lhs.kind() != rhs.kind() {
            return Ok(false);
        }
        Operation::equal(lhs, rhs)
    }

    fn order(lhs: &Val, rhs: &Val) -> Result<Option<Ordering>> {
        use Val::*;
        match lhs {
            Integer(l) => Ok(Some(l.cmp(&rhs.to_integer()?))),
            Float(l) => Ok(l.partial_cmp(&rhs.to_float()?)),
            Double(l) => Ok(l.partial_cmp(&rhs.to_double()?)),
            String(l) => Ok(Some(fold(l).cmp(fold(&rhs.to_text())))),
        }
    }
}

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_uppercase)
}
