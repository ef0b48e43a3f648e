use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Tagged value
///
/// Every script value is one of four kinds. Arithmetic and comparison
/// dispatch on the kind of the left operand; the right operand goes
/// through one of the fallible coercions below.

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Integer(i64),
    String(Rc<str>),
    Float(f32),
    Double(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    String,
    Float,
    Double,
}

impl Kind {
    pub fn zero(self) -> Val {
        match self {
            Kind::Integer => Val::Integer(0),
            Kind::String => Val::String("".into()),
            Kind::Float => Val::Float(0.0),
            Kind::Double => Val::Double(0.0),
        }
    }
}

impl Default for Val {
    fn default() -> Self {
        Val::Integer(0)
    }
}

impl Val {
    pub fn kind(&self) -> Kind {
        match self {
            Val::Integer(_) => Kind::Integer,
            Val::String(_) => Kind::String,
            Val::Float(_) => Kind::Float,
            Val::Double(_) => Kind::Double,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Val::Integer(n) => *n != 0,
            Val::String(s) => !s.is_empty(),
            Val::Float(n) => *n != 0.0,
            Val::Double(n) => *n != 0.0,
        }
    }

    /// A blank string reads as -1, which scripts use as "no value".
    pub fn to_integer(&self) -> Result<i64> {
        match self {
            Val::Integer(n) => Ok(*n),
            Val::Float(n) => Ok(*n as i64),
            Val::Double(n) => Ok(*n as i64),
            Val::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(-1);
                }
                match s.parse::<i64>() {
                    Ok(n) => Ok(n),
                    Err(_) => match s.parse::<f64>() {
                        Ok(n) if n.is_finite() => Ok(n as i64),
                        _ => Err(error!(TypeMismatch; "[{}] IS NOT A NUMBER", s)),
                    },
                }
            }
        }
    }

    pub fn to_float(&self) -> Result<f32> {
        match self {
            Val::Integer(n) => Ok(*n as f32),
            Val::Float(n) => Ok(*n),
            Val::Double(n) => Ok(*n as f32),
            Val::String(s) => match s.trim().parse::<f32>() {
                Ok(n) => Ok(n),
                Err(_) => Err(error!(TypeMismatch; "[{}] IS NOT A NUMBER", s)),
            },
        }
    }

    pub fn to_double(&self) -> Result<f64> {
        match self {
            Val::Integer(n) => Ok(*n as f64),
            Val::Float(n) => Ok(*n as f64),
            Val::Double(n) => Ok(*n),
            Val::String(s) => match s.trim().parse::<f64>() {
                Ok(n) => Ok(n),
                Err(_) => Err(error!(TypeMismatch; "[{}] IS NOT A NUMBER", s)),
            },
        }
    }

    pub fn to_text(&self) -> Rc<str> {
        match self {
            Val::String(s) => s.clone(),
            _ => self.to_string().into(),
        }
    }

    pub fn coerce(&self, kind: Kind) -> Result<Val> {
        Ok(match kind {
            Kind::Integer => Val::Integer(self.to_integer()?),
            Kind::String => Val::String(self.to_text()),
            Kind::Float => Val::Float(self.to_float()?),
            Kind::Double => Val::Double(self.to_double()?),
        })
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Integer(n) => write!(f, "{}", n),
            Val::String(s) => write!(f, "{}", s),
            Val::Float(n) => write!(f, "{}", n),
            Val::Double(n) => write!(f, "{}", n),
        }
    }
}

impl From<i64> for Val {
    fn from(n: i64) -> Self {
        Val::Integer(n)
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Integer(if b { 1 } else { 0 })
    }
}

impl From<f32> for Val {
    fn from(n: f32) -> Self {
        Val::Float(n)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Double(n)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::String(s.into())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::String(s.into())
    }
}
