use std::fmt::{Display, Formatter};
use std::str::FromStr;

use gpui::SharedString;
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// Keys of one level of the value tree, kept in insertion order.
pub type FormMap = IndexMap<String, FormValue>;

/// A node of the form value tree.
///
/// Only [`FormValue::Map`] is ever descended into by path operations; every
/// other variant, lists included, is a leaf.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FormValue {
    #[default]
    Null,
    Bool(bool),
    Number(Decimal),
    Text(SharedString),
    List(Vec<FormValue>),
    Map(FormMap),
}

impl FormValue {
    pub fn map() -> Self {
        Self::Map(FormMap::new())
    }

    /// Converts a float the way number inputs report it. Non-finite input
    /// becomes `Null`.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::Null;
        }
        Decimal::from_str(&format!("{value:.18}"))
            .map(|number| Self::Number(number.normalize()))
            .unwrap_or(Self::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FormValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FormMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut FormMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether the value counts as filled in. `false` and `0` are present;
    /// null, blank text and empty collections are not.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(_) | Self::Number(_) => true,
            Self::Text(text) => !text.as_ref().trim().is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Map(map) => !map.is_empty(),
        }
    }
}

impl Display for FormValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value.as_ref()),
            Self::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (index, (key, value)) in map.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Decimal> for FormValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FormValue {
                fn from(value: $ty) -> Self {
                    Self::Number(Decimal::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<SharedString> for FormValue {
    fn from(value: SharedString) -> Self {
        Self::Text(value)
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned().into())
    }
}

impl From<FormMap> for FormValue {
    fn from(value: FormMap) -> Self {
        Self::Map(value)
    }
}

impl<T> From<Vec<T>> for FormValue
where
    T: Into<FormValue>,
{
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for FormValue
where
    T: Into<FormValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
