//! The closed set of primitive value kinds.

use std::fmt;

/// Primitive kind of a host value, as reported by a `typeof` check.
///
/// Exactly eight kinds exist. Arrays, dates, typed-array views and other
/// host objects all classify as [`Primitive::Object`] (or
/// [`Primitive::Function`] when callable); their finer identity lives in
/// the constructor tag instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// The absent value.
    Undefined,
    /// `true` / `false`.
    Boolean,
    /// IEEE-754 double.
    Number,
    /// Text.
    String,
    /// Any non-callable object, including `null`.
    Object,
    /// Arbitrary-precision integer.
    BigInt,
    /// Unique symbol with an optional description.
    Symbol,
    /// Callable object.
    Function,
}

impl Primitive {
    /// All eight kinds in registration order.
    pub const ALL: [Primitive; 8] = [
        Self::Undefined,
        Self::Boolean,
        Self::Number,
        Self::String,
        Self::Object,
        Self::BigInt,
        Self::Symbol,
        Self::Function,
    ];

    /// Lower-case `typeof` name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Function => "function",
        }
    }

    /// Whether values of this kind are references rather than plain data.
    pub const fn is_object_like(self) -> bool {
        matches!(self, Self::Object | Self::Function)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_distinct() {
        let mut names: Vec<_> = Primitive::ALL.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn only_object_and_function_are_object_like() {
        let object_like: Vec<_> = Primitive::ALL
            .into_iter()
            .filter(|p| p.is_object_like())
            .collect();
        assert_eq!(object_like, vec![Primitive::Object, Primitive::Function]);
    }
}
