//! Structural descriptions of requested value shapes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WILDCARD_ID: AtomicU64 = AtomicU64::new(1);

/// A structural description of what shape of value is wanted.
///
/// An identifier is a base shape plus zero or more ordered parameter
/// shapes (`vec<i32>`, `map<string, i64>`). Equality and hashing are
/// structural and recursive, which makes registry lookups behave as value
/// lookups. A wildcard identifier is a query placeholder: it is equal only
/// to itself, never structurally matches anything, and is replaced by a
/// concrete identifier via [`TypeIdentifier::substitute`].
#[derive(Debug, Clone, Eq)]
pub struct TypeIdentifier {
    base: String,
    params: Vec<TypeIdentifier>,
    // Non-zero for wildcards; each wildcard() call mints a fresh identity.
    wildcard_id: u64,
}

impl TypeIdentifier {
    /// A non-parametrized shape.
    pub fn of(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            params: Vec::new(),
            wildcard_id: 0,
        }
    }

    /// A shape parametrized by other shapes.
    pub fn parameterized(base: impl Into<String>, params: Vec<TypeIdentifier>) -> Self {
        Self {
            base: base.into(),
            params,
            wildcard_id: 0,
        }
    }

    /// A fresh wildcard placeholder, equal only to itself.
    pub fn wildcard() -> Self {
        Self {
            base: String::from("_"),
            params: Vec::new(),
            wildcard_id: NEXT_WILDCARD_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The base shape name.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The ordered parameter shapes.
    pub fn params(&self) -> &[TypeIdentifier] {
        &self.params
    }

    /// Whether this identifier is a wildcard placeholder.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard_id != 0
    }

    /// Walk the identifier tree and replace every wildcard with `concrete`.
    pub fn substitute(&self, concrete: &TypeIdentifier) -> TypeIdentifier {
        if self.is_wildcard() {
            return concrete.clone();
        }
        TypeIdentifier {
            base: self.base.clone(),
            params: self
                .params
                .iter()
                .map(|param| param.substitute(concrete))
                .collect(),
            wildcard_id: 0,
        }
    }
}

impl PartialEq for TypeIdentifier {
    fn eq(&self, other: &Self) -> bool {
        if self.wildcard_id != 0 || other.wildcard_id != 0 {
            return self.wildcard_id == other.wildcard_id;
        }
        self.base == other.base && self.params == other.params
    }
}

impl Hash for TypeIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.wildcard_id.hash(state);
        if self.wildcard_id == 0 {
            self.base.hash(state);
            self.params.hash(state);
        }
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if !self.params.is_empty() {
            write!(f, "<")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", param)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = TypeIdentifier::parameterized("vec", vec![TypeIdentifier::of("i32")]);
        let b = TypeIdentifier::parameterized("vec", vec![TypeIdentifier::of("i32")]);
        let c = TypeIdentifier::parameterized("vec", vec![TypeIdentifier::of("i64")]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, TypeIdentifier::of("vec"));
    }

    #[test]
    fn test_equality_is_recursive() {
        let nested = |inner: &str| {
            TypeIdentifier::parameterized(
                "map",
                vec![
                    TypeIdentifier::of("string"),
                    TypeIdentifier::parameterized("vec", vec![TypeIdentifier::of(inner)]),
                ],
            )
        };
        assert_eq!(nested("i32"), nested("i32"));
        assert_ne!(nested("i32"), nested("bool"));
    }

    #[test]
    fn test_wildcard_equals_only_itself() {
        let w1 = TypeIdentifier::wildcard();
        let w2 = TypeIdentifier::wildcard();

        assert_eq!(w1, w1.clone());
        assert_ne!(w1, w2);
        assert_ne!(w1, TypeIdentifier::of("_"));
        assert!(w1.is_wildcard());
        assert!(!TypeIdentifier::of("_").is_wildcard());
    }

    #[test]
    fn test_substitute_replaces_every_wildcard() {
        let template = TypeIdentifier::parameterized(
            "map",
            vec![TypeIdentifier::wildcard(), TypeIdentifier::wildcard()],
        );
        let concrete = template.substitute(&TypeIdentifier::of("i32"));

        assert_eq!(
            concrete,
            TypeIdentifier::parameterized(
                "map",
                vec![TypeIdentifier::of("i32"), TypeIdentifier::of("i32")],
            )
        );
        assert!(!concrete.params()[0].is_wildcard());
    }

    #[test]
    fn test_substitute_is_deep() {
        let template = TypeIdentifier::parameterized(
            "vec",
            vec![TypeIdentifier::parameterized(
                "option",
                vec![TypeIdentifier::wildcard()],
            )],
        );
        let concrete = template.substitute(&TypeIdentifier::of("bool"));
        assert_eq!(
            concrete,
            TypeIdentifier::parameterized(
                "vec",
                vec![TypeIdentifier::parameterized(
                    "option",
                    vec![TypeIdentifier::of("bool")],
                )],
            )
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeIdentifier::of("i32").to_string(), "i32");
        assert_eq!(
            TypeIdentifier::parameterized(
                "map",
                vec![TypeIdentifier::of("string"), TypeIdentifier::of("i64")],
            )
            .to_string(),
            "map<string, i64>"
        );
        assert_eq!(TypeIdentifier::wildcard().to_string(), "_");
    }

    #[test]
    fn test_hash_follows_equality() {
        use std::collections::HashMap;
        let mut table = HashMap::new();
        table.insert(
            TypeIdentifier::parameterized("vec", vec![TypeIdentifier::of("i32")]),
            1,
        );
        assert_eq!(
            table.get(&TypeIdentifier::parameterized(
                "vec",
                vec![TypeIdentifier::of("i32")],
            )),
            Some(&1)
        );
        assert_eq!(table.get(&TypeIdentifier::wildcard()), None);
    }
}
