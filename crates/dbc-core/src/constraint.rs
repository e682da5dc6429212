//! Type descriptors, constraint sets, and declared annotations
//!
//! A [`ConstraintSet`] is the atomic unit every check validates against: one
//! type descriptor, or an ordered, non-empty list of them. A value satisfies
//! the set when it matches at least one descriptor.
//!
//! [`Annotation`] is what a signature may declare for a slot. Only annotations
//! shaped like a constraint set take part in checking; strict conversion
//! (`ConstraintSet::try_from`) rejects other shapes with [`Error::Shape`],
//! relaxed conversion (`Annotation::constraints`) just returns `None`.

use std::borrow::Cow;
use std::fmt;

use crate::message::render_types;
use crate::value::Value;
use crate::{Error, Result};

// ── Type Descriptors ──────────────────────────────────────

/// An opaque type identity a runtime value can be tested against
#[derive(Clone)]
pub struct TypeDescriptor {
    name: Cow<'static, str>,
    test: fn(&Value) -> bool,
}

impl TypeDescriptor {
    pub const INT: TypeDescriptor = TypeDescriptor::builtin("int", is_int);
    pub const FLOAT: TypeDescriptor = TypeDescriptor::builtin("float", is_float);
    pub const STR: TypeDescriptor = TypeDescriptor::builtin("str", is_str);
    pub const BOOL: TypeDescriptor = TypeDescriptor::builtin("bool", is_bool);
    pub const LIST: TypeDescriptor = TypeDescriptor::builtin("list", is_list);
    pub const DICT: TypeDescriptor = TypeDescriptor::builtin("dict", is_dict);
    pub const NULL: TypeDescriptor = TypeDescriptor::builtin("null", is_null);

    const BUILTINS: [TypeDescriptor; 7] = [
        Self::INT,
        Self::FLOAT,
        Self::STR,
        Self::BOOL,
        Self::LIST,
        Self::DICT,
        Self::NULL,
    ];

    const fn builtin(name: &'static str, test: fn(&Value) -> bool) -> Self {
        TypeDescriptor {
            name: Cow::Borrowed(name),
            test,
        }
    }

    /// Define a custom descriptor with its own membership test
    pub fn new(name: impl Into<Cow<'static, str>>, test: fn(&Value) -> bool) -> Self {
        TypeDescriptor {
            name: name.into(),
            test,
        }
    }

    /// Look up a built-in descriptor by its display name
    pub fn lookup(name: &str) -> Option<TypeDescriptor> {
        Self::BUILTINS.into_iter().find(|d| d.name == name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor").field(&self.name).finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn is_int(v: &Value) -> bool {
    matches!(v, Value::Integer(_))
}

fn is_float(v: &Value) -> bool {
    matches!(v, Value::Float(_))
}

fn is_str(v: &Value) -> bool {
    matches!(v, Value::String(_))
}

fn is_bool(v: &Value) -> bool {
    matches!(v, Value::Boolean(_))
}

fn is_list(v: &Value) -> bool {
    matches!(v, Value::Array(_))
}

fn is_dict(v: &Value) -> bool {
    matches!(v, Value::Object(_))
}

fn is_null(v: &Value) -> bool {
    matches!(v, Value::Null)
}

/// Numbers: `int` or `float`
pub const NUM: [TypeDescriptor; 2] = [TypeDescriptor::INT, TypeDescriptor::FLOAT];

// ── Constraint Sets ───────────────────────────────────────

/// One or more acceptable type descriptors, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    descriptors: Vec<TypeDescriptor>,
}

impl ConstraintSet {
    /// A set holding exactly one descriptor
    pub fn of(descriptor: TypeDescriptor) -> Self {
        ConstraintSet {
            descriptors: vec![descriptor],
        }
    }

    /// A set accepting any of the given descriptors.
    ///
    /// Order is kept for messages and duplicates are not removed.
    ///
    /// # Errors
    /// Returns `Error::Shape` when `descriptors` is empty.
    pub fn any_of(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Result<Self> {
        let descriptors: Vec<TypeDescriptor> = descriptors.into_iter().collect();
        if descriptors.is_empty() {
            return Err(Error::shape(
                "a constraint set requires at least one type descriptor",
            ));
        }
        Ok(ConstraintSet { descriptors })
    }

    /// `int or float`
    pub fn num() -> Self {
        ConstraintSet {
            descriptors: NUM.to_vec(),
        }
    }

    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// True iff the value matches at least one descriptor
    pub fn matches(&self, value: &Value) -> bool {
        self.descriptors.iter().any(|d| d.matches(value))
    }
}

impl From<TypeDescriptor> for ConstraintSet {
    fn from(descriptor: TypeDescriptor) -> Self {
        ConstraintSet::of(descriptor)
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_types(self))
    }
}

impl TryFrom<&Annotation> for ConstraintSet {
    type Error = Error;

    /// Strict conversion: any shape other than a descriptor or a non-empty
    /// list of descriptors is an API misuse.
    fn try_from(annotation: &Annotation) -> Result<Self> {
        match annotation {
            Annotation::Type(d) => Ok(ConstraintSet::of(d.clone())),
            Annotation::AnyOf(items) => {
                let descriptors = items
                    .iter()
                    .map(|item| match item {
                        Annotation::Type(d) => Ok(d.clone()),
                        other => Err(Error::shape(format!(
                            "all items in a constraint set must be types, found {}",
                            other
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                ConstraintSet::any_of(descriptors)
            }
            Annotation::Other(text) => Err(Error::shape(format!(
                "a constraint set requires a type or a list of types, found '{}'",
                text
            ))),
        }
    }
}

impl TryFrom<Annotation> for ConstraintSet {
    type Error = Error;

    fn try_from(annotation: Annotation) -> Result<Self> {
        ConstraintSet::try_from(&annotation)
    }
}

// ── Annotations ───────────────────────────────────────────

/// A declaration attached to a parameter or return slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// A single type descriptor
    Type(TypeDescriptor),
    /// A collection of annotations (type-shaped only if all are types)
    AnyOf(Vec<Annotation>),
    /// Anything else: documentation, a unit, an unknown type name
    Other(String),
}

impl Annotation {
    pub fn any_of(items: impl IntoIterator<Item = impl Into<Annotation>>) -> Self {
        Annotation::AnyOf(items.into_iter().map(Into::into).collect())
    }

    pub fn other(text: impl Into<String>) -> Self {
        Annotation::Other(text.into())
    }

    /// Relaxed conversion used by signature introspection.
    ///
    /// Returns `None` instead of an error for shapes that are not a type or a
    /// non-empty list of types.
    pub fn constraints(&self) -> Option<ConstraintSet> {
        ConstraintSet::try_from(self).ok()
    }

    /// Interpret a JSON annotation.
    ///
    /// - `"int"` (a built-in name) → `Type`
    /// - `[...]` → `AnyOf`, element-wise
    /// - anything else, including unknown names → `Other`
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::String(name) => match TypeDescriptor::lookup(name) {
                Some(d) => Annotation::Type(d),
                None => Annotation::Other(name.clone()),
            },
            serde_json::Value::Array(items) => {
                Annotation::AnyOf(items.iter().map(Annotation::from_json).collect())
            }
            other => Annotation::Other(other.to_string()),
        }
    }
}

impl From<TypeDescriptor> for Annotation {
    fn from(descriptor: TypeDescriptor) -> Self {
        Annotation::Type(descriptor)
    }
}

impl<const N: usize> From<[TypeDescriptor; N]> for Annotation {
    fn from(descriptors: [TypeDescriptor; N]) -> Self {
        Annotation::any_of(descriptors)
    }
}

impl From<&str> for Annotation {
    fn from(text: &str) -> Self {
        Annotation::Other(text.to_string())
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Type(d) => write!(f, "{}", d),
            Annotation::AnyOf(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Annotation::Other(text) => write!(f, "'{}'", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_positive(v: &Value) -> bool {
        matches!(v, Value::Integer(i) if *i > 0)
    }

    #[test]
    fn test_builtin_descriptors_match_their_variants() {
        assert!(TypeDescriptor::INT.matches(&Value::Integer(1)));
        assert!(!TypeDescriptor::INT.matches(&Value::Float(1.0)));
        assert!(!TypeDescriptor::INT.matches(&Value::Boolean(true)));
        assert!(TypeDescriptor::STR.matches(&Value::from("")));
        assert!(TypeDescriptor::NULL.matches(&Value::Null));
        assert!(TypeDescriptor::LIST.matches(&Value::Array(vec![])));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(TypeDescriptor::lookup("float"), Some(TypeDescriptor::FLOAT));
        assert_eq!(TypeDescriptor::lookup("Float"), None);
    }

    #[test]
    fn test_custom_descriptor() {
        let positive = TypeDescriptor::new("positive int", is_positive);
        assert_eq!(positive.name(), "positive int");
        assert!(positive.matches(&Value::Integer(3)));
        assert!(!positive.matches(&Value::Integer(-3)));
    }

    #[test]
    fn test_set_matches_any() {
        let set = ConstraintSet::num();
        assert!(set.matches(&Value::Integer(1)));
        assert!(set.matches(&Value::Float(1.5)));
        assert!(!set.matches(&Value::from("1")));
    }

    #[test]
    fn test_any_of_keeps_order_and_duplicates() {
        let set = ConstraintSet::any_of([
            TypeDescriptor::STR,
            TypeDescriptor::INT,
            TypeDescriptor::STR,
        ])
        .unwrap();
        let names: Vec<_> = set.descriptors().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["str", "int", "str"]);
    }

    #[test]
    fn test_any_of_empty_is_shape_error() {
        let err = ConstraintSet::any_of(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn test_try_from_annotation_rejects_nested() {
        let nested = Annotation::any_of([
            Annotation::Type(TypeDescriptor::INT),
            Annotation::from(NUM),
        ]);
        assert!(matches!(
            ConstraintSet::try_from(&nested),
            Err(Error::Shape(_))
        ));
    }

    #[test]
    fn test_try_from_annotation_rejects_other() {
        let err = ConstraintSet::try_from(Annotation::other("a number")).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn test_relaxed_conversion() {
        assert_eq!(
            Annotation::from(TypeDescriptor::BOOL).constraints(),
            Some(ConstraintSet::of(TypeDescriptor::BOOL))
        );
        assert_eq!(Annotation::AnyOf(vec![]).constraints(), None);
        assert_eq!(Annotation::other("doc").constraints(), None);
    }

    #[test]
    fn test_annotation_from_json() {
        assert_eq!(
            Annotation::from_json(&serde_json::json!("int")),
            Annotation::Type(TypeDescriptor::INT)
        );
        assert_eq!(
            Annotation::from_json(&serde_json::json!(["int", "float"])),
            Annotation::from(NUM)
        );
        assert_eq!(
            Annotation::from_json(&serde_json::json!("meters")),
            Annotation::Other("meters".into())
        );
        assert_eq!(
            Annotation::from_json(&serde_json::json!(3)),
            Annotation::Other("3".into())
        );
    }

    #[test]
    fn test_annotation_display() {
        let ann = Annotation::any_of([
            Annotation::Type(TypeDescriptor::INT),
            Annotation::other("x"),
        ]);
        assert_eq!(ann.to_string(), "(int, 'x')");
    }
}
