//! Declared signatures and whole-signature argument checking
//!
//! A [`Signature`] is the metadata a contract author attaches to a function:
//! its name, each parameter's optional [`Annotation`], and an optional return
//! annotation. The engine only reads it.
//!
//! [`check_all_declared_arguments`] walks a frame's signature and checks every
//! bound argument whose annotation is type-shaped. Parameters without an
//! annotation, or with one that is not a type or list of types, are skipped.
//! The walk stops at the first violation.

use std::borrow::Cow;

use tracing::trace;

use crate::checker::require_argument;
use crate::constraint::{Annotation, TypeDescriptor};
use crate::frame::Frame;
use crate::value::Value;
use crate::{Error, Result};

/// Introspection level of the immediate caller
pub const DEFAULT_LEVEL: usize = 1;

// ── Signature Metadata ────────────────────────────────────

/// A single declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    annotation: Option<Annotation>,
}

impl Parameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }
}

/// Declared parameter and return annotations of one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: Cow<'static, str>,
    parameters: Vec<Parameter>,
    returns: Option<Annotation>,
}

impl Signature {
    /// Start a signature for the function called `name`
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Signature {
            name: name.into(),
            parameters: Vec::new(),
            returns: None,
        }
    }

    /// Parameterless signature usable in a `static`
    pub(crate) const fn primitive(name: &'static str) -> Self {
        Signature {
            name: Cow::Borrowed(name),
            parameters: Vec::new(),
            returns: None,
        }
    }

    /// Declare a parameter with an annotation
    pub fn param(mut self, name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            annotation: Some(annotation.into()),
        });
        self
    }

    /// Declare a parameter with no annotation
    pub fn untyped(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            annotation: None,
        });
        self
    }

    /// Declare the return annotation
    pub fn returns(mut self, annotation: impl Into<Annotation>) -> Self {
        self.returns = Some(annotation.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn return_annotation(&self) -> Option<&Annotation> {
        self.returns.as_ref()
    }

    /// Check the metadata itself is well formed.
    ///
    /// # Errors
    /// `Error::Shape` for an empty function name, a parameter name that is not
    /// an identifier, or a parameter declared twice.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::shape("a signature requires a non-empty function name"));
        }
        for (i, parameter) in self.parameters.iter().enumerate() {
            if !is_identifier(&parameter.name) {
                return Err(Error::shape(format!(
                    "{} requires an identifier for parameter {}, found '{}'",
                    self.name, i, parameter.name
                )));
            }
            if self.parameters[..i].iter().any(|p| p.name == parameter.name) {
                return Err(Error::shape(format!(
                    "{} declares parameter '{}' more than once",
                    self.name, parameter.name
                )));
            }
        }
        Ok(())
    }

    /// Load a signature from its JSON form:
    ///
    /// ```json
    /// {"name": "f",
    ///  "parameters": [{"name": "x", "annotation": "int"}, {"name": "y"}],
    ///  "returns": ["int", "float"]}
    /// ```
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let doc: SignatureDoc = serde_json::from_value(json.clone())
            .map_err(|e| Error::shape(format!("invalid signature document: {}", e)))?;
        let signature = doc.into_signature();
        signature.validate()?;
        Ok(signature)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| Error::shape(format!("invalid signature JSON: {}", e)))?;
        Self::from_json(&json)
    }
}

#[derive(serde::Deserialize)]
struct SignatureDoc {
    name: String,
    #[serde(default)]
    parameters: Vec<ParameterDoc>,
    #[serde(default)]
    returns: Option<serde_json::Value>,
}

#[derive(serde::Deserialize)]
struct ParameterDoc {
    name: String,
    #[serde(default)]
    annotation: Option<serde_json::Value>,
}

impl SignatureDoc {
    fn into_signature(self) -> Signature {
        Signature {
            name: Cow::Owned(self.name),
            parameters: self
                .parameters
                .into_iter()
                .map(|p| Parameter {
                    name: p.name,
                    annotation: p.annotation.as_ref().map(Annotation::from_json),
                })
                .collect(),
            returns: self.returns.as_ref().map(Annotation::from_json),
        }
    }
}

/// Non-empty, starts with a letter or `_`, continues with letters, digits or `_`
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

// ── Introspection ─────────────────────────────────────────

/// Check every type-annotated argument of the caller's frame.
///
/// Equivalent to [`check_declared_arguments_at`] with [`DEFAULT_LEVEL`].
pub fn check_all_declared_arguments(caller: &Frame<'_>) -> Result<()> {
    check_declared_arguments_at(caller, DEFAULT_LEVEL)
}

/// Check every type-annotated argument of the frame `level` steps up.
///
/// Level 0 is the introspector's own frame (declared as
/// `check_all_declared_arguments(level: int)`), level 1 the caller, level 2
/// the caller's caller, and so on.
///
/// # Errors
/// - `Error::Frame` when `level` goes past the root of the chain
/// - `Error::InputViolation` for the first argument outside its annotation;
///   later parameters are not examined
pub fn check_declared_arguments_at(caller: &Frame<'_>, level: usize) -> Result<()> {
    // Levels past i64::MAX never resolve; frame_at_depth reports them below.
    let level_value = i64::try_from(level).unwrap_or(i64::MAX);
    let own_signature =
        Signature::new("check_all_declared_arguments").param("level", TypeDescriptor::INT);
    let here = caller.enter_primitive(&own_signature, vec![Value::Integer(level_value)]);

    let target = here.frame_at_depth(level)?;
    let subject = target.function_name();

    for (parameter, value) in target.bindings() {
        let Some(annotation) = parameter.annotation() else {
            trace!(subject, parameter = parameter.name(), "skipping unannotated parameter");
            continue;
        };
        let Some(constraints) = annotation.constraints() else {
            trace!(
                subject,
                parameter = parameter.name(),
                %annotation,
                "skipping non-type annotation"
            );
            continue;
        };
        require_argument(subject, value, parameter.name(), &constraints)?;
    }
    Ok(())
}
