//! Diagnostic messages for contract violations
//!
//! Wording is part of the observable contract:
//!
//! ```text
//! <subject> requires <TYPES> for <parameter>.     (input)
//! <subject> should return <TYPES>.                (output)
//! ```
//!
//! `<TYPES>` lists descriptor names in declaration order: `a`, `a or b`,
//! `a, b, or c`. Messages are rebuilt on every call; nothing is cached.

use std::fmt;

use crate::constraint::ConstraintSet;

/// Which side of the call boundary broke its contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Input,
    Output,
}

/// A formatted message plus the facts it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: ViolationKind,
    subject: String,
    parameter: Option<String>,
    constraints: ConstraintSet,
    message: String,
}

impl Diagnostic {
    /// An argument named `parameter` of `subject` failed `constraints`
    pub fn input(
        subject: impl Into<String>,
        parameter: impl Into<String>,
        constraints: ConstraintSet,
    ) -> Self {
        let subject = subject.into();
        let parameter = parameter.into();
        let message = format_message(&subject, &constraints, Some(&parameter));
        Diagnostic {
            kind: ViolationKind::Input,
            subject,
            parameter: Some(parameter),
            constraints,
            message,
        }
    }

    /// The value `subject` was about to return failed `constraints`
    pub fn output(subject: impl Into<String>, constraints: ConstraintSet) -> Self {
        let subject = subject.into();
        let message = format_message(&subject, &constraints, None);
        Diagnostic {
            kind: ViolationKind::Output,
            subject,
            parameter: None,
            constraints,
            message,
        }
    }

    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Name of the function whose contract was violated
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Offending parameter; always `None` for output violations
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Build the canonical diagnostic sentence.
///
/// With a parameter name the sentence reads as an input requirement,
/// without one as a return requirement.
pub fn format_message(subject: &str, constraints: &ConstraintSet, parameter: Option<&str>) -> String {
    let types = render_types(constraints);
    match parameter {
        Some(parameter) => format!("{} requires {} for {}.", subject, types, parameter),
        None => format!("{} should return {}.", subject, types),
    }
}

/// Render descriptor names: `a`, `a or b`, `a, b, or c`
pub fn render_types(constraints: &ConstraintSet) -> String {
    let names: Vec<&str> = constraints.descriptors().iter().map(|d| d.name()).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}
