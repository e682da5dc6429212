//! Argument and return-value checks
//!
//! Each primitive takes the caller's [`Frame`] as its context handle, pushes
//! its own frame, and names the function one level up (the caller) in any
//! diagnostic it raises.
//!
//! ```ignore
//! fn half(caller: &Frame<'_>, n: Value) -> Result<Value> {
//!     let sig = Signature::new("half").param("n", NUM).returns(TypeDescriptor::FLOAT);
//!     let frame = caller.enter(&sig, vec![n.clone()])?;
//!     check_all_declared_arguments(&frame)?;
//!     let out = /* ... */;
//!     check_declared_output(&frame, &out)?;
//!     Ok(out)
//! }
//! ```

use tracing::{debug, trace};

use crate::constraint::ConstraintSet;
use crate::frame::Frame;
use crate::message::Diagnostic;
use crate::signature::{is_identifier, Signature};
use crate::value::Value;
use crate::{Error, Result};

/// Depth of the function that called a checking primitive
pub const CALLER_DEPTH: usize = 1;

static CHECK_ARGUMENT: Signature = Signature::primitive("check_argument");
static CHECK_OUTPUT: Signature = Signature::primitive("check_output");
static CHECK_DECLARED_OUTPUT: Signature = Signature::primitive("check_declared_output");

/// Check one argument of the calling function.
///
/// # Errors
/// - `Error::Shape` when `parameter` is not an identifier
/// - `Error::InputViolation` when `value` matches none of `constraints`
pub fn check_argument(
    caller: &Frame<'_>,
    value: &Value,
    parameter: &str,
    constraints: &ConstraintSet,
) -> Result<()> {
    if !is_identifier(parameter) {
        return Err(Error::shape(
            "check_argument requires an identifier for parameter_name.",
        ));
    }
    let here = caller.enter_primitive(&CHECK_ARGUMENT, Vec::new());
    let subject = here.name_at_depth(CALLER_DEPTH)?;
    require_argument(subject, value, parameter, constraints)
}

/// Check the value the calling function is about to return.
///
/// # Errors
/// `Error::OutputViolation` when `value` matches none of `constraints`.
pub fn check_output(caller: &Frame<'_>, value: &Value, constraints: &ConstraintSet) -> Result<()> {
    let here = caller.enter_primitive(&CHECK_OUTPUT, Vec::new());
    let subject = here.name_at_depth(CALLER_DEPTH)?;
    require_output(subject, value, constraints)
}

/// Check a return value against the caller's declared return annotation.
///
/// Does nothing when the signature declares no return annotation, or one
/// that is not a type or a non-empty list of types.
///
/// # Errors
/// `Error::OutputViolation` when `value` matches none of the declared types.
pub fn check_declared_output(caller: &Frame<'_>, value: &Value) -> Result<()> {
    let here = caller.enter_primitive(&CHECK_DECLARED_OUTPUT, Vec::new());
    let target = here.frame_at_depth(CALLER_DEPTH)?;
    let subject = target.function_name();

    let Some(annotation) = target.signature().return_annotation() else {
        trace!(subject, "no return annotation declared");
        return Ok(());
    };
    let Some(constraints) = annotation.constraints() else {
        trace!(subject, %annotation, "skipping non-type return annotation");
        return Ok(());
    };
    require_output(subject, value, &constraints)
}

pub(crate) fn require_argument(
    subject: &str,
    value: &Value,
    parameter: &str,
    constraints: &ConstraintSet,
) -> Result<()> {
    if constraints.matches(value) {
        trace!(subject, parameter, "argument satisfies contract");
        return Ok(());
    }
    let diagnostic = Diagnostic::input(subject, parameter, constraints.clone());
    debug!(
        subject,
        parameter,
        found = value.type_name(),
        %value,
        "{}",
        diagnostic
    );
    Err(Error::InputViolation(diagnostic))
}

fn require_output(subject: &str, value: &Value, constraints: &ConstraintSet) -> Result<()> {
    if constraints.matches(value) {
        trace!(subject, "return value satisfies contract");
        return Ok(());
    }
    let diagnostic = Diagnostic::output(subject, constraints.clone());
    debug!(subject, found = value.type_name(), %value, "{}", diagnostic);
    Err(Error::OutputViolation(diagnostic))
}
