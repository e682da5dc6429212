//! Explicit call frames and depth-based name resolution
//!
//! A [`Frame`] is the activation record of one checked function: the
//! [`Signature`] it was declared with and the argument values bound to it.
//! Frames form an immutable chain through borrowed parent links, so every
//! chain lives on the stack of the thread that built it and resolution never
//! looks at another execution context.
//!
//! Depth 0 is the frame the lookup is made on, depth 1 its parent, and so
//! on. Checking primitives push a frame of their own before resolving, which
//! is why they attribute diagnostics to depth 1: the function that asked for
//! the check.

use std::iter;

use tracing::trace;

use crate::signature::{Parameter, Signature};
use crate::value::Value;
use crate::{Error, Result};

/// One entry of the active call chain
#[derive(Debug)]
pub struct Frame<'a> {
    parent: Option<&'a Frame<'a>>,
    signature: &'a Signature,
    arguments: Vec<Value>,
}

impl<'a> Frame<'a> {
    /// Start a new call chain.
    ///
    /// # Errors
    /// `Error::Shape` when the signature is malformed or the number of
    /// arguments differs from the number of declared parameters.
    pub fn root(signature: &'a Signature, arguments: Vec<Value>) -> Result<Self> {
        Self::bind(None, signature, arguments)
    }

    /// Push a frame for a call made from this one.
    ///
    /// # Errors
    /// Same as [`Frame::root`].
    pub fn enter<'b>(&'b self, signature: &'b Signature, arguments: Vec<Value>) -> Result<Frame<'b>> {
        Frame::bind(Some(self), signature, arguments)
    }

    /// Push a frame for one of the engine's own primitives (no validation)
    pub(crate) fn enter_primitive<'b>(
        &'b self,
        signature: &'b Signature,
        arguments: Vec<Value>,
    ) -> Frame<'b> {
        Frame {
            parent: Some(self),
            signature,
            arguments,
        }
    }

    fn bind(parent: Option<&'a Frame<'a>>, signature: &'a Signature, arguments: Vec<Value>) -> Result<Self> {
        signature.validate()?;
        let expected = signature.parameters().len();
        if arguments.len() != expected {
            return Err(Error::shape(format!(
                "{} takes {} argument(s) but {} were given",
                signature.name(),
                expected,
                arguments.len()
            )));
        }
        Ok(Frame {
            parent,
            signature,
            arguments,
        })
    }

    pub fn function_name(&self) -> &str {
        self.signature.name()
    }

    pub fn signature(&self) -> &Signature {
        self.signature
    }

    pub fn parent(&self) -> Option<&Frame<'a>> {
        self.parent
    }

    /// Argument values in declaration order
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Value bound to the parameter called `name`
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.signature
            .parameters()
            .iter()
            .position(|p| p.name() == name)
            .and_then(|i| self.arguments.get(i))
    }

    /// Declared parameters paired with their bound values
    pub fn bindings(&self) -> impl Iterator<Item = (&Parameter, &Value)> {
        self.signature.parameters().iter().zip(self.arguments.iter())
    }

    /// Number of frames from this one up to the root, inclusive
    pub fn chain_len(&self) -> usize {
        iter::successors(Some(self), |f| f.parent).count()
    }

    /// The frame `depth` steps up the chain (0 = this frame).
    ///
    /// # Errors
    /// `Error::Frame` when the chain is shorter than `depth + 1`.
    pub fn frame_at_depth(&self, depth: usize) -> Result<&Frame<'a>> {
        let mut current: &Frame<'a> = self;
        for _ in 0..depth {
            current = current.parent.ok_or_else(|| Error::Frame {
                depth,
                available: self.chain_len(),
            })?;
        }
        trace!(depth, function = current.function_name(), "resolved frame");
        Ok(current)
    }

    /// Name of the function `depth` steps up the chain
    pub fn name_at_depth(&self, depth: usize) -> Result<&str> {
        self.frame_at_depth(depth).map(Frame::function_name)
    }
}
