//! Handler references.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::router::context::Context;
use crate::router::error::Error;
use crate::router::params::Param;

/// A directly invocable handler: receives the dispatch context and the
/// positional parameters extracted from the path.
pub type HandlerFn = Arc<dyn Fn(&mut Context<'_>, &[Param]) -> Result<(), Error> + Send + Sync>;

/// Something a route can run: a closure, or a `Target@member` reference that
/// is looked up in the router's [`HandlerRegistry`](crate::router::HandlerRegistry)
/// when the route fires.
#[derive(Clone)]
pub enum HandlerRef {
    Invocable(HandlerFn),
    Named(NamedRef),
}

impl HandlerRef {
    /// Parse a `Target@member[:arg,...]` reference.
    pub fn named(reference: &str) -> Result<Self, Error> {
        reference.parse()
    }

    /// Human-readable form used in route listings.
    pub fn describe(&self) -> String {
        match self {
            HandlerRef::Invocable(_) => "<closure>".to_string(),
            HandlerRef::Named(named) => named.to_string(),
        }
    }
}

/// Wrap a closure as a [`HandlerRef`].
pub fn handler<F>(f: F) -> HandlerRef
where
    F: Fn(&mut Context<'_>, &[Param]) -> Result<(), Error> + Send + Sync + 'static,
{
    HandlerRef::Invocable(Arc::new(f))
}

impl FromStr for HandlerRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HandlerRef::Named(s.parse()?))
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Invocable(_) => f.write_str("Invocable(<closure>)"),
            HandlerRef::Named(named) => f.debug_tuple("Named").field(named).finish(),
        }
    }
}

/// A string reference to a registered handler: `Target@member[:arg,...]`.
///
/// The literal arguments after `:` are appended to the path parameters when
/// the member is a static one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRef {
    pub target: String,
    pub member: String,
    pub extra_args: Vec<String>,
}

impl FromStr for NamedRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidHandlerRef(s.to_string());

        let (target, rest) = s.split_once('@').ok_or_else(invalid)?;
        let (member, args) = rest.split_once(':').unwrap_or((rest, ""));
        if target.is_empty() || member.is_empty() || member.contains('@') {
            return Err(invalid());
        }

        let extra_args = if args.is_empty() {
            Vec::new()
        } else {
            args.split(',').map(str::to_string).collect()
        };

        Ok(Self {
            target: target.to_string(),
            member: member.to_string(),
            extra_args,
        })
    }
}

impl fmt::Display for NamedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.target, self.member)?;
        if !self.extra_args.is_empty() {
            write!(f, ":{}", self.extra_args.join(","))?;
        }
        Ok(())
    }
}
