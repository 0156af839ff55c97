//! Registry resolving `Target@member` handler references.
//!
//! Named handlers are registered up front, per target, either as static
//! members (plain functions) or as instance members (methods on a type that is
//! constructed with `Default` for every call).

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::router::context::Context;
use crate::router::error::Error;
use crate::router::handler::{HandlerFn, NamedRef};
use crate::router::params::Param;

/// How a registered member is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Called without an instance; receives path parameters followed by the
    /// reference's literal extra arguments.
    Static,
    /// Called on a fresh default instance; receives path parameters only.
    Instance,
}

#[derive(Clone)]
struct Member {
    kind: MemberKind,
    call: HandlerFn,
}

/// Startup-built mapping from target and member names to handlers.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    targets: HashMap<String, HashMap<String, Member>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a static member under `target`.
    pub fn register_static<F>(&mut self, target: impl Into<String>, member: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>, &[Param]) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.insert(target.into(), member.into(), MemberKind::Static, to_handler_fn(f))
    }

    /// Register an instance member under `target`. Every call builds a new
    /// `T::default()` and invokes `f` on it.
    pub fn register_instance<T, F>(&mut self, target: impl Into<String>, member: impl Into<String>, f: F) -> &mut Self
    where
        T: Default + 'static,
        F: Fn(&mut T, &mut Context<'_>, &[Param]) -> Result<(), Error> + Send + Sync + 'static,
    {
        let call = to_handler_fn(move |ctx, params| {
            let mut instance = T::default();
            f(&mut instance, ctx, params)
        });
        self.insert(target.into(), member.into(), MemberKind::Instance, call)
    }

    fn insert(&mut self, target: String, member: String, kind: MemberKind, call: HandlerFn) -> &mut Self {
        self.targets
            .entry(target)
            .or_default()
            .insert(member, Member { kind, call });
        self
    }

    /// How `target@member` would be called, if it is registered.
    pub fn member_kind(&self, target: &str, member: &str) -> Option<MemberKind> {
        self.targets.get(target)?.get(member).map(|m| m.kind)
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no target has been registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Resolve `named` (qualified by `namespace` when one is set) and call it.
    pub(crate) fn invoke(
        &self,
        named: &NamedRef,
        namespace: &str,
        ctx: &mut Context<'_>,
        params: &[Param],
    ) -> Result<(), Error> {
        let target = qualify(namespace, &named.target);
        let unresolved = |cause: String| Error::HandlerResolution {
            target: target.clone(),
            member: named.member.clone(),
            cause,
        };

        let members = self
            .targets
            .get(&target)
            .ok_or_else(|| unresolved(format!("target `{target}` is not registered")))?;
        let member = members
            .get(&named.member)
            .ok_or_else(|| unresolved(format!("`{target}` has no member `{}`", named.member)))?;

        debug!("Invoking {target}@{} as {:?} member", named.member, member.kind);
        match member.kind {
            MemberKind::Static if !named.extra_args.is_empty() => {
                let mut args = params.to_vec();
                args.extend(named.extra_args.iter().cloned().map(Some));
                (member.call)(ctx, &args)
            }
            MemberKind::Static | MemberKind::Instance => (member.call)(ctx, params),
        }
    }
}

fn to_handler_fn<F>(f: F) -> HandlerFn
where
    F: Fn(&mut Context<'_>, &[Param]) -> Result<(), Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Prefix `target` with `namespace` using `::` as separator.
pub fn qualify(namespace: &str, target: &str) -> String {
    let namespace = namespace.trim_matches(':');
    if namespace.is_empty() {
        target.to_string()
    } else {
        format!("{namespace}::{}", target.trim_start_matches(':'))
    }
}
