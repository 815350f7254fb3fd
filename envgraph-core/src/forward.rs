//! Forward-reference ports: outputs published before they exist.
//!
//! A module hands out its output handles at construction time so that
//! siblings under construction can wire them as inputs; the real computation
//! is bound later, during the module's `build`. This is what makes mutually
//! dependent sibling modules constructible at all.

use std::cell::RefCell;
use std::rc::Rc;

use crate::context::BuildContext;
use crate::errors::{EngineError, EngineResult};
use crate::graph::NodeId;
use crate::port::{Port, PortRef};
use crate::Tick;

/// A port whose target is bound after construction, exactly once.
///
/// Binding a second time fails loudly, as does reading before binding.
pub struct ForwardPort<T> {
    inner: Rc<ForwardInner<T>>,
    ctx: BuildContext,
}

impl<T> Clone for ForwardPort<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            ctx: self.ctx.clone(),
        }
    }
}

pub(crate) struct ForwardInner<T> {
    label: String,
    node: NodeId,
    target: RefCell<Option<PortRef<T>>>,
}

impl<T: 'static> ForwardPort<T> {
    pub(crate) fn new(label: &str, node: NodeId, ctx: BuildContext) -> Self {
        Self {
            inner: Rc::new(ForwardInner {
                label: label.to_string(),
                node,
                target: RefCell::new(None),
            }),
            ctx,
        }
    }

    /// Bind the forwarding target. Must be called exactly once.
    pub fn bind(&self, target: &PortRef<T>) -> EngineResult<()> {
        let mut slot = self.inner.target.borrow_mut();
        if slot.is_some() {
            return Err(EngineError::AlreadyBound {
                port: self.inner.label.clone(),
            });
        }
        self.ctx.register_binding(self.inner.node, target.node());
        *slot = Some(target.clone());
        Ok(())
    }

    /// A readable handle to this port, valid to pass around before binding.
    pub fn port(&self) -> PortRef<T> {
        PortRef(Rc::clone(&self.inner) as Rc<dyn Port<T>>)
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }
}

impl<T> Port<T> for ForwardInner<T> {
    fn get(&self, tick: Tick) -> EngineResult<T> {
        match &*self.target.borrow() {
            Some(target) => target.get(tick),
            None => Err(EngineError::UnboundForwardPort {
                port: self.label.clone(),
            }),
        }
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn node(&self) -> NodeId {
        self.node
    }
}
