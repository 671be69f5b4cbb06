//! Compiles a tree into a closure.
//!
//! The closure captures each node's evaluation function and the closures of
//! its children, so calling it does no tree walking or token matching.
//! Compiled closures evaluate without a context.

use crate::node::Node;
use crate::value::Value;
use std::sync::Arc;

/// A compiled expression. Cheap to clone and safe to call from any thread.
pub type CompiledFn = Arc<dyn Fn() -> Value + Send + Sync>;

impl<C: ?Sized + 'static> Node<C> {
    pub fn to_function(&self) -> CompiledFn {
        let Some(exec) = &self.exec else {
            let value = self.value.clone();
            return Arc::new(move || value.clone());
        };
        let exec = Arc::clone(exec);
        let token = self.token().unwrap_or_default().to_string();
        match (self.lhs(), self.rhs()) {
            (None, _) => Arc::new(move || exec(token.as_str(), &[], None)),
            (Some(lhs), None) => {
                let lhs = lhs.to_function();
                Arc::new(move || exec(token.as_str(), &[lhs()], None))
            }
            (Some(lhs), Some(rhs)) => {
                let lhs = lhs.to_function();
                let rhs = rhs.to_function();
                Arc::new(move || exec(token.as_str(), &[lhs(), rhs()], None))
            }
        }
    }
}
