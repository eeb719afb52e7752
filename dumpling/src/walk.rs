//! Depth-first pre-order traversal over the arena DOM.
//!
//! Pending nodes live on an explicit stack instead of the call stack. A node's
//! children are read after the node has been visited, so a visitor that
//! inserts children into the node it is looking at sees them traversed next.

use indextree::NodeId;
use smallvec::SmallVec;
use std::convert::Infallible;
use std::ops::ControlFlow;

use crate::dom::Document;

/// What the walker does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children, then carry on.
    Continue,
    /// Do not descend into this node's children; carry on with the rest.
    SkipChildren,
    /// End the whole traversal. No further node anywhere is visited.
    Stop,
}

/// Walk `start` and its descendants in document order.
///
/// Returns `ControlFlow::Break(())` if a visit returned [`Visit::Stop`].
pub fn walk<F>(doc: &mut Document, start: NodeId, mut visit: F) -> ControlFlow<()>
where
    F: FnMut(&mut Document, NodeId) -> Visit,
{
    match try_walk(doc, start, |doc, id| Ok::<_, Infallible>(visit(doc, id))) {
        Ok(flow) => flow,
        Err(never) => match never {},
    }
}

/// Fallible form of [`walk`]: the first error ends the traversal and is returned.
pub fn try_walk<F, E>(doc: &mut Document, start: NodeId, mut visit: F) -> Result<ControlFlow<()>, E>
where
    F: FnMut(&mut Document, NodeId) -> Result<Visit, E>,
{
    let mut pending: SmallVec<[NodeId; 32]> = SmallVec::new();
    pending.push(start);

    while let Some(id) = pending.pop() {
        match visit(doc, id)? {
            Visit::Continue => {}
            Visit::SkipChildren => continue,
            Visit::Stop => return Ok(ControlFlow::Break(())),
        }

        // Push in reverse so the first child is popped first
        let len = pending.len();
        pending.extend(id.children(&doc.arena));
        pending[len..].reverse();
    }

    Ok(ControlFlow::Continue(()))
}
