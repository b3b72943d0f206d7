//! The segment graph: leaves, reference segments, and the reference-counted
//! bookkeeping that drives adaptive materialization.
//!
//! Every segment is a [`Node`] shared via `Rc`. The child→parent edge (a
//! reference segment holding its input) is an owning `Rc`; the parent→child
//! `dependents` edge is a non-owning `Weak`, walked only at teardown. This
//! means a node's own `Rc` strong count already tracks "is anyone, outer
//! handle or dependent, still pointing at me" — the `outer_refs` counter
//! tracks only the first kind, which is what the materialization policy's
//! eligibility rule is defined over.

pub mod concat;
pub mod leaf;
pub mod repetition;
pub mod substring;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::Error;
use crate::sink::Sink;

use concat::ConcatState;
use leaf::{LeafBorrowed, LeafOwned};
use repetition::RepetitionState;
use substring::SubstringState;

pub(crate) enum Kind<'a> {
    LeafBorrowed(LeafBorrowed<'a>),
    LeafOwned(LeafOwned),
    Substring(SubstringState<'a>),
    Concatenation(ConcatState<'a>),
    Repetition(RepetitionState<'a>),
}

pub(crate) struct Node<'a> {
    kind: RefCell<Kind<'a>>,
    dependents: RefCell<Vec<Weak<Node<'a>>>>,
    outer_refs: Cell<usize>,
    /// Guards against re-entering eligibility re-evaluation while a forced
    /// materialization pass over this node's own dependents is in flight.
    destroying: Cell<bool>,
}

impl<'a> Node<'a> {
    /// Builds a node with zero outer handles; the caller (a `LogicalString`
    /// constructor, or a `substring`/`concat`/`repeat` builder) is
    /// responsible for incrementing `outer_refs` or registering it as a
    /// dependent, as appropriate.
    pub(crate) fn new_root(kind: Kind<'a>) -> Rc<Node<'a>> {
        Rc::new(Node {
            kind: RefCell::new(kind),
            dependents: RefCell::new(Vec::new()),
            outer_refs: Cell::new(0),
            destroying: Cell::new(false),
        })
    }

    pub(crate) fn inc_outer_refs(self: &Rc<Self>) {
        self.outer_refs.set(self.outer_refs.get() + 1);
    }

    /// Decrements `outer_refs`; if it reaches zero, applies the eligibility
    /// rule (§4.6): forces dependents to materialize if that is cheaper than
    /// keeping this node's whole input subgraph around.
    pub(crate) fn dec_outer_refs(self: &Rc<Self>) {
        let current = self.outer_refs.get();
        debug_assert!(current > 0, "outer_refs underflow");
        self.outer_refs.set(current - 1);
        if current - 1 == 0 {
            maybe_destroy(self);
        }
    }

    fn add_dependent(self: &Rc<Self>, dependent: &Rc<Node<'a>>) {
        self.dependents.borrow_mut().push(Rc::downgrade(dependent));
    }

    fn remove_dependent(&self, dependent_ptr: *const Node<'a>) {
        self.dependents
            .borrow_mut()
            .retain(|weak| weak.as_ptr() != dependent_ptr);
    }

    pub(crate) fn length(&self) -> usize {
        match &*self.kind.borrow() {
            Kind::LeafBorrowed(l) => l.length(),
            Kind::LeafOwned(l) => l.length(),
            Kind::Substring(s) => s.length(),
            Kind::Concatenation(c) => c.length(),
            Kind::Repetition(r) => r.length(),
        }
    }

    pub(crate) fn code_point_at(&self, i: usize) -> Result<i32, Error> {
        match &*self.kind.borrow() {
            Kind::LeafBorrowed(l) => l.code_point_at(i),
            Kind::LeafOwned(l) => l.code_point_at(i),
            Kind::Substring(s) => s.code_point_at(i),
            Kind::Concatenation(c) => c.code_point_at(i),
            Kind::Repetition(r) => r.code_point_at(i),
        }
    }

    pub(crate) fn print(&self, sink: &mut dyn Sink, start: usize, end: usize) -> bool {
        match &*self.kind.borrow() {
            Kind::LeafBorrowed(l) => l.print(sink, start, end),
            Kind::LeafOwned(l) => l.print(sink, start, end),
            Kind::Substring(s) => s.print(sink, start, end),
            Kind::Concatenation(c) => c.print(sink, start, end),
            Kind::Repetition(r) => r.print(sink, start, end),
        }
    }

    pub(crate) fn keeping_cost(&self) -> usize {
        match &*self.kind.borrow() {
            Kind::LeafBorrowed(l) => l.keeping_cost(),
            Kind::LeafOwned(l) => l.keeping_cost(),
            Kind::Substring(s) => s.keeping_cost(),
            Kind::Concatenation(c) => c.keeping_cost(),
            Kind::Repetition(r) => r.keeping_cost(),
        }
    }

    /// Fast trim bounds available only when this node is directly a leaf in
    /// an encoding with a fixed, small code-point width; `None` otherwise
    /// (callers fall back to the generic code-point scan in `search.rs`).
    pub(crate) fn leaf_trim_bounds(&self) -> Option<(usize, usize)> {
        match &*self.kind.borrow() {
            Kind::LeafBorrowed(l) => l.trim_bounds(),
            Kind::LeafOwned(l) => l.trim_bounds(),
            _ => None,
        }
    }

    fn reconstruction_cost(&self, dying: *const Node<'a>) -> usize {
        match &*self.kind.borrow() {
            Kind::Substring(s) => s.reconstruction_cost(),
            Kind::Concatenation(c) => c.reconstruction_cost(dying),
            Kind::Repetition(r) => r.reconstruction_cost(),
            Kind::LeafBorrowed(_) | Kind::LeafOwned(_) => 0,
        }
    }

    /// Forces this node (a dependent) to stop referencing `dying`, which is
    /// about to have its storage released. After materializing, detaches
    /// from `dying` and re-applies the eligibility rule to it (it may now be
    /// destroyable, cascading further).
    fn reconstruct(self: &Rc<Self>, dying: &Rc<Node<'a>>) {
        let released = {
            let mut kind = self.kind.borrow_mut();
            match &mut *kind {
                Kind::Substring(s) => s.reconstruct(),
                Kind::Concatenation(c) => c.reconstruct(Rc::as_ptr(dying)),
                Kind::Repetition(r) => r.reconstruct(),
                Kind::LeafBorrowed(_) | Kind::LeafOwned(_) => None,
            }
        };
        if let Some(parent) = released {
            parent.remove_dependent(Rc::as_ptr(self));
        }
    }

    fn inputs(&self) -> Vec<Rc<Node<'a>>> {
        match &*self.kind.borrow() {
            Kind::LeafBorrowed(_) | Kind::LeafOwned(_) => Vec::new(),
            Kind::Substring(s) => s.inputs(),
            Kind::Concatenation(c) => c.inputs(),
            Kind::Repetition(r) => r.inputs(),
        }
    }
}

/// Total bytes the set of live dependents would need to allocate if `node`
/// vanished and each had to materialize its view of it.
fn free_cost<'a>(node: &Rc<Node<'a>>) -> usize {
    node.dependents
        .borrow()
        .iter()
        .filter_map(Weak::upgrade)
        .map(|dependent| dependent.reconstruction_cost(Rc::as_ptr(node)))
        .sum()
}

/// Re-applies the eligibility rule (invariant 1, §3) to `node`: if its outer
/// handle count is zero and destroying it is cheaper than keeping its whole
/// input subgraph, force every live dependent to reconstruct away from it.
/// Once the last dependent detaches, `node`'s own `Rc` strong count reaches
/// zero and `Node::drop` below runs, cascading the same check to its inputs.
pub(crate) fn maybe_destroy<'a>(node: &Rc<Node<'a>>) {
    if node.outer_refs.get() != 0 || node.destroying.get() {
        return;
    }
    if free_cost(node) >= node.keeping_cost() {
        return;
    }
    node.destroying.set(true);
    let dependents: Vec<Rc<Node<'a>>> = node.dependents.borrow().iter().filter_map(Weak::upgrade).collect();
    for dependent in dependents {
        dependent.reconstruct(node);
    }
}

impl<'a> Drop for Node<'a> {
    /// Runs only once this node's `Rc` strong count has actually reached
    /// zero — i.e. no outer handle and no dependent references it anymore.
    /// Detaches from this node's own inputs and re-checks their eligibility,
    /// which is step 2 of the destruction sequence in §4.6.
    fn drop(&mut self) {
        let self_ptr: *const Node<'a> = self;
        for input in self.inputs() {
            input.remove_dependent(self_ptr);
            maybe_destroy(&input);
        }
    }
}

/// Builds a lazy Substring segment over `parent`, registering the new node
/// as a dependent of `parent` so it is notified before `parent` is freed.
pub(crate) fn new_substring<'a>(parent: &Rc<Node<'a>>, start: usize, end: usize) -> Rc<Node<'a>> {
    let node = Node::new_root(Kind::Substring(SubstringState::lazy(parent.clone(), start, end)));
    parent.add_dependent(&node);
    node
}

/// Builds a lazy Concatenation segment over `left` and `right`.
pub(crate) fn new_concat<'a>(left: &Rc<Node<'a>>, right: &Rc<Node<'a>>) -> Rc<Node<'a>> {
    let node = Node::new_root(Kind::Concatenation(ConcatState::lazy(left.clone(), right.clone())));
    left.add_dependent(&node);
    right.add_dependent(&node);
    node
}

/// Builds a lazy Repetition segment over `inner`.
pub(crate) fn new_repetition<'a>(inner: &Rc<Node<'a>>, times: usize) -> Rc<Node<'a>> {
    let node = Node::new_root(Kind::Repetition(RepetitionState::lazy(inner.clone(), times)));
    inner.add_dependent(&node);
    node
}
