//! MCTS tree node representation.
//!
//! Each node represents a game state reached by taking an action from the parent.
//! Nodes store visit statistics used for UCB selection and policy improvement.
//! A child's state is only materialised when selection first descends into it.

use engine_core::Game;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
#[derive(Debug)]
pub struct MctsNode<G: Game> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub action: Option<G::Action>,

    /// Game state at this node, `None` until first visited
    pub state: Option<G::State>,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of values backpropagated through this node, from the point of
    /// view of the player to move at this node.
    /// Q(s,a) = value_sum / visit_count
    pub value_sum: f32,

    /// Prior probability from the evaluator.
    /// P(s,a) - probability of selecting action `a` from parent state.
    pub prior: f32,

    /// Value of a finished game for the player to move here.
    /// Only known once the state is materialised.
    pub terminal_value: Option<f32>,

    /// Children in ascending action-index order.
    /// Empty until node is expanded.
    pub children: Vec<NodeId>,

    /// Depth below the root
    pub depth: u32,
}

impl<G: Game> MctsNode<G> {
    /// Create a new root node.
    pub fn new_root(state: G::State, terminal_value: Option<f32>) -> Self {
        Self {
            parent: NodeId::NONE,
            action: None,
            state: Some(state),
            visit_count: 0,
            value_sum: 0.0,
            prior: 1.0, // Root has prior 1.0
            terminal_value,
            children: Vec::new(),
            depth: 0,
        }
    }

    /// Create an unvisited child; its state is filled in on first descent.
    pub fn new_child(parent: NodeId, action: G::Action, prior: f32, depth: u32) -> Self {
        Self {
            parent,
            action: Some(action),
            state: None,
            visit_count: 0,
            value_sum: 0.0,
            prior,
            terminal_value: None,
            children: Vec::new(),
            depth,
        }
    }

    /// Calculate mean value Q(s,a) = value_sum / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }

    /// Calculate UCB score for child selection.
    /// UCB(s,a) = Q(s,a) + c_puct * P(s,a) * sqrt(N_parent) / (1 + N(s,a))
    ///
    /// The value stored in each node is from that node's perspective (the
    /// player to move there). The parent sees the opponent's position, so
    /// Q is the negated child mean.
    ///
    /// Takes pre-computed sqrt(parent_visits) so comparing siblings only
    /// computes it once.
    #[inline]
    pub fn ucb_score(&self, parent_visits_sqrt: f32, c_puct: f32) -> f32 {
        let q = -self.mean_value();
        let u = c_puct * self.prior * parent_visits_sqrt / (1.0 + self.visit_count as f32);
        q + u
    }

    #[inline]
    pub fn is_materialised(&self) -> bool {
        self.state.is_some()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal_value.is_some()
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this is a leaf node (not expanded or terminal).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_terminal() || !self.is_expanded()
    }
}
