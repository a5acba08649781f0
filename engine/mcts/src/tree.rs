//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices; parent links are plain indices.

use engine_core::Game;

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<G: Game> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<G>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<G: Game> MctsTree<G> {
    /// Create a new tree rooted at `root_state`.
    pub fn new(root_state: G::State, terminal_value: Option<f32>) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state, terminal_value)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<G> {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<G> {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: MctsNode<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select the best child of a node using UCB.
    ///
    /// Ties go to the earliest child, i.e. the lowest action index.
    pub fn select_child(&self, node_id: NodeId, c_puct: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        // Parent's own N, which counts its expansion visit; at least 1 so
        // an unvisited parent still ranks children by prior
        let parent_visits_sqrt = (node.visit_count.max(1) as f32).sqrt();

        let mut best: Option<(NodeId, f32)> = None;
        for &child_id in &node.children {
            let score = self.get(child_id).ucb_score(parent_visits_sqrt, c_puct);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Add an unmaterialised child to a parent node.
    /// Children must be added in ascending action-index order.
    pub fn add_child(&mut self, parent_id: NodeId, action: G::Action, prior: f32) -> NodeId {
        let depth = self.get(parent_id).depth + 1;
        let child_id = self.allocate(MctsNode::new_child(parent_id, action, prior, depth));
        self.get_mut(parent_id).children.push(child_id);
        child_id
    }

    /// Backpropagate a value from a leaf to the root.
    /// Value is negated at each level (opponent's perspective).
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        let mut current_value = value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.value_sum += current_value;

            // Negate for opponent's perspective
            current_value = -current_value;

            current_id = node.parent;
        }
    }

    /// Root children as (action, visit_count) in ascending index order.
    pub fn root_visits(&self) -> impl Iterator<Item = (G::Action, u32)> + '_ {
        self.get(self.root).children.iter().filter_map(|&id| {
            let child = self.get(id);
            child.action.map(|a| (a, child.visit_count))
        })
    }

    /// Get the most visited root action.
    /// Ties go to the lowest action index. `None` if the root has no children.
    pub fn best_action(&self) -> Option<(G::Action, u32)> {
        let mut best: Option<(G::Action, u32)> = None;
        for (action, visits) in self.root_visits() {
            match best {
                Some((_, best_visits)) if visits <= best_visits => {}
                _ => best = Some((action, visits)),
            }
        }
        best
    }

    /// Visit distribution over all action indices, normalised to sum to 1.
    /// All zeros when nothing has been visited yet.
    pub fn root_policy(&self, game: &G) -> Vec<f32> {
        let mut policy = vec![0.0; game.num_actions()];
        let total: u32 = self.root_visits().map(|(_, v)| v).sum();
        if total == 0 {
            return policy;
        }
        for (action, visits) in self.root_visits() {
            policy[game.action_index(action)] = visits as f32 / total as f32;
        }
        policy
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            materialised_nodes: self.nodes.iter().filter(|n| n.is_materialised()).count(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self
                .nodes
                .iter()
                .filter(|n| n.visit_count > 0)
                .map(|n| n.depth)
                .max()
                .unwrap_or(0),
        }
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub materialised_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}
