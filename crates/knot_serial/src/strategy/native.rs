use super::Strategy;
use crate::error::StrategyError;
use crate::ir::Node;
use crate::tree::Tree;

/// Produces the native nested [`Tree`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeStrategy;

impl NativeStrategy {
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl Strategy for NativeStrategy {
    type Output = Tree;

    #[inline]
    fn encode(&self, node: &Node) -> Result<Tree, StrategyError> {
        Tree::from_node(node)
    }

    #[inline]
    fn decode(&self, output: Tree) -> Result<Node, StrategyError> {
        output.into_node()
    }
}
