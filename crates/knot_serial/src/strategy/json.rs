use serde_core::de::DeserializeSeed;

use super::Strategy;
use crate::config::Limits;
use crate::error::StrategyError;
use crate::ir::Node;
use crate::tree::{Tree, TreeSeed};

/// JSON text of the native [`Tree`].
///
/// Non-finite floats are written as `null`. Reading does not use the
/// recursion limit of `serde_json`; nesting is bounded by
/// [`with_max_depth`](JsonStrategy::with_max_depth) instead, which by default
/// fits any graph within [`Limits::DEFAULT`].
#[derive(Debug, Clone, Copy)]
pub struct JsonStrategy {
    pretty: bool,
    max_depth: usize,
}

impl Default for JsonStrategy {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStrategy {
    #[inline]
    pub const fn new() -> Self {
        Self {
            pretty: false,
            max_depth: Limits::DEFAULT.document_depth(),
        }
    }

    #[inline]
    pub const fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::new()
        }
    }

    #[inline]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// The deepest nesting of arrays and objects accepted when reading.
    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Strategy for JsonStrategy {
    type Output = String;

    fn encode(&self, node: &Node) -> Result<String, StrategyError> {
        let tree = Tree::from_node(node)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&tree)?
        } else {
            serde_json::to_string(&tree)?
        };
        Ok(text)
    }

    fn decode(&self, output: String) -> Result<Node, StrategyError> {
        let mut deserializer = serde_json::Deserializer::from_str(&output);
        deserializer.disable_recursion_limit();
        let tree = TreeSeed::new(self.max_depth).deserialize(&mut deserializer)?;
        deserializer.end()?;
        tree.into_node()
    }
}

// -----------------------------------------------------------------------------
// Tests
