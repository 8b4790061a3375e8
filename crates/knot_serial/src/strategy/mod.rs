//! Output formats of the intermediate representation.

use crate::error::StrategyError;
use crate::ir::Node;

// -----------------------------------------------------------------------------
// Modules

mod native;

#[cfg(feature = "json")]
mod json;

#[cfg(feature = "xml")]
mod xml;

// -----------------------------------------------------------------------------
// Exports

pub use native::NativeStrategy;

#[cfg(feature = "json")]
pub use json::JsonStrategy;

#[cfg(feature = "xml")]
pub use xml::XmlStrategy;

// -----------------------------------------------------------------------------
// Strategy

/// Converts between the intermediate representation and a concrete output.
///
/// A strategy is stateless across calls. `decode(encode(node))` yields a
/// node equal to `node`, floats that are not finite aside.
pub trait Strategy {
    type Output;

    fn encode(&self, node: &Node) -> Result<Self::Output, StrategyError>;

    fn decode(&self, output: Self::Output) -> Result<Node, StrategyError>;
}
