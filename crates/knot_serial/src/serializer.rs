use std::sync::Arc;

use knot_object::{ObjectHeap, TypeRegistry, Value};

use crate::config::SerializerConfig;
use crate::driver::Decoder;
use crate::error::{Error, SerializeError, UnserializeError};
use crate::ir::Node;
use crate::strategy::{NativeStrategy, Strategy};
use crate::walker::Encoder;

#[cfg(feature = "json")]
use crate::strategy::JsonStrategy;
#[cfg(feature = "xml")]
use crate::strategy::XmlStrategy;

// -----------------------------------------------------------------------------
// Serializer

/// Serializes value graphs through a [`Strategy`].
///
/// A serializer is immutable once built. Each call works on its own state,
/// so one instance can serve many threads.
///
/// # Examples
///
/// ```
/// use knot_object::{Array, ObjectHeap, Value};
/// use knot_serial::NativeSerializer;
///
/// let serializer = NativeSerializer::default();
/// let mut heap = ObjectHeap::new();
///
/// let list: Array = [1, 2, 3].into_iter().collect();
/// let tree = serializer.serialize(&heap, &Value::Array(list.clone())).unwrap();
///
/// let back = serializer.unserialize(&mut heap, tree).unwrap();
/// assert_eq!(back, Value::Array(list));
/// ```
#[derive(Debug, Clone)]
pub struct Serializer<S> {
    strategy: S,
    registry: Arc<TypeRegistry>,
    config: SerializerConfig,
}

/// Produces the native [`Tree`](crate::Tree).
pub type NativeSerializer = Serializer<NativeStrategy>;

/// Produces JSON text.
#[cfg(feature = "json")]
pub type JsonSerializer = Serializer<JsonStrategy>;

/// Produces an XML document.
#[cfg(feature = "xml")]
pub type XmlSerializer = Serializer<XmlStrategy>;

impl<S: Strategy + Default> Default for Serializer<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Strategy> Serializer<S> {
    /// Creates a serializer knowing the built-in types, plus every
    /// `auto_register` type when that feature is on.
    pub fn new(strategy: S) -> Self {
        #[cfg_attr(not(feature = "auto_register"), expect(unused_mut))]
        let mut registry = TypeRegistry::new();
        #[cfg(feature = "auto_register")]
        registry.auto_register();
        Self::with_registry(strategy, Arc::new(registry))
    }

    #[inline]
    pub fn with_registry(strategy: S, registry: Arc<TypeRegistry>) -> Self {
        Self {
            strategy,
            registry,
            config: SerializerConfig::new(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Builds the intermediate representation of `value`.
    pub fn to_ir(&self, heap: &ObjectHeap, value: &Value) -> Result<Node, SerializeError> {
        let mut encoder = Encoder::new(heap, self.config.limits);
        let node = encoder.encode(value)?;
        log::debug!(
            "serialized {} nodes, {} distinct objects",
            encoder.nodes(),
            encoder.objects()
        );
        Ok(node)
    }

    /// Rebuilds a value from its intermediate representation, allocating
    /// objects in `heap`.
    ///
    /// On error, the objects allocated by this call are removed again.
    pub fn from_ir(&self, heap: &mut ObjectHeap, node: Node) -> Result<Value, UnserializeError> {
        let mut decoder = Decoder::new(heap, &self.registry, &self.config);
        let value = decoder.run(node)?;
        log::debug!(
            "unserialized {} nodes, {} objects restored",
            decoder.nodes(),
            decoder.objects()
        );
        Ok(value)
    }

    pub fn serialize(&self, heap: &ObjectHeap, value: &Value) -> Result<S::Output, Error> {
        let node = self.to_ir(heap, value)?;
        Ok(self.strategy.encode(&node)?)
    }

    pub fn unserialize(&self, heap: &mut ObjectHeap, output: S::Output) -> Result<Value, Error> {
        let node = self.strategy.decode(output)?;
        Ok(self.from_ir(heap, node)?)
    }
}
