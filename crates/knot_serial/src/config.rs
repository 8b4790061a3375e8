use crate::error::LimitError;

// -----------------------------------------------------------------------------
// Limits

/// Bounds on the work a single call may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest nesting of containers and objects.
    pub max_depth: usize,
    /// Most nodes one call may produce or consume; `None` for no bound.
    pub max_nodes: Option<usize>,
}

impl Limits {
    /// Low enough for a debug build to walk and restore a graph this deep on
    /// a 2 MiB thread stack.
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub const DEFAULT: Self = Self {
        max_depth: Self::DEFAULT_MAX_DEPTH,
        max_nodes: None,
    };

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub const fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// The deepest nesting a text document needs for a graph within
    /// `max_depth`.
    ///
    /// Containers and objects take two document levels each (the node and
    /// its entry or property), plus the root and a scalar leaf.
    ///
    /// ```
    /// use knot_serial::Limits;
    ///
    /// assert_eq!(Limits::DEFAULT.with_max_depth(3).document_depth(), 8);
    /// ```
    #[inline]
    pub const fn document_depth(&self) -> usize {
        self.max_depth.saturating_mul(2).saturating_add(2)
    }
}

impl Default for Limits {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

// -----------------------------------------------------------------------------
// UnknownPropertyPolicy

/// What restoration does with a property that no level of the object
/// declares and that has no dynamic store to go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPropertyPolicy {
    /// Drop the property and log a warning.
    #[default]
    Discard,
    /// Fail the call.
    Reject,
}

// -----------------------------------------------------------------------------
// SerializerConfig

/// Runtime configuration of a [`Serializer`](crate::Serializer).
///
/// # Examples
///
/// ```
/// use knot_serial::{Limits, SerializerConfig, UnknownPropertyPolicy};
///
/// let config = SerializerConfig::new()
///     .with_limits(Limits::DEFAULT.with_max_depth(64))
///     .with_unknown_property(UnknownPropertyPolicy::Reject);
///
/// assert_eq!(config.limits.max_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerializerConfig {
    pub limits: Limits,
    pub unknown_property: UnknownPropertyPolicy,
}

impl SerializerConfig {
    #[inline]
    pub const fn new() -> Self {
        Self {
            limits: Limits::DEFAULT,
            unknown_property: UnknownPropertyPolicy::Discard,
        }
    }

    #[inline]
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    #[inline]
    pub const fn with_unknown_property(mut self, policy: UnknownPropertyPolicy) -> Self {
        self.unknown_property = policy;
        self
    }
}

// -----------------------------------------------------------------------------
// Budget

/// Depth and node counters of one call, checked against [`Limits`].
#[derive(Debug)]
pub(crate) struct Budget {
    limits: Limits,
    depth: usize,
    nodes: usize,
}

impl Budget {
    #[inline]
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            depth: 0,
            nodes: 0,
        }
    }

    /// Counts one node.
    #[inline]
    pub fn node(&mut self) -> Result<(), LimitError> {
        self.nodes += 1;
        match self.limits.max_nodes {
            Some(max) if self.nodes > max => Err(LimitError::Nodes(max)),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn enter(&mut self) -> Result<(), LimitError> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(LimitError::Depth(self.limits.max_depth));
        }
        Ok(())
    }

    #[inline]
    pub fn leave(&mut self) {
        self.depth -= 1;
    }

    #[inline]
    pub fn nodes(&self) -> usize {
        self.nodes
    }
}
