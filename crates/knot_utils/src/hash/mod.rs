//! Hash containers with a fixed hashing seed, built on *hashbrown* and *foldhash*.
//!
//! All containers in the workspace use [`FixedHashState`], so iteration order of
//! a map depends only on its content and insertion history, never on process
//! randomness.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6B6E_6F74_5EED_0001);

/// A hasher whose results depend only on the input.
///
/// Created through [`FixedHashState::build_hasher`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state based upon a fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use knot_utils::hash::FixedHashState;
///
/// let mut a = FixedHashState.build_hasher();
/// let mut b = FixedHashState.build_hasher();
/// "knot".hash(&mut a);
/// "knot".hash(&mut b);
///
/// assert_eq!(a.finish(), b.finish());
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Containers

/// [`hashbrown::HashMap`] with [`FixedHashState`] as the hashing provider.
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// [`hashbrown::HashSet`] with [`FixedHashState`] as the hashing provider.
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

/// Creates an empty [`HashMap`].
///
/// Usable in `const` contexts, unlike [`Default::default`].
#[inline]
pub const fn new_map<K, V>() -> HashMap<K, V> {
    hashbrown::HashMap::with_hasher(FixedHashState)
}

/// Creates an empty [`HashMap`] with room for at least `capacity` entries.
#[inline]
pub fn map_with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
    hashbrown::HashMap::with_capacity_and_hasher(capacity, FixedHashState)
}

/// Creates an empty [`HashSet`].
#[inline]
pub const fn new_set<T>() -> HashSet<T> {
    hashbrown::HashSet::with_hasher(FixedHashState)
}

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// Tests
