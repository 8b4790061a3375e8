//! Items used by the code `#[derive(Object)]` expands into.
//!
//! Not part of the public API.

pub use crate::convert::{FromValue, ToValue};

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::{ObjectType, TypeRegistry};

    /// A registration function submitted by `#[object(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: ObjectType> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    // Runs only when `inventory` works on this platform.
    fn __mark_available(registry: &mut TypeRegistry) {
        registry.mark_auto_registered();
    }

    inventory::submit! {
        __AutoRegisterFunc(__mark_available)
    }

    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
