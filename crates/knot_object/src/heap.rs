use slotmap::SlotMap;

use crate::object::Object;

slotmap::new_key_type! {
    /// Handle of an object stored in an [`ObjectHeap`].
    ///
    /// The handle is the object's identity: copies of a handle refer to the
    /// same object.
    pub struct ObjectId;
}

// -----------------------------------------------------------------------------
// ObjectHeap

/// Arena owning every object of a value graph.
///
/// Objects refer to each other through [`ObjectId`], which makes shared and
/// cyclic references plain data.
///
/// # Examples
///
/// ```
/// use knot_object::{ObjectHeap, FixedArray};
///
/// let mut heap = ObjectHeap::new();
/// let id = heap.insert(FixedArray::new(2));
///
/// assert!(heap.contains(id));
/// assert_eq!(heap.get_as::<FixedArray>(id).unwrap().size(), 2);
///
/// heap.remove(id);
/// assert!(heap.is_empty());
/// ```
#[derive(Default)]
pub struct ObjectHeap {
    objects: SlotMap<ObjectId, Box<dyn Object>>,
}

impl ObjectHeap {
    #[inline]
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    #[inline]
    pub fn insert<T: Object>(&mut self, object: T) -> ObjectId {
        self.objects.insert(Box::new(object))
    }

    #[inline]
    pub fn insert_boxed(&mut self, object: Box<dyn Object>) -> ObjectId {
        self.objects.insert(object)
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&dyn Object> {
        self.objects.get(id).map(|b| &**b)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn Object> {
        match self.objects.get_mut(id) {
            Some(b) => Some(&mut **b),
            None => None,
        }
    }

    /// Returns the object as `T`, or `None` if absent or of another type.
    #[inline]
    pub fn get_as<T: Object>(&self, id: ObjectId) -> Option<&T> {
        self.get(id)?.downcast_ref::<T>()
    }

    #[inline]
    pub fn get_as_mut<T: Object>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.get_mut(id)?.downcast_mut::<T>()
    }

    #[inline]
    pub fn remove(&mut self, id: ObjectId) -> Option<Box<dyn Object>> {
        self.objects.remove(id)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &dyn Object)> {
        self.objects.iter().map(|(id, b)| (id, &**b))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ObjectHeap;
    use crate::builtin::FixedArray;
    use crate::value::Value;

    #[test]
    fn stale_ids_are_rejected() {
        let mut heap = ObjectHeap::new();
        let a = heap.insert(FixedArray::new(1));
        heap.remove(a);
        let b = heap.insert(FixedArray::new(1));

        assert_ne!(a, b);
        assert!(heap.get(a).is_none());
        assert!(heap.get(b).is_some());
    }

    #[test]
    fn typed_access() {
        let mut heap = ObjectHeap::new();
        let id = heap.insert(FixedArray::new(1));
        heap.get_as_mut::<FixedArray>(id)
            .unwrap()
            .set(0, Value::Int(1))
            .unwrap();

        assert_eq!(heap.get_as::<FixedArray>(id).unwrap().get(0), Some(&Value::Int(1)));
        assert_eq!(heap.iter().count(), 1);
    }
}
