//! Fixed-size mapping from piece index to the object that renders it.
//!
//! Index `i` names the same piece for the whole session: slots are filled
//! once during session start and never removed or reordered.

use crate::error::{CubeError, CubeResult};

#[derive(Debug, Clone)]
pub struct PieceRegistry<T> {
    slots: Vec<Option<T>>,
}

impl<T> PieceRegistry<T> {
    /// Empty registry with `capacity` slots (`order^3` for an `order`-layer cube)
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Store the object for `index`. Each slot accepts exactly one object.
    pub fn register(&mut self, index: usize, object: T) -> CubeResult<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(CubeError::IndexOutOfRange { index, len })?;
        if slot.is_some() {
            return Err(CubeError::AlreadyRegistered(index));
        }
        *slot = Some(object);
        Ok(())
    }

    pub fn get(&self, index: usize) -> CubeResult<&T> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(CubeError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            })
    }

    pub fn get_mut(&mut self, index: usize) -> CubeResult<&mut T> {
        let len = self.slots.len();
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(CubeError::IndexOutOfRange { index, len })
    }

    /// Fixed capacity, independent of how many slots are filled
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Registered objects in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|object| (index, object)))
    }
}
