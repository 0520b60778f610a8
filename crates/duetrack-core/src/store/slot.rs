//! Storage slot trait and the in-memory slot.

use parking_lot::Mutex;

use crate::error::StorageError;

/// A single string-valued storage slot.
///
/// Reads return `None` until the first write. Writes replace the whole value.
/// There are no transactions; the tracker only ever does read-modify-write of
/// one serialized blob.
pub trait SlotStorage: Send {
    /// Read the slot's current value.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the slot's value.
    fn write(&self, value: &str) -> Result<(), StorageError>;

    /// Remove the slot's value. Clearing an empty slot succeeds.
    fn clear(&self) -> Result<(), StorageError>;

    /// Short backend name for logs.
    fn describe(&self) -> String;
}

/// In-memory slot with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
    capacity: Option<usize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that rejects writes longer than `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            value: Mutex::new(None),
            capacity: Some(capacity),
        }
    }

    /// A slot that starts out holding `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
            capacity: None,
        }
    }

    /// Raw contents, for inspecting what was persisted.
    pub fn contents(&self) -> Option<String> {
        self.value.lock().clone()
    }
}

impl SlotStorage for MemorySlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.lock().clone())
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        if let Some(capacity) = self.capacity {
            if value.len() > capacity {
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    capacity,
                });
            }
        }
        *self.value.lock() = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.value.lock() = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
