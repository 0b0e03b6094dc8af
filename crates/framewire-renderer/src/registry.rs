use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

use framewire_common::protocol::ObjectRegistration;

/// Process-wide table of exposed object registrations, keyed by name.
///
/// Safe under concurrent registration, unregistration and snapshot reads.
/// The store never touches a script context; materialization is the
/// lifecycle manager's job.
#[derive(Default)]
pub struct RegistryStore {
    entries: Mutex<HashMap<String, ObjectRegistration>>,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `info` unless an entry for its name already exists. Returns
    /// whether it was newly added.
    pub fn register(&self, info: ObjectRegistration) -> bool {
        let mut entries = self.entries.lock().unwrap();
        match entries.entry(info.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(info);
                true
            }
        }
    }

    /// Atomically removes and returns the entry for `name`, if present.
    pub fn unregister(&self, name: &str) -> Option<ObjectRegistration> {
        self.entries.lock().unwrap().remove(name)
    }

    /// Consistent point-in-time copy of every live registration, for
    /// materialization into a newly created context.
    pub fn snapshot(&self) -> Vec<ObjectRegistration> {
        self.entries.lock().unwrap().values().cloned().collect()
    }
}
