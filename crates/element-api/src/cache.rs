// Folder-scoped cache mapping vendor serial numbers to device addresses.
//
// The platform never exposes the serial number as a queryable identifier, so
// mappings are discovered opportunistically (device metadata, reading
// probes) and remembered for the lifetime of the client. The cache is a pure
// optimization: everything it answers is re-derivable from the API.

use std::collections::HashMap;

/// Append-only mapping `folder slug -> (decentlab id -> address)`.
///
/// The reverse view (address -> id) is computed by scanning the forward map,
/// never stored, so the two views cannot diverge. Entries are inserted once
/// and never overwritten or evicted; within a folder the mapping is a
/// bijection once both sides of a pair are known.
#[derive(Debug, Default)]
pub(crate) struct IdCache {
    folders: HashMap<String, HashMap<u64, String>>,
}

impl IdCache {
    /// Forward lookup: cached address for `decentlab_id` in `folder`.
    pub(crate) fn address(&self, folder: &str, decentlab_id: u64) -> Option<&str> {
        self.folders
            .get(folder)?
            .get(&decentlab_id)
            .map(String::as_str)
    }

    /// Reverse lookup: cached id for `address` in `folder`.
    ///
    /// Derived by inverting the forward map on the fly. Addresses are
    /// compared exactly as the API returned them (case-preserving).
    pub(crate) fn decentlab_id(&self, folder: &str, address: &str) -> Option<u64> {
        self.folders
            .get(folder)?
            .iter()
            .find(|(_, addr)| addr.as_str() == address)
            .map(|(id, _)| *id)
    }

    /// Whether `address` already appears in the folder's cached mappings.
    ///
    /// Used by the probe loop to skip devices whose id is already known.
    pub(crate) fn contains_address(&self, folder: &str, address: &str) -> bool {
        self.decentlab_id(folder, address).is_some()
    }

    /// Record a discovered mapping. First insertion wins; an id that is
    /// already present keeps its existing address.
    pub(crate) fn insert(&mut self, folder: &str, decentlab_id: u64, address: String) {
        self.folders
            .entry(folder.to_owned())
            .or_default()
            .entry(decentlab_id)
            .or_insert(address);
    }
}
