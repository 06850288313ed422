//! Token store
//!
//! Maps caller-chosen identities to previously active tokens so a token can
//! be stashed before entering a sub-context and restored afterwards.

use std::any::{Any, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

type DynKey = dyn Any + Send + Sync;

/// Type-erased identity: equal only to keys of the same type that compare equal
pub struct TokenKey {
    type_id: TypeId,
    hash: u64,
    value: Box<DynKey>,
    eq: fn(&DynKey, &DynKey) -> bool,
}

fn key_eq<K: Eq + 'static>(a: &DynKey, b: &DynKey) -> bool {
    match (a.downcast_ref::<K>(), b.downcast_ref::<K>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl TokenKey {
    pub fn new<K: Hash + Eq + Send + Sync + 'static>(key: K) -> Self {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Self {
            type_id: TypeId::of::<K>(),
            hash: hasher.finish(),
            value: Box::new(key),
            eq: key_eq::<K>,
        }
    }
}

impl PartialEq for TokenKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
            && self.hash == other.hash
            && (self.eq)(self.value.as_ref(), other.value.as_ref())
    }
}

impl Eq for TokenKey {}

impl Hash for TokenKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKey")
            .field("type_id", &self.type_id)
            .field("hash", &self.hash)
            .finish()
    }
}

/// Identity of a value by address, for callers whose natural key is the
/// object itself rather than an id it carries.
///
/// Only meaningful while the value is alive and not moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn of<T: ?Sized>(value: &T) -> Self {
        ObjectId((value as *const T).cast::<()>() as usize)
    }
}

/// Identity → saved token
#[derive(Debug, Default)]
pub struct TokenStore {
    entries: HashMap<TokenKey, String>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `token` under `key`, replacing any earlier entry
    pub fn save(&mut self, key: TokenKey, token: String) {
        self.entries.insert(key, token);
    }

    /// Remove and return the entry for `key`
    pub fn take(&mut self, key: &TokenKey) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &TokenKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
