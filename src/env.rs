use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only variable lookup consulted when a reference is not defined
/// earlier in the same input.
pub trait VarSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

/// A lookup with no variables, for parsing without ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmptyEnv;

impl VarSource for EmptyEnv {
    fn var(&self, _name: &str) -> Option<String> {
        None
    }
}

impl<S: BuildHasher> VarSource for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl VarSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: VarSource + ?Sized> VarSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Where [`EnvLoader`](crate::EnvLoader) writes the variables it loads.
///
/// The target also serves as the [`VarSource`] fallback while loading, so
/// references in a file resolve against what the target already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEnv {
    kind: TargetEnvKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TargetEnvKind {
    /// The live process environment, read and written through `std::env`.
    Process,
    /// A private map; nothing outside the loader sees it.
    Memory(BTreeMap<String, String>),
}

impl Default for TargetEnv {
    fn default() -> Self {
        Self::memory()
    }
}

impl TargetEnv {
    /// Target the process environment.
    ///
    /// # Safety
    ///
    /// Loading into this target calls [`std::env::set_var`]. No other thread
    /// may read or write the process environment while a load runs.
    pub unsafe fn process() -> Self {
        Self {
            kind: TargetEnvKind::Process,
        }
    }

    /// Create an empty in-memory target.
    pub fn memory() -> Self {
        Self::from_memory(BTreeMap::new())
    }

    /// Create an in-memory target seeded with existing variables.
    pub fn from_memory(map: BTreeMap<String, String>) -> Self {
        Self {
            kind: TargetEnvKind::Memory(map),
        }
    }

    pub fn is_process(&self) -> bool {
        matches!(self.kind, TargetEnvKind::Process)
    }

    pub fn as_memory(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            TargetEnvKind::Memory(map) => Some(map),
            TargetEnvKind::Process => None,
        }
    }

    pub fn into_memory(self) -> Option<BTreeMap<String, String>> {
        match self.kind {
            TargetEnvKind::Memory(map) => Some(map),
            TargetEnvKind::Process => None,
        }
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        match &self.kind {
            TargetEnvKind::Process => ProcessEnv.var(key).is_some(),
            TargetEnvKind::Memory(map) => map.contains_key(key),
        }
    }

    /// Whether `key` and `value` can be stored without `set_var` panicking.
    /// Memory targets take any pair.
    pub(crate) fn accepts(&self, key: &str, value: &str) -> bool {
        match &self.kind {
            TargetEnvKind::Process => {
                !key.is_empty() && !key.contains(['=', '\0']) && !value.contains('\0')
            }
            TargetEnvKind::Memory(_) => true,
        }
    }

    pub(crate) fn set_var(&mut self, key: &str, value: &str) {
        match &mut self.kind {
            // SAFETY: upheld by the caller of `TargetEnv::process`; `accepts`
            // has already ruled out the inputs `set_var` panics on.
            TargetEnvKind::Process => unsafe { std::env::set_var(key, value) },
            TargetEnvKind::Memory(map) => {
                map.insert(key.to_owned(), value.to_owned());
            }
        }
    }
}

impl VarSource for TargetEnv {
    fn var(&self, name: &str) -> Option<String> {
        match &self.kind {
            TargetEnvKind::Process => ProcessEnv.var(name),
            TargetEnvKind::Memory(map) => map.var(name),
        }
    }
}

/// Lookup that consults `first`, then `second`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Chain<A, B> {
    pub(crate) first: A,
    pub(crate) second: B,
}

impl<A: VarSource, B: VarSource> VarSource for Chain<A, B> {
    fn var(&self, name: &str) -> Option<String> {
        self.first.var(name).or_else(|| self.second.var(name))
    }
}
