use std::fmt::{self, Display, Formatter};

pub(crate) type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;
pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, BuildHasher>;
pub(crate) type HashSet<K> = hashbrown::HashSet<K, BuildHasher>;
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasher>;

/// Displays each element of a slice separated by the given string.
pub struct ListDisplay<'a, T>(pub &'a [T], pub &'a str);

impl<T: Display> Display for ListDisplay<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(self.1)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Hashes a value with the Fx hasher used by the crate's maps.
pub(crate) fn fx_hash<T: std::hash::Hash + ?Sized>(value: &T) -> u64 {
    use std::hash::{BuildHasher as _, Hasher};
    let mut hasher = BuildHasher::default().build_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}
