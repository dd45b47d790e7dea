//! Ownership-polymorphic wrapper around a layer's destination.
//!
//! A composing writer does not care whether it owns the writer underneath
//! it or merely references one that outlives it; [`Dependency`] captures
//! that choice at construction and exposes a uniform view.
//!
//! Owning variants are finalized by the layer holding the dependency
//! (exactly once, in its `done()` hook); the borrowed variant is never
//! finalized here; the borrow's lifetime makes the outlives obligation
//! explicit.

/// Holder of a destination that is either owned or borrowed.
#[derive(Debug)]
pub enum Dependency<'a, T> {
    /// Owns the destination inline. Its address changes whenever the
    /// enclosing wrapper moves.
    Owned(T),
    /// Owns the destination on the heap; the exposed address survives
    /// moves of the wrapper.
    OwnedBoxed(Box<T>),
    /// References a destination that outlives the wrapper.
    Borrowed(&'a mut T),
}

impl<'a, T> Dependency<'a, T> {
    /// Wrap an owned destination inline.
    pub fn owned(dest: T) -> Self {
        Dependency::Owned(dest)
    }

    /// Wrap an owned destination behind a heap handle.
    pub fn boxed(dest: T) -> Self {
        Dependency::OwnedBoxed(Box::new(dest))
    }

    /// Wrap a borrowed destination.
    pub fn borrowed(dest: &'a mut T) -> Self {
        Dependency::Borrowed(dest)
    }

    /// The underlying destination.
    #[inline]
    pub fn get(&self) -> &T {
        match self {
            Dependency::Owned(dest) => dest,
            Dependency::OwnedBoxed(dest) => dest,
            Dependency::Borrowed(dest) => dest,
        }
    }

    /// Exclusive access to the underlying destination.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        match self {
            Dependency::Owned(dest) => dest,
            Dependency::OwnedBoxed(dest) => dest,
            Dependency::Borrowed(dest) => dest,
        }
    }

    /// Whether this wrapper holds the destination outright.
    #[inline]
    pub fn is_owning(&self) -> bool {
        !matches!(self, Dependency::Borrowed(_))
    }

    /// Whether the exposed address survives a move of the wrapper.
    #[inline]
    pub fn is_stable(&self) -> bool {
        !matches!(self, Dependency::Owned(_))
    }

    /// Extract the destination if it is owned.
    pub fn into_owned(self) -> Option<T> {
        match self {
            Dependency::Owned(dest) => Some(dest),
            Dependency::OwnedBoxed(dest) => Some(*dest),
            Dependency::Borrowed(_) => None,
        }
    }
}

impl<'a, T> From<&'a mut T> for Dependency<'a, T> {
    fn from(dest: &'a mut T) -> Self {
        Dependency::borrowed(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_traits() {
        let dep = Dependency::owned(42u32);
        assert!(dep.is_owning());
        assert!(!dep.is_stable());
        assert_eq!(*dep.get(), 42);
        assert_eq!(dep.into_owned(), Some(42));
    }

    #[test]
    fn test_boxed_traits() {
        let dep = Dependency::boxed(7u32);
        assert!(dep.is_owning());
        assert!(dep.is_stable());
        assert_eq!(dep.into_owned(), Some(7));
    }

    #[test]
    fn test_borrowed_traits() {
        let mut target = 9u32;
        let mut dep = Dependency::borrowed(&mut target);
        assert!(!dep.is_owning());
        assert!(dep.is_stable());
        *dep.get_mut() = 10;
        assert_eq!(dep.into_owned(), None);
        assert_eq!(target, 10);
    }

    #[test]
    fn test_borrowed_drop_leaves_target_alive() {
        let mut target = vec![1u8, 2, 3];
        {
            let dep = Dependency::borrowed(&mut target);
            assert!(!dep.is_owning());
        }
        assert_eq!(target, vec![1, 2, 3]);
    }
}
