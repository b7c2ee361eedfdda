//! The two groups of agents.

/// Which group an agent belongs to.
///
/// Side A proposes during deferred acceptance; side B accepts or rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// The proposing group
    #[default]
    A,
    /// The accepting group
    B,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Printable label for agent `index` of this side in an instance of `size`.
    ///
    /// Side A counts up from `A`; side B ends at `z`, so for size 3 side B is
    /// `x y z`.
    pub fn letter(self, index: usize, size: usize) -> char {
        let code = match self {
            Side::A => b'A' as usize + index,
            Side::B => (b'z' as usize + 1 + index).saturating_sub(size),
        };
        u8::try_from(code).map(char::from).unwrap_or('?')
    }
}
