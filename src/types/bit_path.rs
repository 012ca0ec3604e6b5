use std::str::FromStr;

use crate::types::errors::PrefixTreeError;
use crate::types::Cidr;

pub(crate) const MAX_LEN: u8 = 32;

//------------ BitPath -------------------------------------------------------

// A bit path is the sequence of left (0) and right (1) turns from the root
// of the trie to a node. The turns are kept right-aligned in a u32, so the
// first turn taken from the root is bit `len - 1` and the last turn is bit
// 0. Since the trie is never deeper than 32 levels a u32 always fits.
//
// Rendered as a string of '0' and '1' characters, the root has the empty
// path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitPath {
    bits: u32,
    len: u8,
}

impl BitPath {
    /// The empty path, i.e. the path to the root.
    pub fn new() -> Self {
        Self { bits: 0, len: 0 }
    }

    pub(crate) fn from_raw(bits: u32, len: u8) -> Self {
        debug_assert!(len <= MAX_LEN);
        Self {
            bits: bits & low_mask(len),
            len,
        }
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The turns as a right-aligned integer.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// The turn taken at depth `i`, counting from the root. Returns `None`
    /// if the path is not that long.
    pub fn get(&self, i: u8) -> Option<u8> {
        if i >= self.len {
            return None;
        }
        Some(((self.bits >> (self.len - 1 - i)) & 1) as u8)
    }

    /// Append one turn at the deep end of the path.
    pub(crate) fn push(&mut self, bit: u8) {
        debug_assert!(self.len < MAX_LEN);
        debug_assert!(bit < 2);
        self.bits = (self.bits << 1) | (bit as u32 & 1);
        self.len += 1;
    }

    /// Keep only the first `len` turns.
    pub fn truncate(self, len: u8) -> Self {
        if len >= self.len {
            return self;
        }
        Self {
            bits: self.bits.checked_shr((self.len - len) as u32).unwrap_or(0),
            len,
        }
    }

    /// The turns from the root downwards.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    /// The path as a left-aligned network address, i.e. all bits after the
    /// path zeroed.
    pub(crate) fn to_net(self) -> u32 {
        self.bits.checked_shl((MAX_LEN - self.len) as u32).unwrap_or(0)
    }

    /// Render this path as the block of length `prefix_len` it leads to.
    /// Missing turns are filled out with zeros, turns beyond `prefix_len`
    /// are dropped, so the result is always a network address with the
    /// host bits cleared.
    pub fn to_cidr(self, prefix_len: u8) -> Result<Cidr, PrefixTreeError> {
        if prefix_len > MAX_LEN {
            return Err(PrefixTreeError::PrefixLengthInvalid(prefix_len));
        }
        Ok(Cidr::from_raw(self.truncate(prefix_len).to_net(), prefix_len))
    }
}

/// Render the bit string `path` as `A.B.C.D/prefix_len`, see
/// [BitPath::to_cidr].
///
/// ```
/// use prefix_gaptree::path_to_dot_quad;
///
/// assert_eq!(path_to_dot_quad("1111", 4).unwrap(), "240.0.0.0/4");
/// assert_eq!(
///     path_to_dot_quad("10100111111", 16).unwrap(),
///     "167.224.0.0/16"
/// );
/// ```
pub fn path_to_dot_quad(
    path: &str,
    prefix_len: u8,
) -> Result<String, PrefixTreeError> {
    let path = BitPath::from_str(path)?;
    Ok(path.to_cidr(prefix_len)?.to_string())
}

// All ones in the lowest `len` bits.
fn low_mask(len: u8) -> u32 {
    1_u32
        .checked_shl(len as u32)
        .map_or(u32::MAX, |m| m.wrapping_sub(1))
}

impl FromStr for BitPath {
    type Err = PrefixTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_LEN as usize {
            return Err(PrefixTreeError::InvalidPrefix(s.to_string()));
        }
        let mut path = BitPath::new();
        for c in s.chars() {
            match c {
                '0' => path.push(0),
                '1' => path.push(1),
                _ => return Err(PrefixTreeError::InvalidPrefix(s.to_string())),
            }
        }
        Ok(path)
    }
}

impl std::fmt::Display for BitPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.len == 0 {
            return Ok(());
        }
        write!(f, "{:0width$b}", self.bits, width = self.len as usize)
    }
}

impl std::fmt::Binary for BitPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032b} (len {})", self.bits, self.len)
    }
}
