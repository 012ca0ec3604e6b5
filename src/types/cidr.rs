use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use inetnum::addr::Prefix;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::bit_path::{BitPath, MAX_LEN};
use crate::types::errors::PrefixTreeError;

//------------ Cidr ----------------------------------------------------------

/// An IPv4 address block: a network address with all bits after the prefix
/// length cleared, and the prefix length.
///
/// Cidrs order by network address first and prefix length second, so a
/// sorted list has every supernet right in front of its subnets.
///
/// ```
/// use prefix_gaptree::Cidr;
///
/// let c: Cidr = "192.168.0.0/23".parse().unwrap();
/// assert_eq!(c.len(), 23);
/// assert_eq!(c.to_string(), "192.168.0.0/23");
/// assert!("192.168.1.0/23".parse::<Cidr>().is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cidr {
    net: u32,
    len: u8,
}

impl Cidr {
    /// Create a Cidr, refusing host bits set beyond `len`.
    pub fn new(addr: Ipv4Addr, len: u8) -> Result<Self, PrefixTreeError> {
        let pfx = Prefix::new(IpAddr::V4(addr), len).map_err(|_| {
            PrefixTreeError::InvalidPrefix(format!("{}/{}", addr, len))
        })?;
        Self::try_from(pfx)
    }

    /// Create a Cidr, clearing any host bits set beyond `len`.
    pub fn new_relaxed(
        addr: Ipv4Addr,
        len: u8,
    ) -> Result<Self, PrefixTreeError> {
        if len > MAX_LEN {
            return Err(PrefixTreeError::PrefixLengthInvalid(len));
        }
        Ok(Self::from_raw(u32::from(addr), len))
    }

    pub(crate) fn from_raw(net: u32, len: u8) -> Self {
        debug_assert!(len <= MAX_LEN);
        Self {
            net: net & net_mask(len),
            len,
        }
    }

    /// The block covering the whole address space, `0.0.0.0/0`.
    pub fn default_route() -> Self {
        Self { net: 0, len: 0 }
    }

    pub fn net(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.net)
    }

    pub fn bits(&self) -> u32 {
        self.net
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u8 {
        self.len
    }

    /// The left/right turns that lead from the root of a trie to this
    /// block.
    pub fn bit_path(&self) -> BitPath {
        BitPath::from_raw(
            self.net.checked_shr((MAX_LEN - self.len) as u32).unwrap_or(0),
            self.len,
        )
    }

    /// The lower half of this block, `None` for a host route.
    pub fn left_half(&self) -> Option<Self> {
        if self.len == MAX_LEN {
            return None;
        }
        Some(Self {
            net: self.net,
            len: self.len + 1,
        })
    }

    /// The upper half of this block, `None` for a host route.
    pub fn right_half(&self) -> Option<Self> {
        if self.len == MAX_LEN {
            return None;
        }
        Some(Self {
            net: self.net | (1 << (MAX_LEN - self.len - 1)),
            len: self.len + 1,
        })
    }

    /// The first (lowest) block of length `len` inside this block. Returns
    /// `None` if `len` is shorter than our own length, or invalid.
    pub fn first_subnet(&self, len: u8) -> Option<Self> {
        if len < self.len || len > MAX_LEN {
            return None;
        }
        Some(Self { net: self.net, len })
    }

    /// Whether `other` lies inside this block (or is this block).
    pub fn covers(&self, other: &Cidr) -> bool {
        other.len >= self.len && other.net & net_mask(self.len) == self.net
    }
}

// All ones in the highest `len` bits.
fn net_mask(len: u8) -> u32 {
    u32::MAX.checked_shl((MAX_LEN - len) as u32).unwrap_or(0)
}

impl TryFrom<Prefix> for Cidr {
    type Error = PrefixTreeError;

    fn try_from(pfx: Prefix) -> Result<Self, Self::Error> {
        let invalid = |addr: IpAddr| {
            PrefixTreeError::InvalidPrefix(format!("{}/{}", addr, pfx.len()))
        };
        match pfx.addr() {
            IpAddr::V4(addr) if pfx.len() <= MAX_LEN => {
                let cidr = Self::from_raw(u32::from(addr), pfx.len());
                if cidr.net != u32::from(addr) {
                    return Err(invalid(pfx.addr()));
                }
                Ok(cidr)
            }
            addr => Err(invalid(addr)),
        }
    }
}

impl FromStr for Cidr {
    type Err = PrefixTreeError;

    // A bare address is a host route.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PrefixTreeError::InvalidPrefix(s.to_string());

        let pfx = if s.contains('/') {
            Prefix::from_str(s).map_err(|_| invalid())?
        } else {
            let addr = Ipv4Addr::from_str(s).map_err(|_| invalid())?;
            Prefix::new(IpAddr::V4(addr), MAX_LEN).map_err(|_| invalid())?
        };

        Self::try_from(pfx).map_err(|_| invalid())
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.net(), self.len)
    }
}

impl Serialize for Cidr {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Cidr::from_str(&s).map_err(serde::de::Error::custom)
    }
}
