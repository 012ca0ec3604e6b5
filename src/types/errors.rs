use std::fmt;

/// Possible errors returned by methods on a [Tree](crate::Tree). All of
/// them are raised at the call that supplied the offending argument, the
/// tree is left untouched.
///
/// Note that a duplicate insert is not an error, it is reported through
/// [InsertResult::DuplicateInsert](crate::InsertResult::DuplicateInsert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixTreeError {
    /// The supplied text is not an IPv4 prefix in `A.B.C.D/n` (or bare
    /// `A.B.C.D`) notation: the address does not parse, the length is
    /// outside 0-32, bits are set to the right of the prefix length, or it
    /// is an IPv6 prefix. Also returned for a bit path that contains
    /// anything but `0` and `1`, or more than 32 of them.
    InvalidPrefix(String),
    /// The requested prefix length cannot exist in IPv4.
    PrefixLengthInvalid(u8),
    /// The node id does not belong to this tree.
    NodeNotFound,
    /// The requested link would make a node its own ancestor, or would
    /// put nodes deeper than 32 levels below the top of the tree.
    InvalidLink,
}

impl std::error::Error for PrefixTreeError {}

impl fmt::Display for PrefixTreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrefixTreeError::InvalidPrefix(s) => {
                write!(f, "Error: Cannot parse {:?} as an IPv4 prefix.", s)
            }
            PrefixTreeError::PrefixLengthInvalid(len) => {
                write!(
                    f,
                    "Error: The specified Prefix length /{} is invalid.",
                    len
                )
            }
            PrefixTreeError::NodeNotFound => {
                write!(f, "Error: Node not found.")
            }
            PrefixTreeError::InvalidLink => {
                write!(
                    f,
                    "Error: A node cannot become a child of itself or of \
                    one of its descendants, or hang more than 32 levels \
                    deep."
                )
            }
        }
    }
}
