pub(crate) mod bit_path;
pub(crate) mod cidr;

pub use bit_path::{path_to_dot_quad, BitPath};
pub use cidr::Cidr;

pub mod errors;
pub mod stats;

#[cfg(test)]
mod tests;
