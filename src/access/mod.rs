pub mod domain;
pub mod logic;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
