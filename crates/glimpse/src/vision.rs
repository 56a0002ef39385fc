pub mod base;
pub mod google;

#[cfg(test)]
pub mod mock;
