//! Staff user profiles

pub mod ports;

pub use ports::UserProfileRepository;
