//! Signed-in session and module access

pub mod gate;
pub mod ports;

pub use gate::SessionGate;
pub use ports::SessionStore;
