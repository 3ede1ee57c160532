//! Commands - the operator-facing entry points, one module per ERP area

mod admin;
mod audit;
mod billing;
mod crm;
mod database;
mod health;
mod inventory;
mod production;
mod session;

pub use admin::*;
pub use audit::*;
pub use billing::*;
pub use crm::*;
pub use database::*;
pub use health::*;
pub use inventory::*;
pub use production::*;
pub use session::*;
