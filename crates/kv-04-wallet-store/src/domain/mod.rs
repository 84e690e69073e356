//! # Domain Layer

mod deposit;
mod names;
mod network;
pub(crate) mod records;

pub use deposit::{DepositData, DEPOSIT_AMOUNT_GWEI};
pub(crate) use deposit::build_deposit_data;
pub use names::{validate_name, MAX_NAME_LEN};
pub use network::Network;
