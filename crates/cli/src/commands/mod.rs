//! Command implementations.

mod compute;
mod info;
mod validate;

pub use compute::run_compute;
pub use info::run_info;
pub use validate::run_validate;
