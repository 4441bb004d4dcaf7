pub mod break_ledger;
pub mod distance;
pub mod proximity;
pub mod session_timer;
