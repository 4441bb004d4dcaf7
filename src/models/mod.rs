pub mod break_record;
pub mod geo;
pub mod payload;
pub mod session;
pub mod status;
pub mod work_mode;
