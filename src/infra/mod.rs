pub mod error;
pub mod logging;
pub mod storage_layout;
