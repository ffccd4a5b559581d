pub mod contracts;
pub mod gateway;
pub mod session;
