pub mod file;
pub mod storage;
pub mod time;
pub mod validation;
