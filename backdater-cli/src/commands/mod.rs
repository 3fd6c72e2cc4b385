pub mod commit;
pub mod interactive;
pub mod log;
pub mod status;
