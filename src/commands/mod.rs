pub mod cycles;
pub mod init;
