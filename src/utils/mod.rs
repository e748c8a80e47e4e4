pub mod ata;
pub mod logger;
pub mod math;
