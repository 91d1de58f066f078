pub mod bank;
pub mod binary;
pub mod rom;

pub use bank::{RomBank, BANK_SIZE, PAD_VALUE};
pub use binary::{HEADER_SIZE, INES_MAGIC};
pub use rom::{HeaderSettings, RomGenerator};
