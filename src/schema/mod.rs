pub mod pos;
pub mod word;
