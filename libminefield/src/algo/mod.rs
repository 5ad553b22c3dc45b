pub mod agari;
pub mod danger;
pub mod decompose;
pub mod point;
pub mod tenpai;
pub mod wait;
pub mod yaku;
