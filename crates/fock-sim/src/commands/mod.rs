pub mod decompose;
pub mod preset;
pub mod version;
