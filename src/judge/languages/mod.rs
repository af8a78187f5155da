pub mod cpp;
pub mod go;
pub mod python;
pub mod rust;
