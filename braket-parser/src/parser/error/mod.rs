pub mod kind;

pub use braket_error::Error;
