pub mod cukeport_error;

pub use cukeport_error::CukeportError;
