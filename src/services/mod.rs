pub mod directory;
pub mod iot;

pub use directory::HospitalDirectory;
