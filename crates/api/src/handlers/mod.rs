pub mod favorites;
pub mod hospitals;
pub mod status;
pub mod wards;
