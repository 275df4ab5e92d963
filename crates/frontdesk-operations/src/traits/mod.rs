mod doctor_repository;
mod identity_provider;
mod profile_repository;
mod ward_repository;

pub use doctor_repository::DoctorRepository;
pub use identity_provider::IdentityProvider;
pub use profile_repository::ProfileRepository;
pub use ward_repository::WardRepository;
