pub mod treatment;

pub use treatment::TreatmentService;
