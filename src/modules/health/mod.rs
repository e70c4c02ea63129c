// Health module
//
// Liveness and readiness probes, served outside the authenticated API scope.

pub mod controllers;

pub use controllers::configure;
