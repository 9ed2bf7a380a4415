// Path Planning algorithms module

pub mod theta_star;

pub use theta_star::*;
