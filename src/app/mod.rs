pub mod healthcheck;
pub mod servers;
