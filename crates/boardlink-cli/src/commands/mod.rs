pub mod compile;
pub mod detect;
pub mod ports;
pub mod send;
pub mod serve;
pub mod upload;
