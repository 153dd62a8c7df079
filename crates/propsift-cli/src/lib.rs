#![deny(unsafe_code)]

//! Shared infrastructure for the propsift binary.

pub mod logging;
