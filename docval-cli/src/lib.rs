//! Command line front end for `docval`.

pub mod cli;
pub mod logging;
