//! Reports on employee presence. Check-in and check-out times are read from a csv file and
//! grouped by weekday, producing the documents behind the presence charts.
//!

pub mod cli;
pub mod presence;
pub mod utils;
