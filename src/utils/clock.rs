use chrono::{DateTime, Local};

#[cfg(test)]
use mockall::automock;

/// Provides the current time across the application, so that date dependent output and relative
/// dates like "yesterday" can be tested.
#[cfg_attr(test, automock)]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Local>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }
}
