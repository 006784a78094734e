use chrono::NaiveDateTime;

pub(crate) mod helper {
    #[cfg(not(test))]
    pub use super::get_local_now;
    #[cfg(test)]
    pub use super::mock_chrono::get_local_now;
    #[cfg(test)]
    pub use super::mock_chrono::set_local_now;
}


/// Server timestamps are naive local time, so compare against local wall clock.
#[cfg(not(test))]
pub fn get_local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Whole minutes between `since` and now, never negative.
pub(crate) fn minutes_waiting(since: NaiveDateTime) -> i64 {
    (helper::get_local_now() - since).num_minutes().max(0)
}
