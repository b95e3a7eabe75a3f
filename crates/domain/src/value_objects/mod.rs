pub mod month_year;
pub mod subscriptions;
