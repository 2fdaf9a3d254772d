pub mod open_er_api;
pub mod util;
pub mod yahoo_finance;
