pub mod config;
pub mod logging;

pub mod cdn;
pub mod dispatch;
pub mod plan;
pub mod run;
pub mod storage;
