pub mod driver_adapter;
pub mod logging;
pub mod worker;
