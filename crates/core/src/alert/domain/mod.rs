pub mod alert_sink;
pub mod throttle;
