pub mod pipeline_state;
pub mod session;
pub mod watch_use_case;
