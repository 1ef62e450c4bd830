pub mod rodio_alert_sink;
