pub mod aggregation;
pub mod candle;
pub mod config;
pub mod data_source;
pub mod error;
pub mod granularity;
pub mod plan;
pub mod processor;
pub mod processor_enums;
pub mod tiingo;
