#![allow(dead_code)]

pub mod recording_analytics;
pub mod utils;
