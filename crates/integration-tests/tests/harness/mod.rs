#![allow(dead_code)]

pub mod config;
pub mod server;
pub mod sink;
