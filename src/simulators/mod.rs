// src/simulators/mod.rs

pub mod gbm;
pub mod order_book;
