// src/lib.rs

//! Vocabulary Crawler Library
//!
//! Seed key → index page → listing pages → word pages, each stage streaming
//! into the next, with results fanned back into one stream.

pub mod collector;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
