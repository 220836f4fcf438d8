//! qaboard - A small question and answer board
//!
//! Visitors ask questions and reply to them; signed-in users answer them.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
