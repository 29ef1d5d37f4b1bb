pub mod conflict;
pub mod numerals;
pub mod schedule_optimizer;
pub mod schedule_parser;
pub mod schedule_utils;
pub mod vocab;
