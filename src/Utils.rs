//! different utility modules used throughout the project
/// tiny module to set up terminal and file logging
pub mod logger;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into analysis settings
pub mod task_parser;
