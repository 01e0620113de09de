// ABOUTME: Configuration names shared across Taskbook packages
// ABOUTME: Keeps every environment variable name in one place

pub mod constants;
