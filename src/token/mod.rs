pub mod reader;
pub mod record;
