pub mod overrides;
pub mod redaction;
