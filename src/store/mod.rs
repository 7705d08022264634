pub mod jsonl;
pub mod repo;
