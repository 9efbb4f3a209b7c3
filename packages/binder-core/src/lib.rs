pub mod catalog;
pub mod enrich;
pub mod import;
pub mod mutation;
pub mod storage;
pub mod types;
pub mod view;
