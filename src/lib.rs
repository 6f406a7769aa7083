pub mod config;
pub mod controller;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod labels;
pub mod list;
pub mod mutation;
pub mod notify;
pub mod options;
pub mod output;
pub mod paging;
pub mod resource;
pub mod resources;
pub mod slot;
pub mod stats;
