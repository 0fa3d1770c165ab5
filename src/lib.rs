pub mod aggregate;
pub mod config;
pub mod crawler;
pub mod error;
pub mod heat;
pub mod history;
pub mod input;
pub mod loc;
pub mod nav;
pub mod render;
pub mod scan;
pub mod tree;
pub mod view;
pub mod visible;
