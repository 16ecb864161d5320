mod config;
mod history;
mod tree;
