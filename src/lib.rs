pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod feed;
pub mod layout;
pub mod lightbox;
pub mod map;
pub mod models;
pub mod mutation;
pub mod scroll;
pub mod seed;
pub mod store;
pub mod store_backends;
pub mod web_server;
