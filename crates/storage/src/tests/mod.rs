pub mod data;

mod tracker;
