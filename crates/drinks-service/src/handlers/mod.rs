pub mod drinks_handler;
