pub mod cli;
mod currencies;
mod database;
mod http_err;
mod models;
mod rates;
mod repos;
mod server;
