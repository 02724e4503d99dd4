pub mod currencies;
