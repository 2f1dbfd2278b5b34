pub mod hotels;
pub mod prices;
pub mod runs;
