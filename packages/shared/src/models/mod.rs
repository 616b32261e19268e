pub mod connection;
pub mod food;
pub mod matches;
pub mod participant;
pub mod requests;
pub mod responses;
pub mod room;
pub mod session;
pub mod swipe;
