pub mod account;
pub mod application;
pub mod company;
pub mod drive;
pub mod student;
