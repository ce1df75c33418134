pub mod clear;
pub mod page;
pub mod predict;
pub mod preview;
pub mod select;
