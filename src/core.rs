pub mod allocation;
pub mod analysis;
pub mod boiler;
pub mod interval;
pub mod peaks;
pub mod point;
pub mod prices;
pub mod savings;
