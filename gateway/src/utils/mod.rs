pub mod address;
pub mod decimal;
pub mod logger;
pub mod math_helper;
