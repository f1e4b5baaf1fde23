pub mod broker;
pub mod metrics;
pub mod raw_trade;
pub mod unified;

#[cfg(test)]
mod tests;
