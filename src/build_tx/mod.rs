pub mod pump_fun;
pub mod trade_plan;
pub mod tx_builder;
