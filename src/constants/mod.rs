pub mod compute_budget;
pub mod pump_fun;
