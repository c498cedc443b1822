pub mod ledger;
pub mod nutrition;
pub mod planner;
pub mod pricing;
