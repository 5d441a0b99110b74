#[cfg(test)]
pub mod router_tests;
#[cfg(test)]
pub mod scenario_tests;
#[cfg(test)]
pub mod utils;
#[cfg(test)]
pub mod view_lifecycle_tests;
