pub mod test_utils;

pub mod oracle_test;
pub mod permit_test;
pub mod swap_router_test;
