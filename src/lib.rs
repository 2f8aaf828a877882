pub mod graph;
pub mod cust_error;
pub mod model;
pub mod solver;
pub mod solution;
pub mod report;
pub mod flow;
pub mod compress;
