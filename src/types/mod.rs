pub mod level;
pub mod outcome;
pub mod site;
pub mod task;
