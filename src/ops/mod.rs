pub mod check;
pub mod extract;
pub mod report;
pub mod run;
pub mod template;
pub mod validate;
