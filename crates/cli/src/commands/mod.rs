pub mod context;
pub mod install;
pub mod make;
pub mod refresh;
pub mod reset;
pub mod rollback;
pub mod run;
pub mod status;
