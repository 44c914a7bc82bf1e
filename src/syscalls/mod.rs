pub mod exec_calls;
pub mod fs_calls;
