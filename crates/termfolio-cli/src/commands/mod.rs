pub mod init_config;
pub mod run;
pub mod sections;
pub mod tokens;
