use super::args::Cli;

pub mod report;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const NO_DATA: i32 = 1;
    pub const FATAL: i32 = 2;
}

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    report::run(cli)
}
