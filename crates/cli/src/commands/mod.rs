mod generate;
mod scan;
mod verify;

pub(crate) use generate::cmd_generate;
pub(crate) use scan::cmd_scan;
pub(crate) use test::cmd_test;
pub(crate) use verify::cmd_verify;
