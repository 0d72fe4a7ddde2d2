mod keys;
mod recorder;
mod registration;
mod simple;
mod upsert;
mod user;

use crate::{
    keys::keys, registration::registration, simple::simple, upsert::upsert, user::users,
};
use log::LevelFilter;
use microrm::{Driver, Executor, Model, SqlWriter};
use std::env;

pub use recorder::Recorder;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Drop the table of `M` and make the handle forget it was registered.
pub fn reset<M: Model, E: Executor>(executor: &E) {
    let mut sql = String::from("DROP TABLE IF EXISTS ");
    executor
        .driver()
        .sql_writer()
        .write_identifier(&mut sql, M::descriptor().table_name());
    let result = executor.execute(&sql, &[]);
    assert!(
        result.success,
        "Failed to drop the table of {}",
        M::descriptor().type_name()
    );
    executor.registry().forget::<M>();
}

pub fn execute_tests<E: Executor>(executor: &E) {
    registration(executor);
    simple(executor);
    users(executor);
    upsert(executor);
    keys(executor);
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
