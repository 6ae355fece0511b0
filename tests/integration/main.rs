mod cli_test;
mod engine_test;
mod portfolio_test;
