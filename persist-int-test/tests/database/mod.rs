mod database_test;
mod store_test;
