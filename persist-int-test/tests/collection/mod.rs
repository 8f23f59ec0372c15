mod collection_negative_test;
mod collection_test;
