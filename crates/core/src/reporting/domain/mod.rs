pub mod count_writer;
