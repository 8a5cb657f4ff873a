pub mod jsonl_count_writer;
