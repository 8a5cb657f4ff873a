pub mod count_regions_use_case;
pub mod pipeline_logger;
