pub mod json_region_config;
