pub mod mock_catalog;
pub mod mock_config;
