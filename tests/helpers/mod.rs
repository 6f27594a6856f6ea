pub mod listing_builder;
