use arrow_schema::{Schema, Field, DataType, TimeUnit};
use std::sync::Arc;

/// Row layout of the sections table. Row order is the index position.
pub fn build_sections_schema(dim: i32) -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new("id", DataType::Utf8, false),
		Field::new("act_name", DataType::Utf8, false),
		Field::new("act_year", DataType::Int32, false),
		Field::new("category", DataType::Utf8, false),
		Field::new("section_number", DataType::Utf8, false),
		Field::new("text", DataType::Utf8, false),
		Field::new("source", DataType::Utf8, false),
		Field::new("vector", DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), true),
	]))
}

pub fn build_meta_schema() -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new("key", DataType::Utf8, false),
		Field::new("value", DataType::Utf8, false),
		Field::new("updated_at", DataType::Timestamp(TimeUnit::Millisecond, None), false),
	]))
}
