mod json;

pub use json::{plans_from_json, plans_to_json, read_plans_from_json_file, write_plans_to_json_file};
