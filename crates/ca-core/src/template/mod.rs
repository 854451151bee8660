//! Template variable substitution

mod render;
mod variables;

pub use render::{RenderedEmail, placeholders, render, unresolved};
pub use variables::{SAMPLE_CUSTOM_MESSAGE, TemplateVariable, VariableData, format_template_date};
