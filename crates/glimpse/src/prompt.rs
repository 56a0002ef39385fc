use serde::Serialize;
use tera::{Context, Error as TeraError, Tera};

use crate::models::annotation::ImageAnnotation;

const IMAGE_QUESTION_TEMPLATE: &str = include_str!("prompts/image_question.md");
const IMAGE_UNAVAILABLE_TEMPLATE: &str = include_str!("prompts/image_unavailable.md");

/// Rendered in place of an annotation field the vision backend returned nothing for
const NOTHING_FOUND: &str = "none";

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    let rendered = tera.render("inline_template", &context)?;
    Ok(rendered.trim_end().to_string())
}

#[derive(Serialize)]
struct ImageQuestion<'a> {
    ocr_text: &'a str,
    objects: String,
    labels: String,
    message: &'a str,
}

#[derive(Serialize)]
struct ImageUnavailable<'a> {
    message: &'a str,
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NOTHING_FOUND.to_string()
    } else {
        items.join(", ")
    }
}

/// Fold what the vision backend found into the user's message
pub fn compose_prompt(annotation: &ImageAnnotation, message: &str) -> Result<String, TeraError> {
    let ocr_text = annotation.ocr_text.trim();
    let context = ImageQuestion {
        ocr_text: if ocr_text.is_empty() {
            NOTHING_FOUND
        } else {
            ocr_text
        },
        objects: join_or_none(&annotation.detected_objects),
        labels: join_or_none(&annotation.detected_labels),
        message,
    };
    load_prompt(IMAGE_QUESTION_TEMPLATE, &context)
}

/// Prompt used when an image was attached but could not be annotated
pub fn degraded_prompt(message: &str) -> Result<String, TeraError> {
    load_prompt(IMAGE_UNAVAILABLE_TEMPLATE, &ImageUnavailable { message })
}
